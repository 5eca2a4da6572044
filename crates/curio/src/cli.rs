//! CLI arguments and command implementations.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use curio::{
    ChangeFrequency, CollectionQueryBuilder, Config, DefaultTransformer, MemoryRepository,
    SortDirection,
};

#[derive(Debug, Parser)]
#[command(
    name = "curio",
    version,
    about = "Query content collections and render RSS or sitemap feeds"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print one page of items with paging metadata as JSON.
    List {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filters: FilterArgs,
        /// Page number (1-indexed).
        #[arg(long)]
        page: Option<u32>,
        /// Items per page.
        #[arg(long)]
        per_page: Option<u32>,
        /// Items to skip before paging.
        #[arg(long, allow_negative_numbers = true)]
        offset: Option<i64>,
        /// Field to sort by.
        #[arg(long, default_value = "date")]
        sort: String,
        /// Sort direction (asc or desc).
        #[arg(long, default_value = "desc")]
        direction: SortDirection,
    },
    /// Print the number of matching items.
    Count {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Render the newest items as RSS 2.0.
    Rss {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filters: FilterArgs,
        /// Channel title (default: FEED_TITLE, then the collection name).
        #[arg(long)]
        title: Option<String>,
        /// Channel description (default: FEED_DESCRIPTION).
        #[arg(long)]
        description: Option<String>,
        /// Channel link and base for relative item urls (default: SITE_URL).
        #[arg(long)]
        link: Option<String>,
        /// Number of items (default: 20).
        #[arg(long)]
        per_page: Option<u32>,
    },
    /// Render the newest items as a sitemap.
    Sitemap {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filters: FilterArgs,
        /// Base for item locations (default: SITE_URL).
        #[arg(long)]
        base_url: Option<String>,
        /// Change frequency (default: SITEMAP_CHANGEFREQ, then weekly).
        #[arg(long)]
        changefreq: Option<ChangeFrequency>,
        /// Priority between 0.0 and 1.0 (default: SITEMAP_PRIORITY, then 0.5).
        #[arg(long)]
        priority: Option<f32>,
        /// Number of items (default: 1000).
        #[arg(long)]
        per_page: Option<u32>,
    },
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// JSON file: an array of items, or an object of collection arrays.
    pub file: PathBuf,
    /// Collection to query.
    pub collection: String,
    /// Path prefix for generated item urls (default: the collection name).
    #[arg(long)]
    pub page_path: Option<String>,
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Only items with this status.
    #[arg(long)]
    pub status: Option<String>,
    /// Only featured (true) or non-featured (false) items.
    #[arg(long)]
    pub featured: Option<bool>,
    /// Only items with this tag (repeatable; all must match).
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Only items by this author.
    #[arg(long)]
    pub author: Option<String>,
    /// Only items dated before this date.
    #[arg(long)]
    pub before: Option<String>,
    /// Only items dated after this date.
    #[arg(long)]
    pub after: Option<String>,
}

/// Run a parsed command.
pub fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::List {
            source,
            filters,
            page,
            per_page,
            offset,
            sort,
            direction,
        } => {
            let repository = load_repository(&source)?;
            let mut builder =
                query_builder(&source, &filters, &repository, config).order_by(sort, direction);
            if let Some(page) = page {
                builder = builder.page(page);
            }
            if let Some(per_page) = per_page {
                builder = builder.per_page(per_page);
            }
            if let Some(offset) = offset {
                builder = builder.offset(offset);
            }

            let result = builder.get()?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Count { source, filters } => {
            let repository = load_repository(&source)?;
            let count = query_builder(&source, &filters, &repository, config).count()?;
            println!("{count}");
        }
        Command::Rss {
            source,
            filters,
            title,
            description,
            link,
            per_page,
        } => {
            let repository = load_repository(&source)?;
            let mut builder = query_builder(&source, &filters, &repository, config);
            if let Some(per_page) = per_page {
                builder = builder.per_page(per_page);
            }

            let mut options = config.rss_options();
            if let Some(title) = title {
                options = options.with_title(title);
            }
            if let Some(description) = description {
                options = options.with_description(description);
            }
            if let Some(link) = link {
                options = options.with_link(link);
            }
            println!("{}", builder.rss(&options)?);
        }
        Command::Sitemap {
            source,
            filters,
            base_url,
            changefreq,
            priority,
            per_page,
        } => {
            let repository = load_repository(&source)?;
            let mut builder = query_builder(&source, &filters, &repository, config);
            if let Some(per_page) = per_page {
                builder = builder.per_page(per_page);
            }

            let mut options = config.sitemap_options();
            if let Some(base_url) = base_url {
                options = options.with_base_url(base_url);
            }
            if let Some(changefreq) = changefreq {
                options = options.with_changefreq(changefreq);
            }
            if let Some(priority) = priority {
                options = options.with_priority(priority);
            }
            print!("{}", builder.sitemap(&options)?);
        }
    }

    Ok(())
}

fn load_repository(source: &SourceArgs) -> Result<MemoryRepository> {
    let raw = fs::read_to_string(&source.file)
        .with_context(|| format!("failed to read {}", source.file.display()))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", source.file.display()))?;

    let repository = MemoryRepository::from_json(value, &source.collection)
        .with_context(|| format!("failed to load collections from {}", source.file.display()))?;
    tracing::debug!(
        file = %source.file.display(),
        collections = ?repository.collection_names(),
        "loaded collections"
    );
    Ok(repository)
}

fn query_builder<'a>(
    source: &SourceArgs,
    filters: &FilterArgs,
    repository: &'a MemoryRepository,
    config: &Config,
) -> CollectionQueryBuilder<'a> {
    let mut builder =
        CollectionQueryBuilder::new(&source.collection, repository, &DefaultTransformer)
            .pretty_urls(config.pretty_urls);

    if let Some(ref page_path) = source.page_path {
        builder = builder.page_path(page_path);
    }
    if let Some(ref status) = filters.status {
        builder = builder.status(status);
    }
    if let Some(featured) = filters.featured {
        builder = builder.featured(featured);
    }
    if !filters.tags.is_empty() {
        builder = builder.tags(filters.tags.iter().cloned());
    }
    if let Some(ref author) = filters.author {
        builder = builder.author(author);
    }
    if let Some(ref before) = filters.before {
        builder = builder.before(before);
    }
    if let Some(ref after) = filters.after {
        builder = builder.after(after);
    }
    builder
}
