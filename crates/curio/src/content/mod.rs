//! Content collaborators.
//!
//! This module provides:
//! - ContentRepository: executes collection queries (MemoryRepository reference impl)
//! - ItemTransformer: normalizes raw items (DefaultTransformer reference impl)
//! - TransformedItem: the template-ready item shape

mod item;
mod repository;
mod transformer;

pub use item::{RawItem, TransformedItem};
pub use repository::{ContentRepository, MemoryRepository};
pub use transformer::{DefaultTransformer, ItemTransformer, TransformOptions};
