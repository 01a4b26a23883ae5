//! Common types for the catalogue aggregates

pub mod error;
pub mod id_allocator;
pub mod serde_helpers;

// Re-exports
pub use error::CatalogueError;
pub use id_allocator::IdAllocator;
