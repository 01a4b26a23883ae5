pub mod bundled;
pub mod document;
pub mod search;

pub use bundled::bundled_document;
pub use document::CatalogueDocument;
pub use search::SiteFilter;
