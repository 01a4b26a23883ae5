pub mod forms;
pub mod notice;
pub mod view;

pub use view::CatalogueView;
