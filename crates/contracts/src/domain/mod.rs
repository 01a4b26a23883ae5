pub mod a001_category;
pub mod a002_site;
pub mod catalogue;
pub mod common;
