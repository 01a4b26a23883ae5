pub mod api;
pub mod hook;
pub mod sync;
pub mod ui;
