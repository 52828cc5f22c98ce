pub mod host;
pub mod page_model;
pub mod snapshot;
