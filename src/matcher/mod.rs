pub mod matcher_model;
pub mod session;
pub mod text;
