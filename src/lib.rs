pub mod cli;
pub mod commands;
pub mod discovery;
pub mod error;
pub mod input;
pub mod labels;
pub mod matcher;
pub mod page;
pub mod report;
pub mod scenario;
pub mod sync;
pub mod trace;

pub use error::{JumpError, Result};
