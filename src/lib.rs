pub mod cli;
pub mod cli_handlers;
pub mod dates;
pub mod document;
pub mod error;
pub mod line;
pub mod models;
pub mod store;

pub use error::{Result, TaskError};
pub use models::*;
