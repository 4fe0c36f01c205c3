//! Inventory building
//!
//! Turns cluster resource records into a tag-grouped inventory document.

mod builder;
mod resolver;
mod tags;

use thiserror::Error;

pub use builder::InventoryBuilder;

/// Inventory building errors
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Unable to resolve host '{host}': {reason}")]
    Resolution { host: String, reason: String },

    #[error("Resource '{id}' is missing required field '{field}'")]
    MissingField { id: String, field: &'static str },
}
