//! Output module
//!
//! Renders the inventory document for stdout.

mod formatter;

pub use formatter::render_inventory;
