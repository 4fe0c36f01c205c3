//! Inventory JSON rendering

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::models::Inventory;

const INDENT: &[u8] = b"    ";

/// Pretty-print the inventory with four-space indentation
pub fn render_inventory(inventory: &Inventory) -> Result<String, serde_json::Error> {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
    inventory.serialize(&mut serializer)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&out).into_owned())
}
