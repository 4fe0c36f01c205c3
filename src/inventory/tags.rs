//! Tag to group-name normalisation

use once_cell::sync::Lazy;
use regex::Regex;

/// Suffix appended to every tag-derived group
pub const GROUP_SUFFIX: &str = "_servers";

static NON_LETTERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z]+").unwrap());

/// Collapse runs of non-ASCII-letters to `_`, strip outer underscores
/// and lower-case.
pub fn normalize(raw: &str) -> String {
    NON_LETTERS
        .replace_all(raw, "_")
        .trim_matches('_')
        .to_lowercase()
}

/// Group name for a raw tag: the normalised tag plus `_servers`.
///
/// A tag without letters yields the bare suffix.
pub fn group_name(raw_tag: &str) -> String {
    let mut name = normalize(raw_tag);
    name.push_str(GROUP_SUFFIX);
    name
}
