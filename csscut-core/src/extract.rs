//! HTML text extraction and stylesheet file reading.
//!
//! Pattern-match primitives, not an HTML parser: tag names, class/id
//! attribute values and local stylesheet references are pulled out with the
//! coarse regexes in [`crate::patterns`].

use crate::patterns::{HTML_CLASS, HTML_ID, HTML_TAG, STYLE_HREF, STYLE_LINK};
use crate::types::UsageSets;
use anyhow::{Context, Result};
use std::fs;

impl UsageSets {
    /// Collect the tag/class/id names used by one document.
    ///
    /// Tags come out as matched (the pattern only matches lowercase names).
    /// Class attribute values are split on whitespace into individual
    /// tokens; id attribute values are taken whole.
    pub fn from_html(html: &str) -> Self {
        let mut sets = UsageSets::default();

        for cap in HTML_TAG.captures_iter(html) {
            sets.tags.insert(cap[1].to_string());
        }

        for cap in HTML_CLASS.captures_iter(html) {
            for token in cap[1].split_whitespace() {
                sets.classes.insert(token.to_string());
            }
        }

        for cap in HTML_ID.captures_iter(html) {
            sets.ids.insert(cap[1].to_string());
        }

        sets
    }
}

/// Resolve the local stylesheets referenced by a page.
///
/// Only `<link rel="stylesheet">` elements with a root-relative href
/// qualify; their hrefs are resolved against `www_root` in document order.
pub fn stylesheet_paths(html: &str, www_root: &str) -> Vec<String> {
    STYLE_LINK
        .find_iter(html)
        .filter_map(|link| STYLE_HREF.captures(link.as_str()))
        .map(|href| format!("{}{}", www_root, &href[1]))
        .collect()
}

/// Read and concatenate stylesheet files.
///
/// Any read failure aborts the whole reduction — the caller gets the error,
/// not partial CSS.
pub fn read_stylesheets(paths: &[String]) -> Result<String> {
    let mut css = String::new();
    for path in paths {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read stylesheet {}", path))?;
        css.push_str(&contents);
        css.push('\n');
    }
    Ok(css)
}
