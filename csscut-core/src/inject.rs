//! HTML rewriting: strip local stylesheet links, inline the final CSS.
//!
//! A pure text transform, independent of how the CSS was reduced.

use crate::patterns::{STYLE_HREF, STYLE_LINK, STYLE_PLACEHOLDER};
use regex::NoExpand;

/// Rewrite `html` to carry `css` inline.
///
/// Every stylesheet `<link>` with a root-relative href is removed (the same
/// locality rule used for extraction; external links stay). The first
/// `<meta type="style"/>` placeholder is replaced with
/// `<style>...</style>`; without a placeholder the links are still
/// stripped but no style element is inserted.
pub fn inject_style(html: &str, css: &str) -> String {
    let stripped = STYLE_LINK.replace_all(html, |caps: &regex::Captures| {
        if STYLE_HREF.is_match(&caps[0]) {
            String::new()
        } else {
            caps[0].to_string()
        }
    });

    let style = format!("<style>{}</style>", css);
    STYLE_PLACEHOLDER
        .replace(&stripped, NoExpand(&style))
        .into_owned()
}
