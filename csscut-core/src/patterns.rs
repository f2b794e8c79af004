//! Pre-compiled regexes shared across the crate.
//!
//! Everything csscut knows about HTML and CSS syntax lives here: these are
//! deliberately coarse token patterns, not grammars. The reduction engine
//! over-approximates by design, so the patterns only need to be permissive
//! enough never to miss a used selector.

use regex::Regex;
use std::sync::LazyLock;

/// Opening HTML tags — captures the tag name.
pub static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([a-z0-9]+)[ />]").unwrap());

/// `class` attribute values, captured whole (unsplit).
pub static HTML_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<[^>]+class="([^"]+)"(?:[^>]+>|>)"#).unwrap());

/// `id` attribute values, captured whole.
pub static HTML_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<[^>]+id="([^"]+)"(?:[^>]+>|>)"#).unwrap());

/// Stylesheet `<link>` elements.
pub static STYLE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<link[^>]+rel="stylesheet"[^>]+/>"#).unwrap());

/// Root-relative stylesheet hrefs. A single leading slash keeps the link
/// local; protocol-relative `//cdn...` hrefs are left alone.
pub static STYLE_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href="(/[^/][^"]+)""#).unwrap());

/// The designated injection point for the inline stylesheet.
pub static STYLE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<meta type="style"/>"#).unwrap());

/// Whole `@media` blocks, including their nested rule braces.
pub static CSS_MEDIA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@media[^{]+\{([^@]+(?:\})\s*\})").unwrap());

/// Top-level rule delimiters — split alternates selector / body.
pub static CSS_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[{}]").unwrap());

/// Bare identifiers at the start of a selector or after a comma:
/// candidate tag names, including the universal `*`.
pub static CSS_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^\s*|,\s*)([a-zA-Z0-9*]+)").unwrap());

/// `.identifier` occurrences — candidate class names.
pub static CSS_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.([a-zA-Z0-9_-]+)").unwrap());

/// `#identifier` occurrences — candidate id names.
pub static CSS_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([a-zA-Z0-9_-]+)").unwrap());

/// Delimiter comments the precise-pruning tool embeds in its output.
pub static TOOL_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*\*\*[^*]+\*\*\*/").unwrap());
