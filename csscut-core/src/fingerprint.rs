//! Structural page fingerprinting.
//!
//! The fingerprint is a pure function of a page's structural content: the
//! set of tag names it uses plus the sequence of its `class` attribute
//! values. Markup that differs only in text content hashes to the same
//! fingerprint — a deliberate approximation that lets one precise reduction
//! serve every page sharing a template.

use crate::patterns::{HTML_CLASS, HTML_TAG};
use crate::types::PageFingerprint;
use sha2::{Digest, Sha512};
use std::collections::BTreeSet;

/// Derive the cache key for an HTML page.
///
/// Tag names are deduplicated and sorted; `class` attribute values are taken
/// whole, in document order, without deduplication. The two lists are joined
/// with `;` and hashed with SHA-512. An empty page is valid and hashes the
/// empty join.
///
/// Note the asymmetry with the reduction engine, which splits class
/// attributes into tokens: the fingerprint only needs to be a stable
/// function of structure, not match the matcher's granularity.
pub fn page_fingerprint(html: &str) -> PageFingerprint {
    let tags: BTreeSet<&str> = HTML_TAG
        .captures_iter(html)
        .map(|cap| cap.get(1).unwrap().as_str())
        .collect();

    let mut parts: Vec<&str> = tags.into_iter().collect();
    for cap in HTML_CLASS.captures_iter(html) {
        parts.push(cap.get(1).unwrap().as_str());
    }

    let mut hasher = Sha512::new();
    hasher.update(parts.join(";").as_bytes());
    let mut bytes = [0u8; 64];
    bytes.copy_from_slice(&hasher.finalize());
    PageFingerprint::from_bytes(bytes)
}
