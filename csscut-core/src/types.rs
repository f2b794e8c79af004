use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Fixed-length digest identifying a page's structural content.
///
/// The sole cache key: two pages with identical fingerprints are treated as
/// interchangeable even if their HTML differs in ways the fingerprint
/// ignores. Derived deterministically — see [`crate::fingerprint`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageFingerprint([u8; 64]);

impl PageFingerprint {
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Hex rendering, used for store file names and log lines.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

/// Unit of work queued for precise reduction.
///
/// Created on a cache miss, consumed exactly once by the refinement worker.
/// Never persisted — jobs still queued when the process exits are lost.
#[derive(Debug, Clone)]
pub struct ReductionJob {
    pub fingerprint: PageFingerprint,
    pub html: String,
    /// Resolved local stylesheet paths, in document order.
    pub stylesheet_paths: Vec<String>,
}

/// A precise reduction result, owned by the store once written.
///
/// Entries are write-once: a later job for the same fingerprint is skipped
/// rather than updating in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedStyle {
    pub css: String,
    /// Per-source-file modification times, reserved for future
    /// invalidation-by-staleness. Currently always empty.
    pub mtimes: HashMap<String, i64>,
    pub created_at: DateTime<Utc>,
}

impl CachedStyle {
    pub fn new(css: String) -> Self {
        Self {
            css,
            mtimes: HashMap::new(),
            created_at: Utc::now(),
        }
    }
}

/// Tag/class/id names used by one HTML document.
///
/// Ephemeral — built per reduction call and matched against the relevance
/// tokens extracted from CSS selectors.
#[derive(Debug, Clone, Default)]
pub struct UsageSets {
    pub tags: HashSet<String>,
    /// Individual class tokens (attribute values split on whitespace).
    pub classes: HashSet<String>,
    /// Whole `id` attribute values.
    pub ids: HashSet<String>,
}

/// A (selector, body) pair produced by splitting stylesheet text on
/// top-level block delimiters.
#[derive(Debug, Clone)]
pub struct CssRule {
    pub selector: String,
    pub body: String,
}

impl CssRule {
    /// Reconstruct the rule exactly as it appears in the source text.
    pub fn compile(&self) -> String {
        format!("{}{{{}}}", self.selector, self.body)
    }
}
