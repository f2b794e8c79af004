// Csscut Core Library
//
// Reduces the CSS delivered with an HTML page to the subset of rules the
// page actually uses and inlines the result. A fast approximate reducer
// answers every request; a background pipeline computes a precise reduction
// per distinct page structure and caches it for later requests.

pub mod config;
pub mod extract;
pub mod fingerprint;
pub mod inject;
pub mod pipeline;
pub mod reducer;
pub mod service;
pub mod store;
pub mod types;

mod patterns;

// Re-export main types and functions for easy use
pub use config::CssCutConfig;
pub use fingerprint::page_fingerprint;
pub use inject::inject_style;
pub use reducer::fast_cut;
pub use service::CssCut;
pub use store::{FileStore, MemoryStore, StyleStore};
pub use types::*;
