use anyhow::Result;
use serde::{Deserialize, Serialize};

// Default value functions for serde
fn default_queue_capacity() -> usize {
    100
}

fn default_tmp_dir() -> String {
    std::env::temp_dir().to_string_lossy().into_owned()
}

/// Service configuration, constructed once and owned by [`crate::CssCut`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CssCutConfig {
    /// Document root that root-relative stylesheet hrefs resolve against.
    pub www_root: String,
    /// Directory of the persistent style store.
    pub store_path: String,
    /// Wipe the style store before opening it.
    #[serde(default)]
    pub clean_on_start: bool,
    /// Interpreter launching the precise-pruning tool (e.g. `node`).
    pub tool_command: String,
    /// Script passed to the interpreter as its first argument.
    pub tool_script: String,
    /// Refinement queue capacity. Enqueueing blocks once full.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Directory for the transient tool payload files.
    #[serde(default = "default_tmp_dir")]
    pub tmp_dir: String,
}

impl CssCutConfig {
    /// Load config from a YAML file.
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CssCutConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load config with fallback to defaults.
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|_| {
                log::warn!("failed to load config from {}, using defaults", p);
                Self::default()
            }),
            None => Self::default(),
        }
    }
}

impl Default for CssCutConfig {
    fn default() -> Self {
        Self {
            www_root: ".".to_string(),
            store_path: "cache".to_string(),
            clean_on_start: false,
            tool_command: "node".to_string(),
            tool_script: "uncss.js".to_string(),
            queue_capacity: default_queue_capacity(),
            tmp_dir: default_tmp_dir(),
        }
    }
}
