//! Configuration loaded from `staffing-approval.toml`.
//!
//! Values missing from the file fall back to defaults. The environment
//! variable `STAFFING_APPROVER_ID` takes precedence over the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "staffing-approval.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApprovalConfig {
    /// User notified whenever a new approval request is opened.
    #[serde(default = "default_approver_id")]
    pub approver_id: String,

    /// JSON document backing the file store.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

// Default approver: "approver".
fn default_approver_id() -> String {
    "approver".to_string()
}

// Default store file: `approval-store.json` in the working directory.
fn default_store_path() -> PathBuf {
    PathBuf::from("approval-store.json")
}

// Default log filter: "info".
fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for ApprovalConfig {
    fn default() -> Self {
        Self {
            approver_id: default_approver_id(),
            store_path: default_store_path(),
            log_filter: default_log_filter(),
        }
    }
}

impl ApprovalConfig {
    /// Load `staffing-approval.toml` from the current directory.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Load from `path`, using defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str::<ApprovalConfig>(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            Self::default()
        };

        if let Ok(id) = std::env::var("STAFFING_APPROVER_ID")
            && !id.is_empty()
        {
            config.approver_id = id;
        }

        Ok(config)
    }
}
