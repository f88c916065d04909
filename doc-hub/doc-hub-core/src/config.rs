use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::blob::{DirStorage, InMemoryStorage, LocalStorage};
use crate::upload::{UploadPolicy, ACCEPTED_TYPES, MAX_UPLOAD_BYTES};

pub const DEFAULT_HIGHLIGHT_DELAY_MS: u64 = 100;

#[derive(Clone, Debug, PartialEq)]
pub struct HubConfig {
    pub max_upload_bytes: u64,
    pub accepted_types: Vec<String>,
    pub highlight_delay_ms: u64,
    /// Directory for stored uploads; in memory when unset.
    pub storage_dir: Option<PathBuf>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: MAX_UPLOAD_BYTES,
            accepted_types: ACCEPTED_TYPES.iter().map(|t| t.to_string()).collect(),
            highlight_delay_ms: DEFAULT_HIGHLIGHT_DELAY_MS,
            storage_dir: None,
        }
    }
}

impl HubConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(v) = lookup("DOC_HUB_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = v
                .parse()
                .with_context(|| format!("DOC_HUB_MAX_UPLOAD_BYTES: invalid value {v:?}"))?;
        }
        if let Some(v) = lookup("DOC_HUB_HIGHLIGHT_DELAY_MS") {
            config.highlight_delay_ms = v
                .parse()
                .with_context(|| format!("DOC_HUB_HIGHLIGHT_DELAY_MS: invalid value {v:?}"))?;
        }
        if let Some(v) = lookup("DOC_HUB_STORAGE_DIR") {
            if !v.is_empty() {
                config.storage_dir = Some(PathBuf::from(v));
            }
        }
        Ok(config)
    }

    pub fn highlight_delay(&self) -> Duration {
        Duration::from_millis(self.highlight_delay_ms)
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            accepted_types: self.accepted_types.clone(),
            max_bytes: self.max_upload_bytes,
        }
    }

    pub fn open_storage(&self) -> Result<Arc<dyn LocalStorage>> {
        let storage: Arc<dyn LocalStorage> = match &self.storage_dir {
            Some(dir) => Arc::new(
                DirStorage::new(dir)
                    .with_context(|| format!("failed to open storage dir {}", dir.display()))?,
            ),
            None => Arc::new(InMemoryStorage::new()),
        };
        Ok(storage)
    }
}
