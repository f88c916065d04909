//! Upload validation and storage.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::blob::{data_url, generate_key, LocalStorage, StoredFile};
use crate::tags;

pub const ACCEPTED_TYPES: [&str; 5] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("file is {size} bytes, limit is {max}")]
    TooLarge { size: u64, max: u64 },
    #[error("title is required")]
    MissingTitle,
    #[error("failed to read file: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to store file: {0}")]
    Storage(anyhow::Error),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FileMetadata {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// A file picked for upload.
#[async_trait]
pub trait FileSource: Send + Sync {
    fn name(&self) -> &str;
    fn media_type(&self) -> &str;
    fn size(&self) -> u64;
    async fn read(&self) -> std::io::Result<Bytes>;
}

/// File contents already held in memory.
#[derive(Clone, Debug)]
pub struct MemoryFile {
    name: String,
    media_type: String,
    data: Bytes,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            data: data.into(),
        }
    }
}

#[async_trait]
impl FileSource for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn media_type(&self) -> &str {
        &self.media_type
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    async fn read(&self) -> std::io::Result<Bytes> {
        Ok(self.data.clone())
    }
}

/// File on disk; the media type is guessed from the extension.
#[derive(Clone, Debug)]
pub struct DiskFile {
    path: PathBuf,
    name: String,
    media_type: String,
    size: u64,
}

impl DiskFile {
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let meta = tokio::fs::metadata(&path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let media_type = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(Self {
            path,
            name,
            media_type,
            size: meta.len(),
        })
    }
}

#[async_trait]
impl FileSource for DiskFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn media_type(&self) -> &str {
        &self.media_type
    }

    fn size(&self) -> u64 {
        self.size
    }

    async fn read(&self) -> std::io::Result<Bytes> {
        Ok(Bytes::from(tokio::fs::read(&self.path).await?))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UploadPolicy {
    pub accepted_types: Vec<String>,
    pub max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            accepted_types: ACCEPTED_TYPES.iter().map(|t| t.to_string()).collect(),
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadPolicy {
    /// Type is checked before size.
    pub fn validate(&self, media_type: &str, size: u64) -> Result<(), UploadError> {
        if !self.accepted_types.iter().any(|t| t == media_type) {
            return Err(UploadError::UnsupportedType(media_type.to_string()));
        }
        if size > self.max_bytes {
            return Err(UploadError::TooLarge {
                size,
                max: self.max_bytes,
            });
        }
        Ok(())
    }
}

/// Upload form state between picking a file and submitting it.
pub struct UploadDraft {
    file: Box<dyn FileSource>,
    pub metadata: FileMetadata,
}

impl std::fmt::Debug for UploadDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadDraft")
            .field("file", &self.file.name())
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl UploadDraft {
    /// Accept `file` if the policy allows it. The title starts as the file
    /// name.
    pub fn select(file: Box<dyn FileSource>, policy: &UploadPolicy) -> Result<Self, UploadError> {
        policy.validate(file.media_type(), file.size())?;
        let metadata = FileMetadata {
            title: file.name().to_string(),
            ..FileMetadata::default()
        };
        Ok(Self { file, metadata })
    }

    pub fn file(&self) -> &dyn FileSource {
        self.file.as_ref()
    }

    pub fn add_tag(&mut self, tag: &str) {
        self.metadata.tags = tags::add(&self.metadata.tags, tag);
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.metadata.tags = tags::remove(&self.metadata.tags, tag);
    }

    /// Store the file and return its storage key.
    pub async fn submit(&self, storage: &dyn LocalStorage) -> Result<String, UploadError> {
        if self.metadata.title.trim().is_empty() {
            return Err(UploadError::MissingTitle);
        }
        let metadata = FileMetadata {
            title: self.metadata.title.trim().to_string(),
            ..self.metadata.clone()
        };
        store_file(self.file.as_ref(), &metadata, storage).await
    }
}

/// Encode `file` as a data URL and write it under a fresh key.
pub async fn store_file(
    file: &dyn FileSource,
    metadata: &FileMetadata,
    storage: &dyn LocalStorage,
) -> Result<String, UploadError> {
    let data = file.read().await.map_err(UploadError::Read)?;
    let key = generate_key();
    let stored = StoredFile {
        id: key.clone(),
        file_data: data_url(file.media_type(), &data),
        metadata: metadata.clone(),
    };
    let json = serde_json::to_string(&stored).map_err(|e| UploadError::Storage(e.into()))?;
    if let Err(e) = storage.set_item(&key, &json) {
        tracing::warn!(key = %key, error = %e, "failed to store upload");
        return Err(UploadError::Storage(e));
    }
    tracing::debug!(key = %key, bytes = data.len(), "stored upload");
    Ok(key)
}
