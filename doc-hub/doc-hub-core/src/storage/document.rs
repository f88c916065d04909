//! Uploaded document records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::acl::AclEntry;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub media_type: String,
    pub size: u64,
    /// Transient blob reference, only meaningful for the current session.
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u32,
    #[serde(default)]
    pub acl: Vec<AclEntry>,
}

impl Document {
    pub fn new(
        title: impl Into<String>,
        media_type: impl Into<String>,
        size: u64,
        folder_id: Option<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            tags: Vec::new(),
            media_type: media_type.into(),
            size,
            url: format!("blob:{}", Uuid::new_v4()),
            folder_id,
            created_at: now,
            updated_at: now,
            version: 1,
            acl: Vec::new(),
        }
    }

    /// Whether the viewer can render a preview for this document.
    pub fn is_pdf(&self) -> bool {
        crate::viewer::supports_preview(&self.media_type)
    }

    /// Size in mebibytes, for display.
    pub fn size_mib(&self) -> f64 {
        self.size as f64 / 1024.0 / 1024.0
    }
}

/// Insertion-ordered collection of documents.
#[derive(Clone, Debug, Default)]
pub struct DocumentStore {
    docs: Vec<Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents(docs: Vec<Document>) -> Self {
        Self { docs }
    }

    /// Replace the whole collection with a proposed one.
    pub fn replace(&mut self, docs: Vec<Document>) {
        self.docs = docs;
    }

    /// Swap in an edited copy of one document, matched by id.
    pub fn replace_document(&mut self, doc: Document) -> bool {
        match self.docs.iter_mut().find(|d| d.id == doc.id) {
            Some(slot) => {
                *slot = doc;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: Uuid) -> Option<&Document> {
        self.docs.iter().find(|d| d.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.docs.iter()
    }

    pub fn to_vec(&self) -> Vec<Document> {
        self.docs.clone()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn in_folder(&self, folder_id: Uuid) -> impl Iterator<Item = &Document> + '_ {
        self.docs
            .iter()
            .filter(move |d| d.folder_id == Some(folder_id))
    }

    /// Documents with no folder, or whose folder is not in `known`.
    pub fn unfiled<'a>(&'a self, known: &'a HashSet<Uuid>) -> impl Iterator<Item = &'a Document> + 'a {
        self.docs
            .iter()
            .filter(move |d| d.folder_id.map_or(true, |f| !known.contains(&f)))
    }
}

/// Proposed collection with `folder_id` cleared on documents filed under
/// any of `removed`.
pub fn unfiled_from(docs: &[Document], removed: &HashSet<Uuid>) -> Vec<Document> {
    docs.iter()
        .map(|d| match d.folder_id {
            Some(fid) if removed.contains(&fid) => Document {
                folder_id: None,
                ..d.clone()
            },
            _ => d.clone(),
        })
        .collect()
}
