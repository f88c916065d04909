//! Folder records held in an id-indexed arena.
//!
//! Parent links are weak back-references by id. Replacing the whole
//! collection performs no hierarchy checks, so cycles and dangling parents
//! are possible and must be tolerated by readers (see [`crate::tree`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Folder {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Folder {
    pub fn new(name: impl Into<String>, parent_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            parent_id,
            created_at: Utc::now(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FolderError {
    #[error("folder {0} not found")]
    NotFound(Uuid),
    #[error("cannot move folder {folder} into its own descendant {target}")]
    Cycle { folder: Uuid, target: Uuid },
}

/// Insertion-ordered arena of folders.
#[derive(Clone, Debug, Default)]
pub struct FolderStore {
    order: Vec<Uuid>,
    records: HashMap<Uuid, Folder>,
}

impl FolderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_folders(folders: Vec<Folder>) -> Self {
        let mut store = Self::new();
        store.replace(folders);
        store
    }

    /// The folders a fresh session starts with.
    pub fn with_defaults() -> Self {
        let documents = Folder::new("Documents", None);
        let images = Folder::new("Images", None);
        let reports = Folder::new("Reports", Some(documents.id));
        Self::from_folders(vec![documents, images, reports])
    }

    /// Replace the whole collection with a proposed one.
    ///
    /// A later record with an id already seen overwrites the earlier one
    /// but keeps its position.
    pub fn replace(&mut self, folders: Vec<Folder>) {
        self.order.clear();
        self.records.clear();
        for folder in folders {
            if !self.records.contains_key(&folder.id) {
                self.order.push(folder.id);
            }
            self.records.insert(folder.id, folder);
        }
    }

    pub fn get(&self, id: Uuid) -> Option<&Folder> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate folders in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &Folder> + '_ {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// Snapshot of the collection, the starting point for every editor.
    pub fn to_vec(&self) -> Vec<Folder> {
        self.iter().cloned().collect()
    }

    pub fn roots(&self) -> impl Iterator<Item = &Folder> + '_ {
        self.iter().filter(|f| f.is_root())
    }

    /// Ids of `id` and every folder below it. Guarded against cycles.
    pub fn descendant_ids(&self, id: Uuid) -> Vec<Uuid> {
        let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for folder in self.iter() {
            if let Some(pid) = folder.parent_id {
                children.entry(pid).or_default().push(folder.id);
            }
        }
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            out.push(current);
            if let Some(kids) = children.get(&current) {
                stack.extend(kids.iter().rev().copied());
            }
        }
        out
    }

    /// Names from the root down to `id`. Stops at a missing parent or a
    /// repeated id.
    pub fn path_of(&self, id: Uuid) -> Vec<String> {
        let mut names = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(id);
        while let Some(fid) = current {
            if !seen.insert(fid) {
                break;
            }
            let Some(folder) = self.records.get(&fid) else {
                break;
            };
            names.push(folder.name.clone());
            current = folder.parent_id;
        }
        names.reverse();
        names
    }
}

// Folder editor helpers. Each returns the proposed collection; the caller
// hands it back to `FolderStore::replace`.

/// Append a new folder. Blank names leave the collection unchanged.
pub fn with_folder(folders: &[Folder], name: &str, parent_id: Option<Uuid>) -> Vec<Folder> {
    let mut out = folders.to_vec();
    let name = name.trim();
    if name.is_empty() {
        return out;
    }
    out.push(Folder::new(name, parent_id));
    out
}

/// Rename a folder, keeping its parent. Blank names leave the collection
/// unchanged.
pub fn renamed(folders: &[Folder], id: Uuid, name: &str) -> Result<Vec<Folder>, FolderError> {
    if !folders.iter().any(|f| f.id == id) {
        return Err(FolderError::NotFound(id));
    }
    let name = name.trim();
    if name.is_empty() {
        return Ok(folders.to_vec());
    }
    Ok(folders
        .iter()
        .map(|f| {
            if f.id == id {
                Folder {
                    name: name.to_string(),
                    ..f.clone()
                }
            } else {
                f.clone()
            }
        })
        .collect())
}

/// Re-parent a folder. Moving to `None` makes it a root.
pub fn moved(
    folders: &[Folder],
    id: Uuid,
    new_parent: Option<Uuid>,
) -> Result<Vec<Folder>, FolderError> {
    let store = FolderStore::from_folders(folders.to_vec());
    if !store.contains(id) {
        return Err(FolderError::NotFound(id));
    }
    if let Some(target) = new_parent {
        if !store.contains(target) {
            return Err(FolderError::NotFound(target));
        }
        if store.descendant_ids(id).contains(&target) {
            return Err(FolderError::Cycle { folder: id, target });
        }
    }
    Ok(folders
        .iter()
        .map(|f| {
            if f.id == id {
                Folder {
                    parent_id: new_parent,
                    ..f.clone()
                }
            } else {
                f.clone()
            }
        })
        .collect())
}

/// Remove a folder together with everything below it.
pub fn without_folder(folders: &[Folder], id: Uuid) -> Vec<Folder> {
    let store = FolderStore::from_folders(folders.to_vec());
    let doomed: HashSet<Uuid> = store.descendant_ids(id).into_iter().collect();
    folders
        .iter()
        .filter(|f| !doomed.contains(&f.id))
        .cloned()
        .collect()
}
