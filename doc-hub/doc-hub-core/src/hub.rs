//! Session state of the document manager.
//!
//! `DocumentHub` owns the folder and document collections and the panel
//! state around them. Every edit goes through an editor that proposes a
//! whole new collection, which then replaces the current one.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::acl::AclEntry;
use crate::blob::LocalStorage;
use crate::config::HubConfig;
use crate::events::{Event, EventBus};
use crate::storage::document::unfiled_from;
use crate::storage::folder::{moved, renamed, with_folder, without_folder};
use crate::storage::{Document, DocumentStore, Folder, FolderError, FolderStore};
use crate::tags;
use crate::tree::{compose, FolderTree, TreeRow, TreeView};
use crate::upload::{FileSource, UploadDraft, UploadError};

/// Serializable snapshot of the two collections.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Session {
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl Session {
    /// The folders a fresh session starts with and no documents.
    pub fn seed() -> Self {
        Self {
            folders: FolderStore::with_defaults().to_vec(),
            documents: Vec::new(),
        }
    }
}

pub struct DocumentHub {
    config: HubConfig,
    folders: FolderStore,
    documents: DocumentStore,
    view: TreeView,
    selected_document: Option<Uuid>,
    storage: Arc<dyn LocalStorage>,
    events: EventBus,
}

impl DocumentHub {
    /// Empty hub.
    pub fn new(config: HubConfig, storage: Arc<dyn LocalStorage>) -> Self {
        Self::from_session(config, storage, Session::default())
    }

    /// Hub seeded with the default folders.
    pub fn with_defaults(config: HubConfig, storage: Arc<dyn LocalStorage>) -> Self {
        Self::from_session(config, storage, Session::seed())
    }

    pub fn from_session(
        config: HubConfig,
        storage: Arc<dyn LocalStorage>,
        session: Session,
    ) -> Self {
        Self {
            config,
            folders: FolderStore::from_folders(session.folders),
            documents: DocumentStore::from_documents(session.documents),
            view: TreeView::new(),
            selected_document: None,
            storage,
            events: EventBus::new(),
        }
    }

    pub fn to_session(&self) -> Session {
        Session {
            folders: self.folders.to_vec(),
            documents: self.documents.to_vec(),
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn folders(&self) -> &FolderStore {
        &self.folders
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn view(&self) -> &TreeView {
        &self.view
    }

    // --- folder panel ---

    pub fn tree(&self) -> FolderTree {
        compose(&self.folders, &self.documents)
    }

    pub fn rows(&self) -> Vec<TreeRow> {
        self.view.rows(&self.tree())
    }

    pub fn toggle_folder(&mut self, id: Uuid) -> bool {
        self.view.toggle(id)
    }

    pub fn expand_all(&mut self) {
        let tree = self.tree();
        self.view.expand_all(&tree);
    }

    /// Select the folder new uploads attach to. Unknown ids are ignored.
    pub fn select_folder(&mut self, id: Uuid) -> bool {
        if !self.folders.contains(id) {
            return false;
        }
        self.view.select(id);
        self.events.send(Event::FolderSelected { id });
        true
    }

    pub fn clear_folder_selection(&mut self) {
        self.view.clear_selection();
    }

    /// Click on a rendered row. Rows left over from before a folder was
    /// removed select nothing.
    pub fn activate_row(&mut self, row: &TreeRow) -> bool {
        self.select_folder(row.folder_id())
    }

    pub fn selected_folder(&self) -> Option<&Folder> {
        self.view.selected().and_then(|id| self.folders.get(id))
    }

    /// Breadcrumb of the selected folder, e.g. `Documents / Reports`.
    pub fn selected_folder_name(&self) -> Option<String> {
        let id = self.view.selected()?;
        if !self.folders.contains(id) {
            return None;
        }
        Some(self.folders.path_of(id).join(" / "))
    }

    // --- replace contract ---

    /// Swap in a proposed folder collection. The selection is dropped when
    /// its folder is gone.
    pub fn replace_folders(&mut self, folders: Vec<Folder>) {
        self.folders.replace(folders);
        if let Some(id) = self.view.selected() {
            if !self.folders.contains(id) {
                self.view.clear_selection();
            }
        }
        tracing::info!(count = self.folders.len(), "folders replaced");
        self.events.send(Event::FoldersReplaced {
            count: self.folders.len(),
        });
    }

    pub fn replace_documents(&mut self, documents: Vec<Document>) {
        self.documents.replace(documents);
        if let Some(id) = self.selected_document {
            if self.documents.get(id).is_none() {
                self.selected_document = None;
            }
        }
        tracing::info!(count = self.documents.len(), "documents replaced");
        self.events.send(Event::DocumentsReplaced {
            count: self.documents.len(),
        });
    }

    // --- folder editor ---

    /// Create a folder and return its id. Blank names create nothing.
    pub fn create_folder(&mut self, name: &str, parent_id: Option<Uuid>) -> Option<Uuid> {
        let current = self.folders.to_vec();
        let proposed = with_folder(&current, name, parent_id);
        if proposed.len() == current.len() {
            return None;
        }
        let id = proposed.last().map(|f| f.id)?;
        self.replace_folders(proposed);
        Some(id)
    }

    pub fn rename_folder(&mut self, id: Uuid, name: &str) -> Result<(), FolderError> {
        let proposed = renamed(&self.folders.to_vec(), id, name)?;
        self.replace_folders(proposed);
        Ok(())
    }

    pub fn move_folder(&mut self, id: Uuid, new_parent: Option<Uuid>) -> Result<(), FolderError> {
        let proposed = moved(&self.folders.to_vec(), id, new_parent)?;
        self.replace_folders(proposed);
        Ok(())
    }

    /// Delete a folder and its subtree. Documents filed there become
    /// unfiled.
    pub fn delete_folder(&mut self, id: Uuid) -> Result<(), FolderError> {
        if !self.folders.contains(id) {
            return Err(FolderError::NotFound(id));
        }
        let removed: HashSet<Uuid> = self.folders.descendant_ids(id).into_iter().collect();
        let folders = without_folder(&self.folders.to_vec(), id);
        let documents = unfiled_from(&self.documents.to_vec(), &removed);
        self.replace_folders(folders);
        self.replace_documents(documents);
        Ok(())
    }

    // --- upload ---

    pub fn begin_upload(&self, file: Box<dyn FileSource>) -> Result<UploadDraft, UploadError> {
        UploadDraft::select(file, &self.config.upload_policy())
    }

    /// Store the draft's file and add its document under the selected
    /// folder. The new document becomes the selected one.
    pub async fn upload(&mut self, draft: &UploadDraft) -> Result<Uuid, UploadError> {
        let key = draft.submit(self.storage.as_ref()).await?;
        let file = draft.file();
        let folder_id = self.selected_folder().map(|f| f.id);
        let mut doc = Document::new(
            draft.metadata.title.trim(),
            file.media_type(),
            file.size(),
            folder_id,
        );
        doc.description = draft.metadata.description.clone();
        doc.tags = draft.metadata.tags.clone();
        let id = doc.id;

        let mut documents = self.documents.to_vec();
        documents.push(doc);
        self.documents.replace(documents);
        self.selected_document = Some(id);

        tracing::info!(document = %id, key = %key, folder = ?folder_id, "document uploaded");
        self.events.send(Event::DocumentUploaded { id, folder_id });
        Ok(id)
    }

    // --- viewer selection ---

    pub fn select_document(&mut self, id: Uuid) -> bool {
        if self.documents.get(id).is_none() {
            return false;
        }
        self.selected_document = Some(id);
        self.events.send(Event::DocumentSelected { id });
        true
    }

    pub fn close_document(&mut self) {
        if self.selected_document.take().is_some() {
            self.events.send(Event::DocumentClosed);
        }
    }

    pub fn selected_document(&self) -> Option<&Document> {
        self.selected_document.and_then(|id| self.documents.get(id))
    }

    // --- tags and access lists ---

    fn update_document(&mut self, id: Uuid, edit: impl FnOnce(&Document) -> Document) -> bool {
        let Some(current) = self.documents.get(id) else {
            return false;
        };
        let updated = edit(current);
        if &updated == current {
            return false;
        }
        self.documents.replace_document(updated);
        tracing::info!(document = %id, "document updated");
        self.events.send(Event::DocumentUpdated { id });
        true
    }

    pub fn add_tag(&mut self, id: Uuid, tag: &str) -> bool {
        self.update_document(id, |d| Document {
            tags: tags::add(&d.tags, tag),
            ..d.clone()
        })
    }

    pub fn remove_tag(&mut self, id: Uuid, tag: &str) -> bool {
        self.update_document(id, |d| Document {
            tags: tags::remove(&d.tags, tag),
            ..d.clone()
        })
    }

    pub fn rename_tag(&mut self, id: Uuid, from: &str, to: &str) -> bool {
        self.update_document(id, |d| Document {
            tags: tags::rename(&d.tags, from, to),
            ..d.clone()
        })
    }

    /// Replace a document's access list.
    pub fn update_acl(&mut self, id: Uuid, acl: Vec<AclEntry>) -> bool {
        self.update_document(id, |d| Document {
            acl,
            ..d.clone()
        })
    }
}
