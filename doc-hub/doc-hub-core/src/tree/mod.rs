//! Hierarchical view over the flat folder and document collections.
//!
//! The tree is recomposed from scratch on every render. Parent links are
//! unchecked, so composition tracks visited ids and reports folders it
//! cannot reach from a root instead of recursing forever.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::storage::{DocumentStore, Folder, FolderStore};


#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct DocumentLeaf {
    pub id: Uuid,
    pub title: String,
}

/// A folder placed in the tree. `children` index into [`FolderTree::nodes`].
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct FolderNode {
    pub id: Uuid,
    pub name: String,
    pub depth: usize,
    pub documents: Vec<DocumentLeaf>,
    pub children: Vec<usize>,
}

impl FolderNode {
    /// Whether the node shows an expand/collapse control.
    pub fn has_toggle(&self) -> bool {
        !self.children.is_empty() || !self.documents.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The folder sits on a parent cycle or below one.
    Cycle,
    /// The ancestor chain ends at an id that is not in the collection.
    MissingParent,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct SkippedFolder {
    pub id: Uuid,
    pub name: String,
    pub reason: SkipReason,
}

/// Composed tree held as a flat arena in pre-order, so no walk over it
/// recurses however deep the hierarchy goes.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct FolderTree {
    pub nodes: Vec<FolderNode>,
    pub roots: Vec<usize>,
    pub skipped: Vec<SkippedFolder>,
}

impl FolderTree {
    pub fn node(&self, index: usize) -> Option<&FolderNode> {
        self.nodes.get(index)
    }

    pub fn root_nodes(&self) -> impl Iterator<Item = &FolderNode> + '_ {
        self.roots.iter().filter_map(|&i| self.nodes.get(i))
    }

    pub fn children<'a>(&'a self, node: &'a FolderNode) -> impl Iterator<Item = &'a FolderNode> + 'a {
        node.children.iter().filter_map(|&i| self.nodes.get(i))
    }

    /// Pre-order ids of every folder in the tree.
    pub fn folder_ids(&self) -> Vec<Uuid> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    pub fn find(&self, id: Uuid) -> Option<&FolderNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Build the full structural tree, independent of expansion state.
pub fn compose(folders: &FolderStore, documents: &DocumentStore) -> FolderTree {
    let mut children: HashMap<Uuid, Vec<&Folder>> = HashMap::new();
    for folder in folders.iter() {
        if let Some(pid) = folder.parent_id {
            children.entry(pid).or_default().push(folder);
        }
    }
    let mut docs: HashMap<Uuid, Vec<DocumentLeaf>> = HashMap::new();
    for doc in documents.iter() {
        if let Some(fid) = doc.folder_id {
            docs.entry(fid).or_default().push(DocumentLeaf {
                id: doc.id,
                title: doc.title.clone(),
            });
        }
    }

    let mut tree = FolderTree::default();
    let mut visited = HashSet::new();
    // (folder, depth, index of the parent node)
    let mut stack: Vec<(&Folder, usize, Option<usize>)> =
        folders.roots().map(|f| (f, 0, None)).collect();
    stack.reverse();
    while let Some((folder, depth, parent)) = stack.pop() {
        if !visited.insert(folder.id) {
            continue;
        }
        let index = tree.nodes.len();
        tree.nodes.push(FolderNode {
            id: folder.id,
            name: folder.name.clone(),
            depth,
            documents: docs.remove(&folder.id).unwrap_or_default(),
            children: Vec::new(),
        });
        match parent {
            Some(p) => tree.nodes[p].children.push(index),
            None => tree.roots.push(index),
        }
        if let Some(kids) = children.get(&folder.id) {
            stack.extend(kids.iter().rev().map(|k| (*k, depth + 1, Some(index))));
        }
    }

    tree.skipped = folders
        .iter()
        .filter(|f| !visited.contains(&f.id))
        .map(|f| SkippedFolder {
            id: f.id,
            name: f.name.clone(),
            reason: classify(folders, f.id),
        })
        .collect();
    for s in &tree.skipped {
        tracing::warn!(folder = %s.id, reason = ?s.reason, "folder not reachable from a root");
    }

    tree
}

fn classify(folders: &FolderStore, id: Uuid) -> SkipReason {
    let mut seen = HashSet::new();
    let mut current = id;
    loop {
        if !seen.insert(current) {
            return SkipReason::Cycle;
        }
        match folders.get(current).and_then(|f| f.parent_id) {
            Some(pid) => current = pid,
            // chain left the arena
            None => return SkipReason::MissingParent,
        }
    }
}

/// One rendered line of the tree.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeRow {
    Folder {
        id: Uuid,
        name: String,
        depth: usize,
        expanded: bool,
        selected: bool,
        has_toggle: bool,
    },
    Document {
        id: Uuid,
        title: String,
        folder_id: Uuid,
        depth: usize,
    },
}

impl TreeRow {
    pub fn depth(&self) -> usize {
        match self {
            TreeRow::Folder { depth, .. } | TreeRow::Document { depth, .. } => *depth,
        }
    }

    /// The folder a click on this row selects.
    pub fn folder_id(&self) -> Uuid {
        match self {
            TreeRow::Folder { id, .. } => *id,
            TreeRow::Document { folder_id, .. } => *folder_id,
        }
    }
}

/// Expansion and selection state of the folder panel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeView {
    expanded: HashSet<Uuid>,
    selected: Option<Uuid>,
}

impl TreeView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a folder's expansion. Returns the new state.
    pub fn toggle(&mut self, id: Uuid) -> bool {
        if self.expanded.remove(&id) {
            false
        } else {
            self.expanded.insert(id);
            true
        }
    }

    pub fn is_expanded(&self, id: Uuid) -> bool {
        self.expanded.contains(&id)
    }

    pub fn expand_all(&mut self, tree: &FolderTree) {
        self.expanded.extend(tree.folder_ids());
    }

    pub fn select(&mut self, id: Uuid) {
        self.selected = Some(id);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    /// Click on a row. Documents select the folder that owns them.
    pub fn activate(&mut self, row: &TreeRow) {
        self.select(row.folder_id());
    }

    /// Rows to render, descending only into expanded folders.
    pub fn rows(&self, tree: &FolderTree) -> Vec<TreeRow> {
        let mut out = Vec::new();
        let mut stack: Vec<&FolderNode> = tree.root_nodes().collect();
        stack.reverse();
        while let Some(node) = stack.pop() {
            let expanded = self.is_expanded(node.id);
            out.push(TreeRow::Folder {
                id: node.id,
                name: node.name.clone(),
                depth: node.depth,
                expanded,
                selected: self.selected == Some(node.id),
                has_toggle: node.has_toggle(),
            });
            if !expanded {
                continue;
            }
            for doc in &node.documents {
                out.push(TreeRow::Document {
                    id: doc.id,
                    title: doc.title.clone(),
                    folder_id: node.id,
                    depth: node.depth + 1,
                });
            }
            let first_child = stack.len();
            stack.extend(tree.children(node));
            stack[first_child..].reverse();
        }
        out
    }
}
