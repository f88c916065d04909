#[cfg(test)]
mod tests {
    use crate::storage::document::{self, Document, DocumentStore};
    use crate::storage::folder::{self, Folder, FolderError, FolderStore};
    use std::collections::HashSet;
    use uuid::Uuid;

    fn names(store: &FolderStore) -> Vec<String> {
        store.iter().map(|f| f.name.clone()).collect()
    }

    #[test]
    fn default_folders_seed_session() {
        let store = FolderStore::with_defaults();
        assert_eq!(names(&store), vec!["Documents", "Images", "Reports"]);
        let roots: Vec<_> = store.roots().map(|f| f.name.as_str()).collect();
        assert_eq!(roots, vec!["Documents", "Images"]);
        let reports = store.iter().find(|f| f.name == "Reports").unwrap();
        let documents = store.iter().find(|f| f.name == "Documents").unwrap();
        assert_eq!(reports.parent_id, Some(documents.id));
    }

    #[test]
    fn replace_keeps_collection_order() {
        let a = Folder::new("a", None);
        let b = Folder::new("b", None);
        let c = Folder::new("c", Some(a.id));
        let mut store = FolderStore::new();
        store.replace(vec![c.clone(), a.clone(), b.clone()]);
        assert_eq!(names(&store), vec!["c", "a", "b"]);

        store.replace(vec![b.clone()]);
        assert_eq!(names(&store), vec!["b"]);
        assert!(store.get(a.id).is_none());
    }

    #[test]
    fn replace_accepts_cycles_unchecked() {
        let mut a = Folder::new("a", None);
        let b = Folder::new("b", Some(a.id));
        a.parent_id = Some(b.id);
        let store = FolderStore::from_folders(vec![a.clone(), b.clone()]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.roots().count(), 0);
        // descendant walk terminates despite the loop
        let ids = store.descendant_ids(a.id);
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn with_folder_ignores_blank_names() {
        let current = FolderStore::with_defaults().to_vec();
        assert_eq!(folder::with_folder(&current, "   ", None), current);

        let parent = current[0].id;
        let proposed = folder::with_folder(&current, "  Invoices ", Some(parent));
        assert_eq!(proposed.len(), current.len() + 1);
        let added = proposed.last().unwrap();
        assert_eq!(added.name, "Invoices");
        assert_eq!(added.parent_id, Some(parent));
    }

    #[test]
    fn rename_keeps_parent() {
        let root = Folder::new("root", None);
        let child = Folder::new("child", Some(root.id));
        let current = vec![root.clone(), child.clone()];
        let proposed = folder::renamed(&current, child.id, "renamed").unwrap();
        assert_eq!(proposed[1].name, "renamed");
        assert_eq!(proposed[1].parent_id, Some(root.id));

        let missing = Uuid::new_v4();
        assert_eq!(
            folder::renamed(&current, missing, "x"),
            Err(FolderError::NotFound(missing))
        );
    }

    #[test]
    fn blank_rename_is_a_no_op() {
        let root = Folder::new("root", None);
        let current = vec![root.clone()];
        assert_eq!(folder::renamed(&current, root.id, "   ").unwrap(), current);
        assert_eq!(folder::renamed(&current, root.id, "").unwrap(), current);
        let trimmed = folder::renamed(&current, root.id, "  Archive ").unwrap();
        assert_eq!(trimmed[0].name, "Archive");
    }

    #[test]
    fn cannot_move_folder_into_descendant() {
        let root = Folder::new("root", None);
        let child = Folder::new("child", Some(root.id));
        let grand = Folder::new("grand", Some(child.id));
        let current = vec![root.clone(), child.clone(), grand.clone()];

        let res = folder::moved(&current, child.id, Some(grand.id));
        assert_eq!(
            res,
            Err(FolderError::Cycle {
                folder: child.id,
                target: grand.id
            })
        );
        assert!(folder::moved(&current, root.id, Some(root.id)).is_err());

        let proposed = folder::moved(&current, grand.id, None).unwrap();
        assert!(proposed[2].parent_id.is_none());
        let proposed = folder::moved(&current, grand.id, Some(root.id)).unwrap();
        assert_eq!(proposed[2].parent_id, Some(root.id));
    }

    #[test]
    fn delete_folder_recursively() {
        let root = Folder::new("root", None);
        let child = Folder::new("child", Some(root.id));
        let grand = Folder::new("grand", Some(child.id));
        let other = Folder::new("other", None);
        let current = vec![root.clone(), child.clone(), grand.clone(), other.clone()];

        let proposed = folder::without_folder(&current, child.id);
        let ids: Vec<_> = proposed.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![root.id, other.id]);
    }

    #[test]
    fn path_of_walks_to_root() {
        let root = Folder::new("root", None);
        let child = Folder::new("child", Some(root.id));
        let grand = Folder::new("grand", Some(child.id));
        let store = FolderStore::from_folders(vec![grand.clone(), child, root]);
        assert_eq!(store.path_of(grand.id), vec!["root", "child", "grand"]);
    }

    #[test]
    fn documents_filter_by_folder() {
        let folder = Folder::new("f", None);
        let inside = Document::new("a.pdf", "application/pdf", 10, Some(folder.id));
        let loose = Document::new("b.pdf", "application/pdf", 10, None);
        let dangling = Document::new("c.pdf", "application/pdf", 10, Some(Uuid::new_v4()));
        let store = DocumentStore::from_documents(vec![inside.clone(), loose.clone(), dangling.clone()]);

        let filed: Vec<_> = store.in_folder(folder.id).map(|d| d.id).collect();
        assert_eq!(filed, vec![inside.id]);

        let known: HashSet<Uuid> = [folder.id].into_iter().collect();
        let unfiled: Vec<_> = store.unfiled(&known).map(|d| d.id).collect();
        assert_eq!(unfiled, vec![loose.id, dangling.id]);
    }

    #[test]
    fn replace_document_swaps_by_id() {
        let doc = Document::new("a.pdf", "application/pdf", 10, None);
        let mut store = DocumentStore::from_documents(vec![doc.clone()]);
        let mut edited = doc.clone();
        edited.tags.push("tax".to_string());
        assert!(store.replace_document(edited));
        assert_eq!(store.get(doc.id).unwrap().tags, vec!["tax"]);

        let stranger = Document::new("x.pdf", "application/pdf", 1, None);
        assert!(!store.replace_document(stranger));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn new_document_defaults() {
        let doc = Document::new("report.pdf", "application/pdf", 2 * 1024 * 1024, None);
        assert_eq!(doc.version, 1);
        assert!(doc.acl.is_empty());
        assert!(doc.url.starts_with("blob:"));
        assert!(doc.is_pdf());
        assert_eq!(doc.size_mib(), 2.0);
        assert_eq!(doc.created_at, doc.updated_at);
    }

    #[test]
    fn unfiled_from_clears_removed_folders() {
        let kept = Uuid::new_v4();
        let gone = Uuid::new_v4();
        let docs = vec![
            Document::new("a", "application/pdf", 1, Some(kept)),
            Document::new("b", "application/pdf", 1, Some(gone)),
        ];
        let removed: HashSet<Uuid> = [gone].into_iter().collect();
        let proposed = document::unfiled_from(&docs, &removed);
        assert_eq!(proposed[0].folder_id, Some(kept));
        assert_eq!(proposed[1].folder_id, None);
    }
}
