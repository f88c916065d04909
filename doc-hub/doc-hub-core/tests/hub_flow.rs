use doc_hub_core::blob::{DirStorage, LocalStorage, StoredFile};
use doc_hub_core::config::HubConfig;
use doc_hub_core::events::Event;
use doc_hub_core::highlight::{HighlightScheduler, Rect, TextFragment, TextLayer, TextLayerSource};
use doc_hub_core::hub::DocumentHub;
use doc_hub_core::storage::Folder;
use doc_hub_core::tree::{SkipReason, TreeRow};
use doc_hub_core::upload::MemoryFile;
use doc_hub_core::viewer::ViewerState;
use std::sync::Arc;
use std::time::Duration;

struct OnePage;

impl TextLayerSource for OnePage {
    fn text_layer(&self, page: u32, scale: f64) -> Option<TextLayer> {
        if page != 2 {
            return Some(TextLayer::default());
        }
        Some(TextLayer {
            origin: Rect::new(0.0, 0.0, 600.0 * scale, 800.0 * scale),
            fragments: vec![TextFragment::new(
                "Quarterly revenue and revenue forecast",
                Rect::new(40.0 * scale, 20.0 * scale, 380.0 * scale, 14.0 * scale),
            )],
        })
    }
}

#[tokio::test]
async fn upload_then_view_then_highlight() {
    let dir = tempfile::tempdir().unwrap();
    let storage: Arc<dyn LocalStorage> = Arc::new(DirStorage::new(dir.path()).unwrap());
    let mut hub = DocumentHub::with_defaults(HubConfig::default(), storage.clone());

    let images = hub
        .folders()
        .iter()
        .find(|f| f.name == "Images")
        .map(|f| f.id)
        .unwrap();
    hub.select_folder(images);

    let mut draft = hub
        .begin_upload(Box::new(MemoryFile::new(
            "q3.pdf",
            "application/pdf",
            &b"%PDF-1.7 quarterly"[..],
        )))
        .unwrap();
    draft.metadata.title = "Q3 report".to_string();
    let id = hub.upload(&draft).await.unwrap();

    // one stored object, readable back as the stored-file shape
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
    let path = entries[0].as_ref().unwrap().path();
    let stored: StoredFile = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(stored.metadata.title, "Q3 report");

    hub.toggle_folder(images);
    let rows = hub.rows();
    assert!(rows
        .iter()
        .any(|r| matches!(r, TreeRow::Document { id: d, depth: 1, .. } if *d == id)));

    let doc = hub.selected_document().unwrap();
    assert!(doc.is_pdf());

    let mut rx = hub.events().subscribe();
    let scheduler = HighlightScheduler::new(
        Arc::new(OnePage),
        hub.events().clone(),
        Duration::from_millis(10),
    );
    let mut viewer = ViewerState::new();
    viewer.on_load(3);
    viewer.next_page();
    let query = viewer.set_keyword("REVENUE").unwrap();
    scheduler.schedule(query).await;

    let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event, Event::HighlightsUpdated { page: 2, matches: 2 });
    let result = scheduler.current().await;
    assert_eq!(result.rects.len(), 2);
    assert_eq!(result.rects[0].top, 40.0);
}

#[test]
fn corrupted_hierarchy_still_renders() {
    let storage: Arc<dyn LocalStorage> = Arc::new(doc_hub_core::blob::InMemoryStorage::new());
    let mut hub = DocumentHub::new(HubConfig::default(), storage);

    let root = Folder::new("Root", None);
    let mut a = Folder::new("A", None);
    let mut b = Folder::new("B", None);
    a.parent_id = Some(b.id);
    b.parent_id = Some(a.id);
    let orphan = Folder::new("Orphan", Some(uuid::Uuid::new_v4()));
    hub.replace_folders(vec![root.clone(), a.clone(), b.clone(), orphan.clone()]);

    let tree = hub.tree();
    assert_eq!(tree.folder_ids(), vec![root.id]);
    let reasons: Vec<_> = tree.skipped.iter().map(|s| (s.id, s.reason)).collect();
    assert!(reasons.contains(&(a.id, SkipReason::Cycle)));
    assert!(reasons.contains(&(b.id, SkipReason::Cycle)));
    assert!(reasons.contains(&(orphan.id, SkipReason::MissingParent)));

    hub.expand_all();
    assert_eq!(hub.rows().len(), 1);
}
