use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "type")]
pub enum Event {
    FoldersReplaced { count: usize },
    FolderSelected { id: Uuid },
    DocumentUploaded { id: Uuid, folder_id: Option<Uuid> },
    DocumentUpdated { id: Uuid },
    DocumentsReplaced { count: usize },
    DocumentSelected { id: Uuid },
    DocumentClosed,
    HighlightsUpdated { page: u32, matches: usize },
}

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    pub fn send(&self, event: Event) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
