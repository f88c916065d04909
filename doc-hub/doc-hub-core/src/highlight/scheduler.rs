//! Debounced highlight recomputation.
//!
//! Geometry can only be queried once the text layer has been laid out, so
//! every change of keyword, page or zoom schedules a delayed recomputation.
//! A newer schedule aborts the pending one.

use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

use super::{HighlightLocator, HighlightResult, RangeGeometry, TextLayer, UniformAdvance};
use crate::events::{Event, EventBus};

/// Supplies the rendered text layer for a page at a zoom level.
pub trait TextLayerSource: Send + Sync {
    /// `None` while the page has not been rendered yet.
    fn text_layer(&self, page: u32, scale: f64) -> Option<TextLayer>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct HighlightQuery {
    pub keyword: String,
    pub page: u32,
    pub scale: f64,
}

pub struct HighlightScheduler {
    source: Arc<dyn TextLayerSource>,
    geometry: Arc<dyn RangeGeometry>,
    result: Arc<RwLock<HighlightResult>>,
    events: EventBus,
    delay: Duration,
    pending: AsyncMutex<Option<JoinHandle<()>>>,
}

impl HighlightScheduler {
    pub fn new(source: Arc<dyn TextLayerSource>, events: EventBus, delay: Duration) -> Self {
        Self {
            source,
            geometry: Arc::new(UniformAdvance),
            result: Arc::new(RwLock::new(HighlightResult::default())),
            events,
            delay,
            pending: AsyncMutex::new(None),
        }
    }

    /// Measure matches with the layout engine's own geometry.
    pub fn with_geometry(mut self, geometry: Arc<dyn RangeGeometry>) -> Self {
        self.geometry = geometry;
        self
    }

    async fn recompute(
        source: Arc<dyn TextLayerSource>,
        geometry: Arc<dyn RangeGeometry>,
        result: Arc<RwLock<HighlightResult>>,
        events: EventBus,
        delay: Duration,
        query: HighlightQuery,
    ) {
        sleep(delay).await;
        let Some(layer) = source.text_layer(query.page, query.scale) else {
            tracing::debug!(page = query.page, "text layer not ready, keeping highlights");
            return;
        };
        let found = HighlightLocator::with_geometry(geometry).locate(&layer, &query.keyword);
        tracing::debug!(
            page = query.page,
            matches = found.match_count,
            "highlights recomputed"
        );
        let matches = found.match_count;
        *result.write().await = found;
        events.send(Event::HighlightsUpdated {
            page: query.page,
            matches,
        });
    }

    /// Replace any pending recomputation with one for `query`.
    ///
    /// A blank keyword clears the highlights immediately.
    pub async fn schedule(&self, query: HighlightQuery) {
        let mut pending = self.pending.lock().await;
        if let Some(handle) = pending.take() {
            handle.abort();
        }
        if query.keyword.trim().is_empty() {
            *self.result.write().await = HighlightResult::default();
            self.events.send(Event::HighlightsUpdated {
                page: query.page,
                matches: 0,
            });
            return;
        }
        let handle = tokio::spawn(Self::recompute(
            self.source.clone(),
            self.geometry.clone(),
            self.result.clone(),
            self.events.clone(),
            self.delay,
            query,
        ));
        *pending = Some(handle);
    }

    /// Abort the pending recomputation, if any.
    pub async fn cancel(&self) {
        if let Some(handle) = self.pending.lock().await.take() {
            handle.abort();
        }
    }

    pub async fn current(&self) -> HighlightResult {
        self.result.read().await.clone()
    }
}
