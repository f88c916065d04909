//! Page navigation and zoom of the PDF viewer.

use crate::highlight::HighlightQuery;

const MIN_SCALE_TENTHS: u8 = 5;
const MAX_SCALE_TENTHS: u8 = 20;
const DEFAULT_SCALE_TENTHS: u8 = 10;

/// Whether the viewer renders a preview for this media type.
pub fn supports_preview(media_type: &str) -> bool {
    media_type.contains("pdf")
}

/// Viewer controls. Every mutator returns the highlight query to schedule
/// when the change affects highlighting, and `None` otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewerState {
    page: u32,
    num_pages: u32,
    // zoom in tenths so repeated steps land exactly on the bounds
    scale_tenths: u8,
    keyword: String,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            page: 1,
            num_pages: 0,
            scale_tenths: DEFAULT_SCALE_TENTHS,
            keyword: String::new(),
        }
    }
}

impl ViewerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    pub fn scale(&self) -> f64 {
        f64::from(self.scale_tenths) / 10.0
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn query(&self) -> HighlightQuery {
        HighlightQuery {
            keyword: self.keyword.clone(),
            page: self.page,
            scale: self.scale(),
        }
    }

    fn last_page(&self) -> u32 {
        self.num_pages.max(1)
    }

    /// Record the page count once the document has loaded.
    pub fn on_load(&mut self, num_pages: u32) -> Option<HighlightQuery> {
        self.num_pages = num_pages;
        let page = self.page.clamp(1, self.last_page());
        self.set_page(page)
    }

    pub fn can_go_back(&self) -> bool {
        self.page > 1
    }

    pub fn can_go_forward(&self) -> bool {
        self.page < self.num_pages
    }

    pub fn next_page(&mut self) -> Option<HighlightQuery> {
        let page = self.page.saturating_add(1).min(self.last_page());
        self.set_page(page)
    }

    pub fn prev_page(&mut self) -> Option<HighlightQuery> {
        let page = self.page.saturating_sub(1).max(1);
        self.set_page(page)
    }

    pub fn go_to(&mut self, page: u32) -> Option<HighlightQuery> {
        let page = page.clamp(1, self.last_page());
        self.set_page(page)
    }

    fn set_page(&mut self, page: u32) -> Option<HighlightQuery> {
        if page == self.page {
            return None;
        }
        self.page = page;
        Some(self.query())
    }

    pub fn zoom_in(&mut self) -> Option<HighlightQuery> {
        self.set_scale_tenths((self.scale_tenths + 1).min(MAX_SCALE_TENTHS))
    }

    pub fn zoom_out(&mut self) -> Option<HighlightQuery> {
        self.set_scale_tenths(self.scale_tenths.saturating_sub(1).max(MIN_SCALE_TENTHS))
    }

    fn set_scale_tenths(&mut self, tenths: u8) -> Option<HighlightQuery> {
        if tenths == self.scale_tenths {
            return None;
        }
        self.scale_tenths = tenths;
        Some(self.query())
    }

    pub fn set_keyword(&mut self, keyword: impl Into<String>) -> Option<HighlightQuery> {
        let keyword = keyword.into();
        if keyword == self.keyword {
            return None;
        }
        self.keyword = keyword;
        Some(self.query())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_stays_in_bounds() {
        let mut viewer = ViewerState::new();
        assert_eq!(viewer.scale(), 1.0);
        for _ in 0..20 {
            viewer.zoom_in();
        }
        assert_eq!(viewer.scale(), 2.0);
        assert!(viewer.zoom_in().is_none());
        for _ in 0..30 {
            viewer.zoom_out();
        }
        assert_eq!(viewer.scale(), 0.5);
        assert!(viewer.zoom_out().is_none());

        let q = viewer.zoom_in().unwrap();
        assert_eq!(q.scale, 0.6);
    }

    #[test]
    fn pages_stay_in_bounds() {
        let mut viewer = ViewerState::new();
        // not loaded yet: nowhere to go
        assert!(viewer.next_page().is_none());
        assert!(viewer.prev_page().is_none());

        viewer.on_load(3);
        assert!(!viewer.can_go_back());
        assert!(viewer.can_go_forward());
        assert_eq!(viewer.next_page().unwrap().page, 2);
        assert_eq!(viewer.next_page().unwrap().page, 3);
        assert!(viewer.next_page().is_none());
        assert!(!viewer.can_go_forward());
        assert_eq!(viewer.go_to(0).unwrap().page, 1);
        assert_eq!(viewer.go_to(99).unwrap().page, 3);
    }

    #[test]
    fn next_page_at_max_page_count_stays_put() {
        let mut viewer = ViewerState::new();
        viewer.on_load(u32::MAX);
        viewer.go_to(u32::MAX);
        assert_eq!(viewer.page(), u32::MAX);
        assert!(viewer.next_page().is_none());
        assert_eq!(viewer.page(), u32::MAX);
    }

    #[test]
    fn reload_with_fewer_pages_clamps() {
        let mut viewer = ViewerState::new();
        viewer.on_load(10);
        viewer.go_to(8);
        let q = viewer.on_load(2).unwrap();
        assert_eq!(q.page, 2);
    }

    #[test]
    fn keyword_change_yields_query() {
        let mut viewer = ViewerState::new();
        viewer.on_load(4);
        viewer.go_to(2);
        let q = viewer.set_keyword("cat").unwrap();
        assert_eq!(
            q,
            HighlightQuery {
                keyword: "cat".to_string(),
                page: 2,
                scale: 1.0,
            }
        );
        assert!(viewer.set_keyword("cat").is_none());
    }

    #[test]
    fn preview_only_for_pdf() {
        assert!(supports_preview("application/pdf"));
        assert!(!supports_preview("application/msword"));
    }
}
