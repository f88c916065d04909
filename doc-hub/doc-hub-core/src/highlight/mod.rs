//! Keyword highlighting over a rendered page's text layer.
//!
//! The layout engine is an external collaborator: it hands over text
//! fragments in render order together with the viewport boxes of the lines
//! they occupy. Matching is naive, case-folded, non-overlapping and left to
//! right; the output rectangles are paint hints relative to the layer
//! origin, not exact glyph geometry.

use serde::{Deserialize, Serialize};

pub mod scheduler;

pub use scheduler::{HighlightQuery, HighlightScheduler, TextLayerSource};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Express `self` relative to `origin`'s top-left corner.
    pub fn relative_to(&self, origin: &Rect) -> Rect {
        Rect {
            top: self.top - origin.top,
            left: self.left - origin.left,
            width: self.width,
            height: self.height,
        }
    }
}

/// Viewport box of one visual line of a fragment, covering the chars
/// `start..end` of the fragment's text.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LineBox {
    pub start: usize,
    pub end: usize,
    pub rect: Rect,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TextFragment {
    pub text: String,
    pub lines: Vec<LineBox>,
}

impl TextFragment {
    /// A fragment laid out on a single line.
    pub fn new(text: impl Into<String>, rect: Rect) -> Self {
        let text = text.into();
        let end = text.chars().count();
        Self {
            text,
            lines: vec![LineBox { start: 0, end, rect }],
        }
    }

    /// A fragment that wraps over several lines.
    pub fn wrapped(text: impl Into<String>, lines: Vec<LineBox>) -> Self {
        Self {
            text: text.into(),
            lines,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TextLayer {
    /// Viewport box of the layer itself.
    pub origin: Rect,
    pub fragments: Vec<TextFragment>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct HighlightResult {
    pub rects: Vec<Rect>,
    pub match_count: usize,
}

impl HighlightResult {
    pub fn is_empty(&self) -> bool {
        self.match_count == 0
    }
}

/// Maps a char range of a fragment to viewport rectangles, one per visual
/// line the range touches.
pub trait RangeGeometry: Send + Sync {
    fn client_rects(&self, fragment: &TextFragment, start: usize, end: usize) -> Vec<Rect>;
}

impl<G: RangeGeometry + ?Sized> RangeGeometry for std::sync::Arc<G> {
    fn client_rects(&self, fragment: &TextFragment, start: usize, end: usize) -> Vec<Rect> {
        (**self).client_rects(fragment, start, end)
    }
}

/// Spreads each line box evenly across its characters.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformAdvance;

impl RangeGeometry for UniformAdvance {
    fn client_rects(&self, fragment: &TextFragment, start: usize, end: usize) -> Vec<Rect> {
        fragment
            .lines
            .iter()
            .filter_map(|line| {
                let s = start.max(line.start);
                let e = end.min(line.end);
                if s >= e {
                    return None;
                }
                let advance = line.rect.width / (line.end - line.start) as f64;
                Some(Rect {
                    top: line.rect.top,
                    left: line.rect.left + advance * (s - line.start) as f64,
                    width: advance * (e - s) as f64,
                    height: line.rect.height,
                })
            })
            .collect()
    }
}

pub struct HighlightLocator<G = UniformAdvance> {
    geometry: G,
}

impl HighlightLocator<UniformAdvance> {
    pub fn new() -> Self {
        Self {
            geometry: UniformAdvance,
        }
    }
}

impl Default for HighlightLocator<UniformAdvance> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: RangeGeometry> HighlightLocator<G> {
    pub fn with_geometry(geometry: G) -> Self {
        Self { geometry }
    }

    /// Find every occurrence of `keyword` in the layer.
    pub fn locate(&self, layer: &TextLayer, keyword: &str) -> HighlightResult {
        if keyword.trim().is_empty() {
            return HighlightResult::default();
        }
        let needle: Vec<char> = keyword.chars().collect();
        let mut result = HighlightResult::default();
        for fragment in &layer.fragments {
            let hay: Vec<char> = fragment.text.chars().collect();
            let mut from = 0;
            while let Some(at) = find_folded(&hay, &needle, from) {
                let end = at + needle.len();
                result.rects.extend(
                    self.geometry
                        .client_rects(fragment, at, end)
                        .iter()
                        .map(|r| r.relative_to(&layer.origin)),
                );
                result.match_count += 1;
                from = end;
            }
        }
        result
    }
}

/// Convenience wrapper using [`UniformAdvance`].
pub fn locate(layer: &TextLayer, keyword: &str) -> HighlightResult {
    HighlightLocator::new().locate(layer, keyword)
}

fn same_folded(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Char index of the first case-insensitive occurrence of `needle` in
/// `hay` at or after `from`.
fn find_folded(hay: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || hay.len() < needle.len() {
        return None;
    }
    (from..=hay.len() - needle.len()).find(|&i| {
        hay[i..i + needle.len()]
            .iter()
            .zip(needle)
            .all(|(a, b)| same_folded(*a, *b))
    })
}
