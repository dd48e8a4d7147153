pub mod squarify;

use std::collections::HashMap;

use compact_str::CompactString;
use rayon::prelude::*;

use crate::data::DataItem;
pub use squarify::{squarify, worst_ratio, PositionedItem, WeightedItem};

/// A laid-out rectangle; `key` indexes the `DataItem` slice the layout came from.
pub type LayoutRect = PositionedItem<usize>;

/// The full layout result (rects + fast lookup).
#[derive(Debug, Clone, Default)]
pub struct Layout {
    /// One rectangle per kept item, in row-assignment order.
    pub rects: Vec<LayoutRect>,
    /// id → index into `rects` (hover, tooltip, highlighting)
    pub index_by_id: HashMap<CompactString, usize>,
    pub width: f64,
    pub height: f64,
}

impl Layout {
    pub fn rect_for(&self, id: &str) -> Option<&LayoutRect> {
        self.index_by_id.get(id).and_then(|&i| self.rects.get(i))
    }

    pub fn total_area(&self) -> f64 {
        self.rects.iter().map(|r| r.area()).sum()
    }

    /// Largest stretch among non-empty rectangles (1.0 when there are none).
    pub fn worst_aspect_ratio(&self) -> f64 {
        self.rects
            .iter()
            .filter_map(|r| r.aspect_ratio())
            .fold(1.0, f64::max)
    }
}

/// Compute the treemap for `items` inside a `width` x `height` container.
///
/// Items with a negative or non-finite value are left out. The rest are sorted
/// largest first and scaled so their areas add up to the container area.
pub fn compute_layout(items: &[DataItem], width: f64, height: f64) -> Layout {
    let mut layout = Layout {
        width,
        height,
        ..Layout::default()
    };
    if items.is_empty() || !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return layout;
    }

    let mut kept: Vec<usize> = (0..items.len())
        .filter(|&i| items[i].value.is_finite() && items[i].value >= 0.0)
        .collect();
    if kept.len() < items.len() {
        tracing::debug!(
            "Layout: dropped {} of {} items with negative or non-finite values",
            items.len() - kept.len(),
            items.len()
        );
    }
    // Largest first (critical for good squarified layout); stable for ties.
    kept.sort_by(|&a, &b| items[b].value.total_cmp(&items[a].value));

    let total_value: f64 = kept.iter().map(|&i| items[i].value).sum();
    if total_value <= 0.0 {
        layout.rects = kept
            .iter()
            .map(|&i| LayoutRect {
                key: i,
                scaled_value: 0.0,
                x: 0.0,
                y: 0.0,
                w: 0.0,
                h: 0.0,
            })
            .collect();
    } else {
        let total_area = width * height;
        let weighted: Vec<WeightedItem<usize>> = kept
            .iter()
            .map(|&i| WeightedItem::new(i, items[i].value / total_value * total_area))
            .collect();
        layout.rects.reserve(weighted.len());
        squarify(&weighted, 0.0, 0.0, width, height, &mut layout.rects);
    }

    layout.index_by_id = layout
        .rects
        .iter()
        .enumerate()
        .map(|(idx, rect)| (items[rect.key].id.clone(), idx))
        .collect();

    tracing::debug!(
        "Layout computed: {} rects in {:.0}x{:.0}, worst aspect {:.2}",
        layout.rects.len(),
        width,
        height,
        layout.worst_aspect_ratio()
    );
    layout
}

/// Lay the same items out for several container sizes at once.
///
/// Each layout is independent, so they run in parallel; the result order
/// follows `viewports`.
pub fn compute_layouts(items: &[DataItem], viewports: &[(f64, f64)]) -> Vec<Layout> {
    viewports
        .par_iter()
        .map(|&(w, h)| compute_layout(items, w, h))
        .collect()
}
