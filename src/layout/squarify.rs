//! Squarified treemap layout (Bruls, Huizing & van Wijk 2000).
//!
//! The entry point is [`squarify`]: it slices a rectangle into strips along its
//! longer side, growing each strip greedily while the worst aspect ratio of the
//! strip does not get worse, then recurses on whatever is left.

/// Below this extent a leftover rectangle is treated as empty.
const MIN_EXTENT: f64 = 0.001;

/// An item to lay out: an opaque key plus the area it must cover.
///
/// `scaled_value` is already expressed in target area units, i.e. the values of
/// the full input list sum to `w * h` of the root rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedItem<K> {
    pub key: K,
    pub scaled_value: f64,
}

impl<K> WeightedItem<K> {
    pub fn new(key: K, scaled_value: f64) -> Self {
        Self { key, scaled_value }
    }
}

impl<K: Clone> WeightedItem<K> {
    fn place(&self, x: f64, y: f64, w: f64, h: f64) -> PositionedItem<K> {
        PositionedItem {
            key: self.key.clone(),
            scaled_value: self.scaled_value,
            x,
            y,
            w,
            h,
        }
    }
}

/// A [`WeightedItem`] with its resolved rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedItem<K> {
    pub key: K,
    pub scaled_value: f64,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl<K> PositionedItem<K> {
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// Width/height stretch, always >= 1. `None` for collapsed rectangles.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.w <= 0.0 || self.h <= 0.0 {
            return None;
        }
        Some((self.w / self.h).max(self.h / self.w))
    }

    /// Half-open containment test; collapsed rectangles contain nothing.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }
}

/// Worst (largest) aspect ratio any item of `row` would get if the row were laid
/// out as one strip of length `short_side`.
///
/// Returns `f64::INFINITY` for an empty row, a zero side or a zero-weight row.
pub fn worst_ratio<K>(row: &[WeightedItem<K>], short_side: f64) -> f64 {
    if row.is_empty() || short_side == 0.0 {
        return f64::INFINITY;
    }
    let sum: f64 = row.iter().map(|item| item.scaled_value).sum();
    if sum == 0.0 {
        return f64::INFINITY;
    }

    let strip_width = sum / short_side;
    row.iter()
        .map(|item| {
            let item_length = item.scaled_value / strip_width;
            (item_length / strip_width).max(strip_width / item_length)
        })
        .fold(0.0, f64::max)
}

/// Lay `nodes` out inside `(x, y, w, h)`, appending one record per node to `out`.
///
/// `nodes` should be sorted by descending `scaled_value`; unsorted input still
/// fills the rectangle but with worse aspect ratios.
pub fn squarify<K: Clone>(
    nodes: &[WeightedItem<K>],
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    out: &mut Vec<PositionedItem<K>>,
) {
    let Some((first, rest)) = nodes.split_first() else {
        return;
    };
    if rest.is_empty() {
        out.push(first.place(x, y, w, h));
        return;
    }

    let short_side = w.min(h);
    let horizontal = w >= h;

    // The current row is always a prefix of `nodes`.
    let mut row_len = 0;
    let mut row_sum = 0.0;
    let mut worst = f64::INFINITY;
    for node in nodes {
        let candidate_sum = row_sum + node.scaled_value;
        if candidate_sum == 0.0 {
            row_len += 1;
            continue;
        }
        let candidate_worst = worst_ratio(&nodes[..=row_len], short_side);
        if row_len == 0 || candidate_worst <= worst {
            row_len += 1;
            row_sum = candidate_sum;
            worst = candidate_worst;
        } else {
            break;
        }
    }

    let (row, remaining) = nodes.split_at(row_len);
    let total: f64 = nodes.iter().map(|n| n.scaled_value).sum();
    let proportion = if total > 0.0 { row_sum / total } else { 0.0 };
    // Zero-weight rows share the strip evenly.
    let share = |node: &WeightedItem<K>| {
        if row_sum > 0.0 {
            node.scaled_value / row_sum
        } else {
            1.0 / row.len() as f64
        }
    };

    if horizontal {
        let strip_w = proportion * w;
        let mut cursor = y;
        for node in row {
            let item_h = share(node) * h;
            out.push(node.place(x, cursor, strip_w, item_h));
            cursor += item_h;
        }

        if remaining.is_empty() {
            return;
        }
        if w - strip_w > MIN_EXTENT && h > MIN_EXTENT {
            squarify(remaining, x + strip_w, y, w - strip_w, h, out);
        } else {
            collapse(remaining, x + strip_w, y, out);
        }
    } else {
        let strip_h = proportion * h;
        let mut cursor = x;
        for node in row {
            let item_w = share(node) * w;
            out.push(node.place(cursor, y, item_w, strip_h));
            cursor += item_w;
        }

        if remaining.is_empty() {
            return;
        }
        if w > MIN_EXTENT && h - strip_h > MIN_EXTENT {
            squarify(remaining, x, y + strip_h, w, h - strip_h, out);
        } else {
            collapse(remaining, x, y + strip_h, out);
        }
    }
}

/// Leftover space is negligible: give every remaining node an empty rectangle at
/// the strip boundary so none of them goes missing.
fn collapse<K: Clone>(nodes: &[WeightedItem<K>], x: f64, y: f64, out: &mut Vec<PositionedItem<K>>) {
    tracing::debug!(
        "Squarify: {} nodes collapsed at ({:.3}, {:.3}), no room left",
        nodes.len(),
        x,
        y
    );
    out.extend(nodes.iter().map(|node| node.place(x, y, 0.0, 0.0)));
}
