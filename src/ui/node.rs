use crate::data::DataItem;
use crate::layout::LayoutRect;
use crate::render::colors::AppColor;
use crate::render::theme::TreemapTheme;

/// Boxes at or below this size (px) get no default content.
const MIN_CONTENT_W: f32 = 20.0;
const MIN_CONTENT_H: f32 = 15.0;

/// How one treemap box should be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeVisual {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub fill: AppColor,
    pub border: AppColor,
    pub border_width: f32,
    pub show_content: bool,
}

/// Resolve the on-screen box for a laid-out item.
///
/// `gap` is split evenly around the rectangle. Returns `None` when nothing would
/// be visible.
pub fn node_visual(
    rect: &LayoutRect,
    item: &DataItem,
    hovered: bool,
    positive_threshold: f64,
    gap: f32,
    theme: &TreemapTheme,
) -> Option<NodeVisual> {
    let w = (rect.w as f32 - gap).max(0.0);
    let h = (rect.h as f32 - gap).max(0.0);
    if w <= 0.0 || h <= 0.0 {
        return None;
    }

    let coloring = item.coloring_value();
    let mut fill = if coloring > positive_threshold {
        theme.node_positive_background
    } else if coloring < 0.0 {
        theme.node_negative_background
    } else {
        theme.node_default_background
    };
    if hovered {
        if let Some(hover_fill) = theme.node_hover_background {
            fill = hover_fill;
        }
    }

    Some(NodeVisual {
        x: rect.x as f32 + gap / 2.0,
        y: rect.y as f32 + gap / 2.0,
        w,
        h,
        fill,
        border: if hovered {
            theme.node_hover_border
        } else {
            theme.node_border
        },
        border_width: theme.node_border_width,
        show_content: w > MIN_CONTENT_W && h > MIN_CONTENT_H,
    })
}

/// Default box text: the id (or label) line and the value line.
pub fn content_lines(item: &DataItem) -> [String; 2] {
    [
        format!("ID: {}", item.display_name()),
        format!("Val: {:.2}", item.value),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> LayoutRect {
        LayoutRect {
            key: 0,
            scaled_value: w * h,
            x,
            y,
            w,
            h,
        }
    }

    #[test]
    fn gap_insets_the_box_on_both_sides() {
        let theme = TreemapTheme::default();
        let v = node_visual(&rect(10.0, 20.0, 100.0, 50.0), &DataItem::new("a", 1.0), false, 0.0, 4.0, &theme)
            .unwrap();
        assert_eq!((v.x, v.y, v.w, v.h), (12.0, 22.0, 96.0, 46.0));
        assert!(v.show_content);
    }

    #[test]
    fn boxes_smaller_than_the_gap_are_hidden() {
        let theme = TreemapTheme::default();
        let item = DataItem::new("a", 1.0);
        assert!(node_visual(&rect(0.0, 0.0, 4.0, 50.0), &item, false, 0.0, 4.0, &theme).is_none());
        assert!(node_visual(&rect(0.0, 0.0, 0.0, 0.0), &item, false, 0.0, 0.0, &theme).is_none());
    }

    #[test]
    fn small_boxes_drop_their_content() {
        let theme = TreemapTheme::default();
        let v = node_visual(&rect(0.0, 0.0, 24.0, 40.0), &DataItem::new("a", 1.0), false, 0.0, 4.0, &theme)
            .unwrap();
        assert_eq!(v.w, 20.0);
        assert!(!v.show_content);
    }

    #[test]
    fn fill_follows_coloring_value() {
        let theme = TreemapTheme::default();
        let r = rect(0.0, 0.0, 50.0, 50.0);

        let positive = node_visual(&r, &DataItem::new("a", 5.0), false, 0.0, 0.0, &theme).unwrap();
        assert_eq!(positive.fill, theme.node_positive_background);

        let neutral = node_visual(&r, &DataItem::new("a", 5.0), false, 10.0, 0.0, &theme).unwrap();
        assert_eq!(neutral.fill, theme.node_default_background);

        let mut falling = DataItem::new("a", 5.0);
        falling.color_value = Some(-1.5);
        let negative = node_visual(&r, &falling, false, 0.0, 0.0, &theme).unwrap();
        assert_eq!(negative.fill, theme.node_negative_background);
    }

    #[test]
    fn hover_swaps_border_and_optional_fill() {
        let mut theme = TreemapTheme::default();
        let r = rect(0.0, 0.0, 50.0, 50.0);
        let item = DataItem::new("a", 5.0);

        let v = node_visual(&r, &item, true, 0.0, 0.0, &theme).unwrap();
        assert_eq!(v.border, theme.node_hover_border);
        assert_eq!(v.fill, theme.node_positive_background);

        let hover_fill = AppColor::new(0.0, 0.0, 1.0);
        theme.node_hover_background = Some(hover_fill);
        let v = node_visual(&r, &item, true, 0.0, 0.0, &theme).unwrap();
        assert_eq!(v.fill, hover_fill);
    }

    #[test]
    fn content_uses_label_and_two_decimals() {
        let mut item = DataItem::new("x1", 3.14159);
        assert_eq!(content_lines(&item), ["ID: x1".to_string(), "Val: 3.14".to_string()]);
        item.label = Some("Widgets".into());
        assert_eq!(content_lines(&item)[0], "ID: Widgets");
    }
}
