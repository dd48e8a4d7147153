use serde_json::Value;

use crate::data::DataItem;

/// Distance between the cursor and the tooltip corner (px).
pub const CURSOR_OFFSET: f32 = 15.0;
/// Size assumed when the text can't be measured.
pub const ESTIMATED_SIZE: (f32, f32) = (200.0, 80.0);
pub const MIN_WIDTH: f32 = 100.0;

/// Information to display in the tooltip when hovering over a box.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipInfo {
    pub lines: Vec<String>,
}

/// Build tooltip info for an item: id, value, then any requested extra fields
/// the record actually has.
pub fn build_tooltip(item: &DataItem, extra_fields: &[String]) -> TooltipInfo {
    let mut lines = vec![
        format!("ID: {}", item.id),
        format!("Value: {:.2}", item.value),
    ];
    if let Some(label) = &item.label {
        lines.insert(0, label.to_string());
    }
    for name in extra_fields {
        if let Some(value) = item.fields.get(name) {
            lines.push(format!("{}: {}", name, format_field(value)));
        }
    }
    TooltipInfo { lines }
}

fn format_field(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format!("{f:.2}"),
            _ => n.to_string(),
        },
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// Top-left corner for a tooltip of `size` next to the cursor.
///
/// The tooltip sits below-right of the cursor, flips to the other side of
/// the cursor when it would leave the container, and never starts left of or
/// above the container.
pub fn place_tooltip(mouse: (f32, f32), size: (f32, f32), container: [f32; 4]) -> (f32, f32) {
    let (mx, my) = mouse;
    let (w, h) = size;
    let [left, top, right, bottom] = container;

    let mut x = mx + CURSOR_OFFSET;
    let mut y = my + CURSOR_OFFSET;
    if x + w > right {
        x = mx - w - CURSOR_OFFSET;
    }
    if y + h > bottom {
        y = my - h - CURSOR_OFFSET;
    }
    (x.max(left), y.max(top))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CONTAINER: [f32; 4] = [0.0, 0.0, 800.0, 600.0];

    #[test]
    fn default_content_has_id_and_value() {
        let info = build_tooltip(&DataItem::new("abc", 12.0), &[]);
        assert_eq!(info.lines, vec!["ID: abc", "Value: 12.00"]);
    }

    #[test]
    fn extra_fields_are_appended_when_present() {
        let mut item = DataItem::new("abc", 1.0);
        item.label = Some("Alpha".into());
        item.fields.insert("sector".into(), json!("tech"));
        item.fields.insert("change".into(), json!(-1.234));
        item.fields.insert("count".into(), json!(7));

        let fields = ["sector", "change", "count", "missing"].map(String::from);
        let info = build_tooltip(&item, &fields);
        assert_eq!(
            info.lines,
            vec!["Alpha", "ID: abc", "Value: 1.00", "sector: tech", "change: -1.23", "count: 7"]
        );
    }

    #[test]
    fn sits_below_right_of_cursor() {
        assert_eq!(place_tooltip((100.0, 100.0), ESTIMATED_SIZE, CONTAINER), (115.0, 115.0));
    }

    #[test]
    fn flips_near_right_and_bottom_edges() {
        let (x, y) = place_tooltip((700.0, 550.0), ESTIMATED_SIZE, CONTAINER);
        assert_eq!((x, y), (485.0, 455.0));
    }

    #[test]
    fn clamps_to_container_origin() {
        // Too wide for either side of the cursor: pinned to the left edge.
        let (x, y) = place_tooltip((50.0, 40.0), (790.0, 590.0), CONTAINER);
        assert_eq!((x, y), (0.0, 0.0));

        let (x, y) = place_tooltip((50.0, 40.0), (790.0, 590.0), [10.0, 20.0, 800.0, 600.0]);
        assert_eq!((x, y), (10.0, 20.0));
    }
}
