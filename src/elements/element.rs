//! Drawable element model for the streamed diagram wire format.
//!
//! Records arrive as a JSON array that is usually truncated mid-stream, so
//! every field except `type` and `id` carries a serde default: a record that
//! decoded at all is usable, and downstream code never assumes a field is
//! present. `seed` and `version` are not semantically meaningful geometry —
//! `seed` only drives the hand-drawn jitter of the external renderer and
//! `version` is bumped by interactive editors so baselines can detect edits.

use serde::{Deserialize, Serialize};

/// A decoded-but-unclassified record. Kept as loose JSON because a truncated
/// stream can produce structurally valid records with arbitrary holes.
pub type RawRecord = serde_json::Value;

pub fn default_version() -> u64 {
    1
}

pub fn default_opacity() -> f64 {
    100.0
}

/// Text attached to a shape (as opposed to a free-standing text element,
/// which carries its string in `text`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<String>,
}

/// Reference from an arrow endpoint to the element it is bound to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementBinding {
    pub element_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<f64>,
}

/// One drawable unit. `kind` is an open set ("rectangle", "ellipse",
/// "diamond", "arrow", "text", "freedraw", "line", ...); unknown kinds are
/// passed through to the drawing backend untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    /// Point offsets from (x, y), used by lines/arrows/freedraw.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<[f64; 2]>>,

    /// Free-standing text content (text elements).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Label attached to a shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roundness: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_binding: Option<ElementBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_binding: Option<ElementBinding>,

    /// Cosmetic jitter seed for the hand-drawn look. Re-randomized on partial
    /// renders, left alone on final ones.
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_version")]
    pub version: u64,
}

impl DrawElement {
    /// Decode a raw record defensively. Returns `None` when the record lacks
    /// a usable `type` or `id` — the caller skips it and keeps going.
    pub fn from_raw(raw: &RawRecord) -> Option<DrawElement> {
        let el: DrawElement = serde_json::from_value(raw.clone()).ok()?;
        if el.id.is_empty() || el.kind.is_empty() {
            return None;
        }
        Some(el)
    }

    /// Human-readable text for diff output: the attached label if present,
    /// otherwise the element's own text, otherwise empty.
    pub fn display_text(&self) -> &str {
        if let Some(label) = &self.label {
            if !label.text.is_empty() {
                return &label.text;
            }
        }
        self.text.as_deref().unwrap_or("")
    }
}

/// Minimum (x, y) over all elements, used to translate scene coordinates into
/// the displayed frame. Returns (0, 0) for an empty list.
pub fn min_bounds(elements: &[DrawElement]) -> (f64, f64) {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    for el in elements {
        min_x = min_x.min(el.x);
        min_y = min_y.min(el.y);
    }
    if min_x.is_finite() && min_y.is_finite() {
        (min_x, min_y)
    } else {
        (0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_raw_accepts_minimal_record() {
        let raw = json!({"type": "rectangle", "id": "r1", "x": 10, "y": 20, "width": 100, "height": 50});
        let el = DrawElement::from_raw(&raw).unwrap();
        assert_eq!(el.id, "r1");
        assert_eq!(el.kind, "rectangle");
        assert_eq!(el.x, 10.0);
        assert_eq!(el.version, 1);
        assert_eq!(el.opacity, 100.0);
    }

    #[test]
    fn from_raw_rejects_missing_id() {
        let raw = json!({"type": "rectangle", "x": 0});
        assert!(DrawElement::from_raw(&raw).is_none());
        let raw = json!({"id": "a", "x": 0});
        assert!(DrawElement::from_raw(&raw).is_none());
        assert!(DrawElement::from_raw(&json!("not an object")).is_none());
    }

    #[test]
    fn display_text_prefers_label() {
        let raw = json!({"type": "rectangle", "id": "r", "label": {"text": "Box"}, "text": "raw"});
        let el = DrawElement::from_raw(&raw).unwrap();
        assert_eq!(el.display_text(), "Box");

        let raw = json!({"type": "text", "id": "t", "text": "Hello"});
        let el = DrawElement::from_raw(&raw).unwrap();
        assert_eq!(el.display_text(), "Hello");
    }

    #[test]
    fn min_bounds_over_elements() {
        let a = DrawElement::from_raw(&json!({"type": "rectangle", "id": "a", "x": -40, "y": 12})).unwrap();
        let b = DrawElement::from_raw(&json!({"type": "ellipse", "id": "b", "x": 5, "y": -3})).unwrap();
        assert_eq!(min_bounds(&[a, b]), (-40.0, -3.0));
        assert_eq!(min_bounds(&[]), (0.0, 0.0));
    }
}
