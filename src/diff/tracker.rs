//! Describes user edits as compact text instead of re-sending the scene.
//!
//! A baseline is captured once when the scene is handed to the interactive
//! editor; later the edited scene is compared against it. The fingerprint
//! (id:version pairs) is an early exit — identical fingerprints mean nothing
//! was edited and the detailed scan is skipped entirely.

use std::collections::HashMap;

use crate::elements::DrawElement;

fn fingerprint(elements: &[DrawElement]) -> String {
    let pairs: Vec<String> = elements
        .iter()
        .map(|el| format!("{}:{}", el.id, el.version))
        .collect();
    pairs.join(",")
}

fn round(v: f64) -> i64 {
    v.round() as i64
}

#[derive(Debug, Default)]
pub struct EditDiffTracker {
    baseline_fingerprint: String,
    baseline: HashMap<String, DrawElement>,
    baseline_order: Vec<String>,
    captured: bool,
}

impl EditDiffTracker {
    pub fn new() -> Self {
        EditDiffTracker::default()
    }

    pub fn has_baseline(&self) -> bool {
        self.captured
    }

    /// Snapshot the reference scene. Immutable until the next capture.
    pub fn capture_baseline(&mut self, elements: &[DrawElement]) {
        self.baseline_fingerprint = fingerprint(elements);
        self.baseline = elements.iter().map(|el| (el.id.clone(), el.clone())).collect();
        self.baseline_order = elements.iter().map(|el| el.id.clone()).collect();
        self.captured = true;
    }

    /// Compare an edited scene against the baseline. Returns an empty string
    /// when nothing changed.
    pub fn diff(&self, current: &[DrawElement]) -> String {
        if !self.captured || fingerprint(current) == self.baseline_fingerprint {
            return String::new();
        }

        let mut lines: Vec<String> = Vec::new();

        for el in current {
            if !self.baseline.contains_key(&el.id) {
                lines.push(format!(
                    "added {} \"{}\" at ({}, {})",
                    el.kind,
                    el.display_text(),
                    round(el.x),
                    round(el.y)
                ));
            }
        }

        let current_ids: HashMap<&str, &DrawElement> =
            current.iter().map(|el| (el.id.as_str(), el)).collect();

        for id in &self.baseline_order {
            if !current_ids.contains_key(id.as_str()) {
                lines.push(format!("removed {id}"));
            }
        }

        for id in &self.baseline_order {
            let (before, after) = match (self.baseline.get(id), current_ids.get(id.as_str())) {
                (Some(b), Some(a)) => (b, *a),
                _ => continue,
            };
            if round(before.x) != round(after.x)
                || round(before.y) != round(after.y)
                || round(before.width) != round(after.width)
                || round(before.height) != round(after.height)
            {
                lines.push(format!(
                    "{} -> ({}, {}) {}x{}",
                    id,
                    round(after.x),
                    round(after.y),
                    round(after.width),
                    round(after.height)
                ));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn el(id: &str, x: f64, y: f64) -> DrawElement {
        DrawElement::from_raw(&json!({"type": "rectangle", "id": id, "x": x, "y": y, "width": 100, "height": 50})).unwrap()
    }

    #[test]
    fn no_baseline_or_no_change_yields_empty() {
        let tracker = EditDiffTracker::new();
        assert_eq!(tracker.diff(&[el("a", 0.0, 0.0)]), "");

        let mut tracker = EditDiffTracker::new();
        let scene = vec![el("a", 0.0, 0.0), el("b", 10.0, 10.0)];
        tracker.capture_baseline(&scene);
        assert_eq!(tracker.diff(&scene), "");
    }

    #[test]
    fn reports_added_and_removed_not_unchanged() {
        let mut tracker = EditDiffTracker::new();
        tracker.capture_baseline(&[el("a", 0.0, 0.0), el("b", 10.0, 10.0)]);

        let current = vec![el("a", 0.0, 0.0), el("c", 5.0, 5.0)];
        let out = tracker.diff(&current);
        assert!(out.contains("removed b"), "{out}");
        assert!(out.contains("added rectangle \"\" at (5, 5)"), "{out}");
        assert!(!out.contains("a ->"), "unchanged element reported: {out}");
    }

    #[test]
    fn reports_moves_with_rounded_geometry() {
        let mut tracker = EditDiffTracker::new();
        tracker.capture_baseline(&[el("a", 0.0, 0.0)]);

        let mut moved = el("a", 15.4, 19.6);
        moved.version = 2;
        let out = tracker.diff(&[moved]);
        assert_eq!(out, "a -> (15, 20) 100x50");
    }

    #[test]
    fn subpixel_drift_is_not_a_move() {
        let mut tracker = EditDiffTracker::new();
        tracker.capture_baseline(&[el("a", 10.0, 10.0)]);

        // Version bump defeats the fingerprint early-exit, but rounded
        // geometry is identical so the detailed scan finds nothing.
        let mut nudged = el("a", 10.2, 9.8);
        nudged.version = 2;
        assert_eq!(tracker.diff(&[nudged]), "");
    }

    #[test]
    fn added_uses_label_text() {
        let mut tracker = EditDiffTracker::new();
        tracker.capture_baseline(&[]);

        let labeled = DrawElement::from_raw(&json!({
            "type": "diamond", "id": "d", "x": 3.0, "y": 4.0,
            "width": 10, "height": 10, "label": {"text": "Decision"}
        }))
        .unwrap();
        assert_eq!(tracker.diff(&[labeled]), "added diamond \"Decision\" at (3, 4)");
    }

    #[test]
    fn recapture_resets_the_reference() {
        let mut tracker = EditDiffTracker::new();
        tracker.capture_baseline(&[el("a", 0.0, 0.0)]);
        let edited = vec![el("a", 50.0, 0.0)];
        assert!(!tracker.diff(&edited).is_empty());

        tracker.capture_baseline(&edited);
        assert_eq!(tracker.diff(&edited), "");
    }
}
