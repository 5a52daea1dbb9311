//! Splits decoded records into viewport control and drawable content.
//!
//! Drawable order in the wire array is authoritative z-order, so the
//! classifier preserves it exactly. Viewport records are plucked out (last
//! one wins within a batch) and never enter the scene.

use crate::elements::{viewport::is_viewport_kind, DrawElement, RawRecord, ViewportCommand};

/// Result of classifying one decoded batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassifiedBatch {
    pub viewport: Option<ViewportCommand>,
    pub drawables: Vec<DrawElement>,
}

/// Classify raw records into `(viewport, drawables)`. Records without a
/// usable `type`/`id` are skipped; a malformed viewport record is skipped the
/// same way rather than clearing an earlier good one.
pub fn classify(records: &[RawRecord]) -> ClassifiedBatch {
    let mut batch = ClassifiedBatch::default();

    for record in records {
        let kind = record.get("type").and_then(|v| v.as_str()).unwrap_or("");
        if kind.is_empty() {
            continue;
        }
        if is_viewport_kind(kind) {
            if let Ok(vp) = serde_json::from_value::<ViewportCommand>(record.clone()) {
                batch.viewport = Some(vp);
            }
            continue;
        }
        if let Some(el) = DrawElement::from_raw(record) {
            batch.drawables.push(el);
        }
    }

    batch
}

/// Safety margin for non-final batches: the tail element is assumed to still
/// be mid-stream and is dropped until a later pass confirms it. A batch of
/// exactly one element is wholly unconfirmed and yields nothing, so a lone
/// half-drawn shape never flashes on screen.
pub fn trim_unconfirmed(mut drawables: Vec<DrawElement>) -> Vec<DrawElement> {
    if drawables.len() > 1 {
        drawables.pop();
        drawables
    } else {
        Vec::new()
    }
}
