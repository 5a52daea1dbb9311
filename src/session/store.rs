//! Per-session accumulation of drawable content across drawing passes.
//!
//! The store is an ordered unique-key map from element id to the latest
//! element record. An id collision across passes means "update", never
//! "duplicate". Render order after a merge is: pre-existing ids absent from
//! the incoming batch (in their stored order), then the batch in its own
//! order — newly drawn content is layered on top of the accumulated scene.

use std::collections::HashMap;

use crate::elements::DrawElement;

#[derive(Debug, Default)]
pub struct SceneSession {
    by_id: HashMap<String, DrawElement>,
    order: Vec<String>,
}

impl SceneSession {
    pub fn new() -> Self {
        SceneSession::default()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn get(&self, id: &str) -> Option<&DrawElement> {
        self.by_id.get(id)
    }

    /// Merge a batch into the session and return the full materialized list
    /// in render order. Upserting the same batch twice is a no-op the second
    /// time: per-id replacement is idempotent and the order rule converges.
    pub fn upsert(&mut self, batch: &[DrawElement]) -> Vec<DrawElement> {
        self.order.retain(|id| !batch.iter().any(|el| el.id == *id));
        for el in batch {
            self.by_id.insert(el.id.clone(), el.clone());
            self.order.push(el.id.clone());
        }
        self.elements()
    }

    /// The accumulated scene minus the ids an incoming batch is about to
    /// overwrite — the background layer handed to the reconciler.
    pub fn background_excluding(&self, batch: &[DrawElement]) -> Vec<DrawElement> {
        self.order
            .iter()
            .filter(|id| !batch.iter().any(|el| el.id == **id))
            .filter_map(|id| self.by_id.get(id).cloned())
            .collect()
    }

    /// Materialize the current scene in render order.
    pub fn elements(&self) -> Vec<DrawElement> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.get(id).cloned())
            .collect()
    }

    pub fn clear(&mut self) {
        self.by_id.clear();
        self.order.clear();
    }

    /// Seed the session from persisted elements, but only when it is empty —
    /// a stale resume must never clobber in-flight edits.
    pub fn load_from(&mut self, persisted: Vec<DrawElement>) {
        if !self.is_empty() {
            return;
        }
        for el in persisted {
            if self.by_id.insert(el.id.clone(), el.clone()).is_none() {
                self.order.push(el.id);
            }
        }
    }
}
