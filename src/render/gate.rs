//! Decides whether a partial update is worth a full re-render.
//!
//! Re-rendering is the expensive step, so partial passes are gated on a
//! cheap comparison: element count plus a fingerprint summed over the ids.
//! A fingerprint collision only costs a missed cosmetic re-render — state is
//! rebuilt from scratch on the next change anyway — so nothing cryptographic
//! is needed.

use rand::Rng;

use crate::elements::DrawElement;

/// Excalidraw-compatible seed range for the hand-drawn jitter.
const SEED_MAX: u64 = 0x7fff_ffff;

/// Sum of the character codes of every element id.
pub fn id_fingerprint(elements: &[DrawElement]) -> u64 {
    elements
        .iter()
        .flat_map(|el| el.id.chars())
        .map(|c| c as u64)
        .sum()
}

/// Outcome of gating one partial batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GateDecision {
    pub render: bool,
    /// Kinds of the elements that appeared for the first time in this batch,
    /// for the external feedback collaborator (sound cue per new shape).
    pub appeared: Vec<String>,
}

#[derive(Debug, Default)]
pub struct RenderGate {
    prev_count: usize,
    prev_fingerprint: u64,
}

impl RenderGate {
    pub fn new() -> Self {
        RenderGate::default()
    }

    /// Gate a non-final batch. When the scene changed, every element's seed
    /// is re-randomized so repeated partial renders keep the hand-drawn look
    /// alive instead of freezing mid-sketch.
    pub fn evaluate_partial(&mut self, drawables: &mut [DrawElement]) -> GateDecision {
        let count = drawables.len();
        let fingerprint = id_fingerprint(drawables);
        if count == self.prev_count && fingerprint == self.prev_fingerprint {
            return GateDecision::default();
        }

        let appeared = drawables
            .iter()
            .skip(self.prev_count)
            .map(|el| el.kind.clone())
            .collect();

        let mut rng = rand::thread_rng();
        for el in drawables.iter_mut() {
            el.seed = rng.gen_range(1..=SEED_MAX);
        }

        tracing::trace!(count, fingerprint, "partial scene changed, re-rendering");
        self.prev_count = count;
        self.prev_fingerprint = fingerprint;
        GateDecision { render: true, appeared }
    }

    /// A final pass always renders with the decoded seeds untouched; the
    /// gate resets so the next drawing pass starts fresh.
    pub fn note_final(&mut self) {
        self.prev_count = 0;
        self.prev_fingerprint = 0;
    }
}
