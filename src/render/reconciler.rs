//! Orchestrates the external drawing and tree-patching collaborators.
//!
//! Every frame re-renders the whole element list into a fresh visual tree,
//! then patches it onto the tree currently displayed instead of replacing it
//! wholesale. The one reconciliation hint we pass tells the patcher to keep
//! an existing presentation attribute when the fresh tree lacks it — that is
//! what lets a shape finish its draw-on animation across full re-renders.

use std::collections::BTreeMap;

use crate::elements::{DrawElement, ViewportCommand};
use crate::error::{absorb, EngineError};

/// Attribute carrying in-progress draw-on animation state on rendered nodes.
pub const ANIMATION_STATE_ATTR: &str = "animation-state";

/// One node of the rendered visual tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisualNode {
    pub id: String,
    pub attrs: BTreeMap<String, String>,
    pub children: Vec<VisualNode>,
}

/// The rendered output for one frame: top-level nodes in paint order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisualTree {
    pub nodes: Vec<VisualNode>,
}

/// Instruction to the patch step.
#[derive(Clone, Debug, PartialEq)]
pub enum PatchHint {
    /// If the displayed node has this attribute and the fresh node does not,
    /// keep the displayed value instead of erasing it.
    PreserveAttr(String),
}

/// External drawing library: element list + view window in, visual tree out.
/// May reject geometrically invalid input; the reconciler absorbs that.
pub trait DrawingBackend {
    fn render(
        &mut self,
        elements: &[DrawElement],
        view: &ViewportCommand,
    ) -> Result<VisualTree, EngineError>;
}

/// External diff/patch library: applies `fresh` onto `displayed` in place,
/// honoring the hints.
pub trait TreePatcher {
    fn patch(&mut self, displayed: &mut VisualTree, fresh: VisualTree, hints: &[PatchHint]);
}

pub struct VisualReconciler<B, P> {
    backend: B,
    patcher: P,
    displayed: VisualTree,
    hints: Vec<PatchHint>,
}

impl<B: DrawingBackend, P: TreePatcher> VisualReconciler<B, P> {
    pub fn new(backend: B, patcher: P) -> Self {
        VisualReconciler {
            backend,
            patcher,
            displayed: VisualTree::default(),
            hints: vec![PatchHint::PreserveAttr(ANIMATION_STATE_ATTR.to_string())],
        }
    }

    /// Render `background` (accumulated scene minus overwritten ids) with
    /// `foreground` (the incoming batch) layered on top, then patch the
    /// result onto the displayed tree. Returns false when the frame was
    /// skipped because the drawing backend rejected the element set — the
    /// previous visual state stays up, stale but never broken.
    pub fn repaint(
        &mut self,
        background: Vec<DrawElement>,
        foreground: &[DrawElement],
        view: &ViewportCommand,
    ) -> bool {
        let mut elements = background;
        elements.extend_from_slice(foreground);

        let rendered = self.backend.render(&elements, view);
        match absorb(rendered, "frame render") {
            Some(fresh) => {
                self.patcher.patch(&mut self.displayed, fresh, &self.hints);
                true
            }
            None => false,
        }
    }

    pub fn displayed(&self) -> &VisualTree {
        &self.displayed
    }
}
