pub mod gate;
pub mod reconciler;

pub use gate::{id_fingerprint, GateDecision, RenderGate};
pub use reconciler::{DrawingBackend, PatchHint, TreePatcher, VisualNode, VisualReconciler, VisualTree};
