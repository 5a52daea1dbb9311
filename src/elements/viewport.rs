use serde::{Deserialize, Serialize};

/// Reserved record kinds that carry a viewport instead of a drawable.
pub const VIEWPORT_KINDS: [&str; 2] = ["viewportUpdate", "cameraUpdate"];

pub fn is_viewport_kind(kind: &str) -> bool {
    VIEWPORT_KINDS.contains(&kind)
}

/// A requested rectangular view window in scene coordinates. At most the
/// latest one per batch matters and it never becomes a scene member.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewportCommand {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl ViewportCommand {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        ViewportCommand { x, y, width, height }
    }

    /// L1 distance across all four fields, the animator's notion of how far
    /// apart two windows are.
    pub fn distance_to(&self, other: &ViewportCommand) -> f64 {
        (other.x - self.x).abs()
            + (other.y - self.y).abs()
            + (other.width - self.width).abs()
            + (other.height - self.height).abs()
    }
}

impl Default for ViewportCommand {
    /// Fallback window used when a drawing pass never issued an explicit
    /// viewport, so content is always framed.
    fn default() -> Self {
        ViewportCommand::new(0.0, 0.0, 1024.0, 768.0)
    }
}
