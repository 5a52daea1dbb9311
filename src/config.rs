use serde::{Deserialize, Serialize};

/// Engine tunables. Embedders usually take the defaults; tests shrink the
/// debounce windows. The default view window itself lives on
/// [`crate::elements::ViewportCommand::default`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Quiescence window before a pending session write fires, seconds.
    pub persist_debounce_secs: f64,
    /// Quiescence window before an edit-diff notification fires, seconds.
    pub notify_debounce_secs: f64,
    /// How long a posted drawing stays retrievable, seconds.
    pub drawing_ttl_secs: f64,
    /// Padding added around the displayed frame, scene units.
    pub frame_padding: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            persist_debounce_secs: 2.0,
            notify_debounce_secs: 3.0,
            drawing_ttl_secs: 3600.0,
            frame_padding: 24.0,
        }
    }
}
