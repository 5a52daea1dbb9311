//! Streaming reconciliation engine for incrementally drawn diagram scenes.
//!
//! Drawing instructions stream in as a growing JSON array; the engine
//! decodes whatever is structurally complete, separates camera commands from
//! drawable content, gates costly re-renders on cheap fingerprints, merges
//! final passes into a per-session scene, animates the viewport between
//! camera moves, and reconciles each rendered tree onto the displayed one
//! through external drawing/patching collaborators. A diff tracker reports
//! user edits back to the host as compact text.

pub mod config;
pub mod diff;
pub mod elements;
pub mod error;
pub mod host;
pub mod render;
pub mod session;
pub mod stream;
pub mod viewport;

pub use config::EngineConfig;
pub use elements::{DrawElement, ViewportCommand};
pub use error::EngineError;
pub use host::{DisplayMode, Effect, HostLink, InputPayload, SessionEngine};
pub use session::SceneSession;
