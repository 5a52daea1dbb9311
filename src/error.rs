//! Error taxonomy and the one place that decides what failure means.
//!
//! Nothing in this engine is fatal to the host: decode, render, host
//! communication and persistence failures are all locally contained. Rather
//! than scattering bare `let _ =` swallows around, fallible paths return
//! `Result<_, EngineError>` and funnel through [`absorb`], which logs and
//! converts to `Option`. Tests can exercise the failing paths as values.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or truncated payload text. Degrades to "use the best
    /// partial content decoded so far".
    #[error("decode failed: {0}")]
    Decode(String),

    /// The drawing collaborator rejected an element set. The previous visual
    /// output stays on screen for that frame.
    #[error("render failed: {0}")]
    Render(String),

    /// Sending a message or a display-mode request to the host failed.
    #[error("host communication failed: {0}")]
    Host(String),

    /// The session store threw (quota, IO). Persistence is best-effort.
    #[error("persistence failed: {0}")]
    Persist(String),
}

/// Policy layer: every absorbed failure is logged at debug with its context
/// and otherwise disappears.
pub fn absorb<T>(result: Result<T, EngineError>, what: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(context = what, error = %err, "absorbed failure");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_passes_through_ok() {
        assert_eq!(absorb(Ok::<_, EngineError>(5), "test"), Some(5));
    }

    #[test]
    fn absorb_swallows_errors() {
        let failing: Result<(), EngineError> = Err(EngineError::Persist("quota".into()));
        assert!(absorb(failing, "session write").is_none());
    }
}
