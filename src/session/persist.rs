//! Best-effort persistence of session scenes and posted drawings.
//!
//! Storage is a collaborator choice (in-memory for a single process, a
//! remote key-value store in production), so the engine talks to a small
//! trait. Every error out of it is absorbed: persistence is a convenience
//! for resuming a session, never a correctness requirement.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::elements::DrawElement;
use crate::error::EngineError;

/// String-keyed store for serialized per-session state.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&mut self, key: &str, value: &str) -> Result<(), EngineError>;
    fn delete(&mut self, key: &str) -> Result<(), EngineError>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), EngineError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), EngineError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One file per key under a base directory.
#[derive(Debug)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: PathBuf) -> Self {
        FileSessionStore { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are session ids; anything path-hostile gets flattened.
        let safe: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), EngineError> {
        fs::create_dir_all(&self.dir).map_err(|e| EngineError::Persist(e.to_string()))?;
        fs::write(self.path_for(key), value).map_err(|e| EngineError::Persist(e.to_string()))
    }

    fn delete(&mut self, key: &str) -> Result<(), EngineError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(EngineError::Persist(e.to_string())),
        }
    }
}

pub fn serialize_elements(elements: &[DrawElement]) -> Result<String, EngineError> {
    serde_json::to_string(elements).map_err(|e| EngineError::Persist(e.to_string()))
}

/// Tolerant read side: a corrupt persisted blob resumes as an empty scene.
pub fn deserialize_elements(json: &str) -> Vec<DrawElement> {
    serde_json::from_str(json).unwrap_or_default()
}

/// Debounce bookkeeping for a pending write or notification. Same shape as
/// an autosave-while-typing cooldown: edits mark it dirty, `tick` fires once
/// the quiescence window has passed, and further edits push the deadline out.
#[derive(Debug, Default)]
pub struct DebouncedWrite {
    last_edit_time: Option<f64>,
    pending: bool,
}

impl DebouncedWrite {
    pub fn mark_dirty(&mut self, now: f64) {
        self.last_edit_time = Some(now);
        self.pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Returns true exactly once per quiescent edit burst.
    pub fn tick(&mut self, now: f64, window: f64) -> bool {
        if !self.pending {
            return false;
        }
        match self.last_edit_time {
            Some(last) if now - last >= window => {
                self.pending = false;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = false;
        self.last_edit_time = None;
    }
}

/// A drawing posted from the interactive editor, waiting to be picked up.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PostedDrawing {
    #[serde(default)]
    pub screenshot: Option<String>,
    #[serde(default)]
    pub elements: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Per-session mailbox for posted drawings: the latest post overwrites any
/// earlier one, entries expire after a TTL, and `take` is read-and-clear so
/// a drawing is delivered at most once.
#[derive(Debug)]
pub struct DrawingDropbox {
    entries: HashMap<String, (PostedDrawing, f64)>,
    ttl_secs: f64,
}

impl DrawingDropbox {
    pub fn new(ttl_secs: f64) -> Self {
        DrawingDropbox { entries: HashMap::new(), ttl_secs }
    }

    pub fn post(&mut self, session: &str, drawing: PostedDrawing, now: f64) {
        // Sessions that post and never retrieve would otherwise pile up.
        let ttl = self.ttl_secs;
        self.entries.retain(|_, (_, posted_at)| now - *posted_at <= ttl);
        self.entries.insert(session.to_string(), (drawing, now));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn take(&mut self, session: &str, now: f64) -> Option<PostedDrawing> {
        let (drawing, posted_at) = self.entries.remove(session)?;
        if now - posted_at > self.ttl_secs {
            return None;
        }
        Some(drawing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn el(id: &str) -> DrawElement {
        DrawElement::from_raw(&json!({"type": "rectangle", "id": id, "x": 1, "y": 2, "width": 3, "height": 4})).unwrap()
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemorySessionStore::new();
        store.put("s1", "payload").unwrap();
        assert_eq!(store.get("s1").as_deref(), Some("payload"));
        store.delete("s1").unwrap();
        assert!(store.get("s1").is_none());
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileSessionStore::new(dir.path().to_path_buf());
        assert!(store.get("missing").is_none());
        store.put("session/../x", "blob").unwrap();
        assert_eq!(store.get("session/../x").as_deref(), Some("blob"));
        store.delete("session/../x").unwrap();
        store.delete("session/../x").unwrap(); // deleting twice is fine
        assert!(store.get("session/../x").is_none());
    }

    #[test]
    fn elements_survive_serialization() {
        let elements = vec![el("a"), el("b")];
        let json = serialize_elements(&elements).unwrap();
        assert_eq!(deserialize_elements(&json), elements);
        assert!(deserialize_elements("{ not json").is_empty());
    }

    #[test]
    fn debounce_coalesces_edits() {
        let mut write = DebouncedWrite::default();
        assert!(!write.tick(0.0, 2.0));

        write.mark_dirty(0.0);
        assert!(!write.tick(1.0, 2.0));
        write.mark_dirty(1.5); // new edit pushes the deadline out
        assert!(!write.tick(2.5, 2.0));
        assert!(write.tick(3.5, 2.0));
        assert!(!write.tick(10.0, 2.0)); // fires once
    }

    #[test]
    fn debounce_cancel_prevents_late_fire() {
        let mut write = DebouncedWrite::default();
        write.mark_dirty(0.0);
        write.cancel();
        assert!(!write.tick(100.0, 2.0));
    }

    #[test]
    fn dropbox_overwrites_expires_and_clears() {
        let mut dropbox = DrawingDropbox::new(crate::config::EngineConfig::default().drawing_ttl_secs);
        dropbox.post("s", PostedDrawing { prompt: Some("first".into()), ..Default::default() }, 0.0);
        dropbox.post("s", PostedDrawing { prompt: Some("second".into()), ..Default::default() }, 1.0);

        let got = dropbox.take("s", 2.0).unwrap();
        assert_eq!(got.prompt.as_deref(), Some("second"));
        assert!(dropbox.take("s", 2.0).is_none()); // at-most-once

        dropbox.post("s", PostedDrawing::default(), 0.0);
        assert!(dropbox.take("s", 4000.0).is_none()); // expired
    }

    #[test]
    fn dropbox_purges_abandoned_entries_on_post() {
        let mut dropbox = DrawingDropbox::new(3600.0);
        dropbox.post("abandoned", PostedDrawing::default(), 0.0);
        dropbox.post("other", PostedDrawing::default(), 100.0);
        assert_eq!(dropbox.len(), 2);

        // A post long after the TTL evicts everything stale, even for
        // sessions that never call take.
        dropbox.post("fresh", PostedDrawing::default(), 4000.0);
        assert_eq!(dropbox.len(), 1);
        assert!(dropbox.take("fresh", 4001.0).is_some());
        assert!(dropbox.is_empty());
    }
}
