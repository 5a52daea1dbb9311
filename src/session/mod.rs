pub mod persist;
pub mod store;

pub use persist::{DebouncedWrite, DrawingDropbox, FileSessionStore, MemorySessionStore, SessionStore};
pub use store::SceneSession;
