pub mod engine;
pub mod events;

pub use engine::{dispatch_effects, Phase, SessionEngine};
pub use events::{ContentPart, DisplayMode, Effect, HostLink, InputPayload, OutboundMessage};
