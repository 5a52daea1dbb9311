//! Types crossing the host boundary in both directions.
//!
//! Inbound: streamed instruction payloads and display-mode changes.
//! Outbound: everything the engine wants done is an explicit [`Effect`]
//! value returned from a handler — the engine never performs side effects
//! inline, so tests can assert on the command list instead of mocking the
//! world. A thin dispatcher maps effects onto the collaborator traits.

use serde::{Deserialize, Serialize};

use crate::elements::{DrawElement, ViewportCommand};
use crate::error::EngineError;
use crate::stream::decode_stream;

/// The instruction field of a host event: either raw text (the usual
/// streaming case) or an already-structured value.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum InputPayload {
    Text(String),
    Structured(serde_json::Value),
}

impl InputPayload {
    /// Best-effort record list. Structured arrays are taken as-is; anything
    /// textual goes through the tolerant decoder.
    pub fn records(&self) -> Vec<serde_json::Value> {
        match self {
            InputPayload::Text(text) => decode_stream(text),
            InputPayload::Structured(serde_json::Value::Array(records)) => records.clone(),
            InputPayload::Structured(serde_json::Value::String(text)) => decode_stream(text),
            InputPayload::Structured(_) => Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Inline,
    Fullscreen,
}

/// One part of an outbound host message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentPart {
    Text { text: String },
    Image { data: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub role: String,
    pub content: Vec<ContentPart>,
}

impl OutboundMessage {
    /// A user-role message carrying diff text, optionally with a screenshot.
    /// A missing screenshot never blocks the message.
    pub fn edit_notification(diff: String, screenshot: Option<String>) -> Self {
        let mut content = vec![ContentPart::Text { text: diff }];
        if let Some(data) = screenshot {
            content.push(ContentPart::Image { data });
        }
        OutboundMessage { role: "user".to_string(), content }
    }
}

/// A side effect requested by an engine handler.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Re-render the scene and patch it onto the displayed tree.
    Repaint {
        background: Vec<DrawElement>,
        foreground: Vec<DrawElement>,
        view: ViewportCommand,
    },
    /// A new element just appeared in a partial pass; cue the feedback
    /// collaborator with its kind.
    PlayCue { kind: String },
    /// The viewport animation wants another display-refresh callback.
    ScheduleFrame,
    /// Write the serialized scene under the session key.
    Persist { key: String, elements_json: String },
    /// Drop the persisted scene for the session key.
    ClearPersisted { key: String },
    SendMessage(OutboundMessage),
    RequestDisplayMode(DisplayMode),
}

/// Host-side operations the dispatcher needs. Failures are absorbed by the
/// caller — a failed display-mode request leaves the UI in its old mode, a
/// failed message send is logged and dropped.
pub trait HostLink {
    fn send_message(&mut self, message: &OutboundMessage) -> Result<(), EngineError>;
    fn request_display_mode(&mut self, mode: DisplayMode) -> Result<(), EngineError>;
    /// Sound/feedback cue for a newly appeared element kind.
    fn play_cue(&mut self, kind: &str);
    /// Ask the display loop to call back on the next refresh.
    fn schedule_frame(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_records_from_text_and_structure() {
        let text = InputPayload::Text(r#"[{"type":"rectangle","id":"a"}]"#.to_string());
        assert_eq!(text.records().len(), 1);

        let structured = InputPayload::Structured(json!([{"type": "rectangle", "id": "a"}]));
        assert_eq!(structured.records().len(), 1);

        let nested_text = InputPayload::Structured(json!(r#"[{"type":"rectangle","id":"a"}]"#));
        assert_eq!(nested_text.records().len(), 1);

        let junk = InputPayload::Structured(json!({"not": "an array"}));
        assert!(junk.records().is_empty());
    }

    #[test]
    fn payload_deserializes_untagged() {
        let p: InputPayload = serde_json::from_value(json!("[{\"type\":\"x\"}]")).unwrap();
        assert!(matches!(p, InputPayload::Text(_)));
        let p: InputPayload = serde_json::from_value(json!([1, 2])).unwrap();
        assert!(matches!(p, InputPayload::Structured(_)));
    }

    #[test]
    fn edit_notification_wire_shape() {
        let msg = OutboundMessage::edit_notification("moved a".into(), Some("b64".into()));
        let wire = serde_json::to_value(&msg).unwrap();
        assert_eq!(wire["role"], "user");
        assert_eq!(wire["content"][0]["type"], "text");
        assert_eq!(wire["content"][0]["text"], "moved a");
        assert_eq!(wire["content"][1]["type"], "image");
        assert_eq!(wire["content"][1]["data"], "b64");

        let plain = OutboundMessage::edit_notification("x".into(), None);
        assert_eq!(plain.content.len(), 1);
    }
}
