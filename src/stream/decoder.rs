//! Tolerant decoder for the streamed instruction array.
//!
//! The model streams a JSON array of records and we get to see every
//! intermediate prefix of it, so almost every input here is malformed. The
//! contract is therefore "never fail": decode as much as is structurally
//! complete and silently drop the rest. As more text arrives the usable
//! prefix only grows, so callers can re-decode the whole fragment on every
//! partial delivery without tracking stream offsets.

use once_cell::sync::Lazy;

use crate::elements::RawRecord;

/// Fragments containing any of these are not instruction payloads at all
/// (error banners, placeholder pages) and decode to nothing.
static NON_PAYLOAD_MARKERS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec!["<!DOCTYPE", "<html", "An error occurred", "Internal Server Error"]
});

/// A long fragment that never mentions a `type` field is some other JSON
/// document, not an instruction array.
const TYPELESS_REJECT_LEN: usize = 200;

/// Decode a possibly-incomplete textual array into as many complete records
/// as the fragment contains. Never errors; unusable input yields `[]`.
pub fn decode_stream(text: &str) -> Vec<RawRecord> {
    let trimmed = text.trim();

    if !trimmed.starts_with('[') {
        return Vec::new();
    }
    if NON_PAYLOAD_MARKERS.iter().any(|m| trimmed.contains(m)) {
        return Vec::new();
    }
    if trimmed.len() > TYPELESS_REJECT_LEN && !trimmed.contains("\"type\"") {
        return Vec::new();
    }

    // Fast path: the fragment happens to be a complete array.
    if let Ok(records) = serde_json::from_str::<Vec<RawRecord>>(trimmed) {
        return records;
    }

    // Truncated mid-record. Cut back to the last record terminator and close
    // the array synthetically. This can land on a nested `}` and produce a
    // structurally odd record; downstream field access is defensive, so such
    // a record is just another malformed one to skip.
    if let Some(end) = trimmed.rfind('}') {
        let mut repaired = trimmed[..=end].to_string();
        repaired.push(']');
        match serde_json::from_str::<Vec<RawRecord>>(&repaired) {
            Ok(records) => {
                tracing::trace!(records = records.len(), "decoded truncated fragment");
                return records;
            }
            Err(err) => {
                tracing::trace!(%err, "repaired fragment still unparseable");
            }
        }
    }

    Vec::new()
}
