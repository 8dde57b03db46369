//! Decoding of event payloads into record batches.

use livetail_core::Batch;
use tracing::warn;

/// Decode one event payload into a batch.
///
/// Any failure — unparseable JSON, a payload that is not a top-level
/// array, or records that do not match the wire shape — drops the batch
/// with a diagnostic and returns `None`; the stream carries on.
pub(crate) fn decode_batch(payload: &str) -> Option<Batch> {
    let value: serde_json::Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(error) => {
            warn!(%error, "dropping undecodable stream payload");
            return None;
        }
    };

    if !value.is_array() {
        warn!("dropping stream payload that is not a top-level array");
        return None;
    }

    match serde_json::from_value::<Batch>(value) {
        Ok(records) => Some(records),
        Err(error) => {
            warn!(%error, "dropping batch with malformed records");
            None
        }
    }
}
