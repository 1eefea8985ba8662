//! Snapshot codec
//!
//! One snapshot is one pretty-printed JSON document. Unknown fields are
//! ignored on read and missing ones take their defaults, so the only decode
//! failure is a document that is not structurally a snapshot.

use super::types::{CURRENT_SNAPSHOT_VERSION, DecodeError, SaveError, SaveResult, Snapshot};

/// Serializes a snapshot (pretty format for readability/debugging)
pub fn encode(snapshot: &Snapshot) -> SaveResult<Vec<u8>> {
    serde_json::to_vec_pretty(snapshot).map_err(SaveError::Encode)
}

pub fn decode(bytes: &[u8]) -> Result<Snapshot, DecodeError> {
    let snapshot: Snapshot = serde_json::from_slice(bytes)?;

    if snapshot.version > CURRENT_SNAPSHOT_VERSION {
        log::warn!(
            "snapshot version {} is newer than supported version {}; unknown fields are ignored",
            snapshot.version,
            CURRENT_SNAPSHOT_VERSION
        );
    }

    Ok(snapshot)
}
