use readiness::SystemSnapshot;
use serde::{Deserialize, Serialize};

/// One scan report on the wire: the session id plus every snapshot field,
/// flattened into a single camelCase JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanEnvelope {
    pub session_id: String,
    #[serde(flatten)]
    pub snapshot: SystemSnapshot,
}

impl ScanEnvelope {
    pub fn new(session_id: impl Into<String>, snapshot: SystemSnapshot) -> Self {
        Self {
            session_id: session_id.into(),
            snapshot,
        }
    }
}
