//! On-chain space record.

use serde::{Deserialize, Serialize};

/// Canonical on-chain record for a space (community).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceStruct {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    /// Human-readable alias usable in routes instead of the id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    pub hidden: bool,
}
