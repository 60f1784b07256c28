//! On-chain profile record.

use serde::{Deserialize, Serialize};

/// Canonical on-chain record for an account profile.
///
/// A missing `content_id` signals that the raw account id doubles as the
/// display name. The normalizer synthesizes such placeholder profiles for
/// post owners that have never written a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStruct {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
}
