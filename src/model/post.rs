//! On-chain post record.

use serde::{Deserialize, Serialize};

/// Canonical on-chain record for a post or comment, independent of its
/// content payload.
///
/// Comments (`is_comment == true`) arrive from the query API without a
/// `space_id`; the normalizer backfills it from the declared space struct
/// before the record enters the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostStruct {
    pub id: String,
    pub owner_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    pub content_id: String,
    /// Root of the comment thread; set only on comments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_post_id: Option<String>,
    /// Original post id when this is a share
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_post_id: Option<String>,
    pub replies_count: u32,
    pub hidden_replies_count: u32,
    pub visible_replies_count: u32,
    pub shares_count: u32,
    pub upvotes_count: u32,
    pub downvotes_count: u32,
    pub is_comment: bool,
    pub is_shared_post: bool,
    pub hidden: bool,
    /// Block time of creation, epoch milliseconds
    pub created_at_time: u64,
}
