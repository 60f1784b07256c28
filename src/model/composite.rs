//! Composite fetch results delivered by the external query API.
//!
//! The index returns each post bundled with its related space and owner,
//! every part optional and every content payload optional. The normalizer
//! is the only consumer; nothing downstream sees these nested shapes.

use serde::{Deserialize, Serialize};

use super::content::{PostContent, ProfileContent, SpaceContent};
use super::post::PostStruct;
use super::profile::ProfileStruct;
use super::space::SpaceStruct;

/// A post struct with its optional content payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostWithContent {
    pub post: PostStruct,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<PostContent>,
}

/// A space struct with its optional content payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceWithContent {
    pub space: SpaceStruct,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<SpaceContent>,
}

/// A profile struct with its optional content payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileWithContent {
    pub profile: ProfileStruct,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ProfileContent>,
}

/// One nested query result: a post with its related structs and contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<PostWithContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space: Option<SpaceWithContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<ProfileWithContent>,
}
