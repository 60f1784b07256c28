//! Off-chain content payloads, addressed by scoped keys.

use serde::{Deserialize, Serialize};

/// Struct kind a content payload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Post,
    Space,
    Profile,
}

/// Scoped content key.
///
/// The index assigns content ids per struct kind, so the same numeric id can
/// name a post content and a profile content at once. All content lookups
/// carry the kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentKey {
    pub kind: ContentKind,
    pub id: String,
}

impl ContentKey {
    pub fn post(id: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Post,
            id: id.into(),
        }
    }

    pub fn space(id: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Space,
            id: id.into(),
        }
    }

    pub fn profile(id: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Profile,
            id: id.into(),
        }
    }
}

/// Content payload of a post or comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub summary: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Whether the summary was truncated from a longer body
    #[serde(default)]
    pub is_show_more: bool,
}

/// Content payload of a space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceContent {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Content payload of a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileContent {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Tagged union over the three payload kinds, validated once at the
/// normalization boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Content {
    Post(PostContent),
    Space(SpaceContent),
    Profile(ProfileContent),
}

impl Content {
    pub fn as_post(&self) -> Option<&PostContent> {
        match self {
            Content::Post(content) => Some(content),
            _ => None,
        }
    }

    pub fn as_space(&self) -> Option<&SpaceContent> {
        match self {
            Content::Space(content) => Some(content),
            _ => None,
        }
    }

    pub fn as_profile(&self) -> Option<&ProfileContent> {
        match self {
            Content::Profile(content) => Some(content),
            _ => None,
        }
    }
}
