//! Content normalizer: splits composite query results into flat entity
//! tables.
//!
//! The query API returns deeply nested post+space+owner records, partially
//! present and sometimes hidden. One pass over a batch produces four flat
//! sequences (posts, spaces, profiles, contents) ready for an id-keyed
//! merge into the store. Rules:
//!
//! - A post without its own content payload never enters the store.
//! - Under [`Visibility::Public`] a missing space content also drops the
//!   record; under [`Visibility::AllowHidden`] the space is simply not
//!   re-emitted (hidden pages render without it).
//! - Comments get `space_id` backfilled from the declared space struct, so
//!   a stored comment never has a null `space_id` when a space was supplied.
//! - Owners without a profile get a placeholder struct whose missing
//!   `content_id` tells selectors to render the raw account id.
//!
//! Normalization is pure and never fails: malformed records are skipped and
//! counted, which is the observability hook for upstream shape changes.
//! Cross-batch duplicates are resolved later at merge time, not here.

use tracing::debug;

use crate::model::{
    CompositeRecord, Content, ContentKey, PostStruct, ProfileStruct, SpaceStruct, SpaceWithContent,
};

/// Controls how hidden content is treated during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Public feed: both post and space content are required.
    Public,
    /// Single post / comment view: missing space content is tolerated and
    /// the space struct is not re-emitted.
    AllowHidden,
}

/// Flat output of one normalization pass.
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    pub posts: Vec<PostStruct>,
    pub spaces: Vec<SpaceStruct>,
    pub profiles: Vec<ProfileStruct>,
    pub contents: Vec<(ContentKey, Content)>,
    /// Records skipped for missing required content
    pub dropped: usize,
}

impl NormalizedBatch {
    /// True when the pass admitted no posts at all
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Split a batch of composite records into flat entity sequences.
pub fn split_by_entity(records: Vec<CompositeRecord>, visibility: Visibility) -> NormalizedBatch {
    let allow_hidden = visibility == Visibility::AllowHidden;
    let mut batch = NormalizedBatch::default();

    for record in records {
        let Some(post_part) = record.post else {
            batch.dropped += 1;
            continue;
        };
        // Post content absence is always a hard reject
        let Some(post_content) = post_part.content else {
            batch.dropped += 1;
            continue;
        };

        let space_content_present = record
            .space
            .as_ref()
            .is_some_and(|space| space.content.is_some());
        if !space_content_present && !allow_hidden {
            batch.dropped += 1;
            continue;
        }

        let mut post = post_part.post;
        if post.is_comment {
            if let Some(space) = record.space.as_ref() {
                post.space_id = Some(space.space.id.clone());
            }
        }

        batch.contents.push((
            ContentKey::post(post.content_id.clone()),
            Content::Post(post_content),
        ));

        // Hidden pages omit redundant space re-emission
        if !allow_hidden {
            if let Some(space_part) = record.space {
                if let (Some(content), Some(content_id)) =
                    (space_part.content, space_part.space.content_id.clone())
                {
                    batch
                        .contents
                        .push((ContentKey::space(content_id), Content::Space(content)));
                }
                batch.spaces.push(space_part.space);
            }
        }

        match record.owner {
            Some(owner_part) => {
                if let (Some(content), Some(content_id)) =
                    (owner_part.content, owner_part.profile.content_id.clone())
                {
                    batch
                        .contents
                        .push((ContentKey::profile(content_id), Content::Profile(content)));
                }
                batch.profiles.push(owner_part.profile);
            }
            None => {
                batch.profiles.push(ProfileStruct {
                    id: post.owner_id.clone(),
                    content_id: None,
                });
            }
        }

        batch.posts.push(post);
    }

    if batch.dropped > 0 {
        debug!(
            dropped = batch.dropped,
            admitted = batch.posts.len(),
            "normalization skipped records missing required content"
        );
    }

    batch
}

/// Split a batch of space fetch results into structs and keyed contents.
pub fn split_spaces(records: Vec<SpaceWithContent>) -> (Vec<SpaceStruct>, Vec<(ContentKey, Content)>) {
    let mut structs = Vec::with_capacity(records.len());
    let mut contents = Vec::new();

    for record in records {
        if let (Some(content), Some(content_id)) =
            (record.content, record.space.content_id.clone())
        {
            contents.push((ContentKey::space(content_id), Content::Space(content)));
        }
        structs.push(record.space);
    }

    (structs, contents)
}
