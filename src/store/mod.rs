//! Flat entity tables with id-keyed merge and narrow in-place mutations.
//!
//! The store is process-lifetime: structs and contents are created by the
//! normalizer, merged in by upserts, read by selectors, and never destroyed
//! except by the wholesale space-list reset. Mutation happens only behind
//! the shared `RwLock` between suspension points, and each orchestrator
//! commit holds a single write guard, so selector reads see either the
//! pre- or post-commit tables and never a partial batch.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::model::{Content, ContentKey, PostStruct, ProfileStruct, SpaceStruct};
use crate::normalize::NormalizedBatch;
use crate::select::PostView;

/// Shared handle to the store; one per application session.
pub type SharedStore = Arc<RwLock<EntityStore>>;

/// Entities mergeable by chain id.
trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for PostStruct {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for SpaceStruct {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for ProfileStruct {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Id-keyed last-write-wins merge: first occurrence keeps its position,
/// a later same-id entry overwrites in place, new ids append.
fn merge_by_id<T: Keyed>(existing: &mut Vec<T>, incoming: Vec<T>) {
    let mut positions: HashMap<String, usize> = existing
        .iter()
        .enumerate()
        .map(|(index, item)| (item.key().to_string(), index))
        .collect();

    for item in incoming {
        match positions.get(item.key()) {
            Some(&index) => existing[index] = item,
            None => {
                positions.insert(item.key().to_string(), existing.len());
                existing.push(item);
            }
        }
    }
}

/// Reaction direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Upvote,
    Downvote,
}

/// A reaction change reported by the UI.
///
/// `event_id` keys idempotent application: replaying a delivered event is a
/// no-op, so double-taps and retried commands cannot double-count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionEvent {
    pub event_id: Uuid,
    pub post_id: String,
    pub kind: ReactionKind,
    /// true when the reaction was added, false when withdrawn
    pub active: bool,
}

impl ReactionEvent {
    pub fn new(post_id: impl Into<String>, kind: ReactionKind, active: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            post_id: post_id.into(),
            kind,
            active,
        }
    }
}

/// Flat, id-indexed entity tables plus the loading flags the UI renders.
#[derive(Debug, Default)]
pub struct EntityStore {
    posts: Vec<PostStruct>,
    spaces: Vec<SpaceStruct>,
    current_space: Option<SpaceStruct>,
    profiles: Vec<ProfileStruct>,
    contents: HashMap<ContentKey, Content>,

    suggested_post_ids: Vec<String>,
    space_post_ids: Vec<String>,
    account_post_ids: Vec<String>,
    account_space_ids: Vec<String>,
    my_account_space_ids: Vec<String>,

    selected_posts: HashMap<String, PostView>,
    post_comments: HashMap<String, PostView>,

    pub is_loading_posts: bool,
    pub is_loading_post_ids: bool,
    pub is_loading_spaces: bool,
    pub loading_post_id: Option<String>,
    pub new_posts_absent: bool,
    pub new_spaces_absent: bool,
    pub account_has_spaces: bool,

    applied_reactions: HashSet<Uuid>,
    /// Cumulative count of records the normalizer skipped
    pub dropped_records: u64,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh shared store handle.
    pub fn shared() -> SharedStore {
        Arc::new(RwLock::new(Self::new()))
    }

    // ------------------------------------------------------------------
    // Merges
    // ------------------------------------------------------------------

    /// Commit one normalized batch as a single mutation.
    pub fn commit(&mut self, batch: NormalizedBatch) {
        self.dropped_records += batch.dropped as u64;
        self.merge_posts(batch.posts);
        self.merge_spaces(batch.spaces);
        self.merge_profiles(batch.profiles);
        self.merge_contents(batch.contents);
    }

    pub fn merge_posts(&mut self, posts: Vec<PostStruct>) {
        merge_by_id(&mut self.posts, posts);
    }

    pub fn merge_spaces(&mut self, spaces: Vec<SpaceStruct>) {
        merge_by_id(&mut self.spaces, spaces);
    }

    pub fn merge_profiles(&mut self, profiles: Vec<ProfileStruct>) {
        merge_by_id(&mut self.profiles, profiles);
    }

    pub fn merge_contents(&mut self, contents: Vec<(ContentKey, Content)>) {
        self.contents.extend(contents);
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn post(&self, id: &str) -> Option<&PostStruct> {
        self.posts.iter().find(|post| post.id == id)
    }

    pub fn posts(&self) -> &[PostStruct] {
        &self.posts
    }

    /// Space lookup that also considers the currently opened space.
    pub fn space(&self, id: &str) -> Option<&SpaceStruct> {
        self.spaces
            .iter()
            .find(|space| space.id == id)
            .or(self.current_space.as_ref().filter(|space| space.id == id))
    }

    pub fn space_by_handle(&self, handle: &str) -> Option<&SpaceStruct> {
        self.spaces
            .iter()
            .find(|space| space.handle.as_deref() == Some(handle))
    }

    pub fn spaces(&self) -> &[SpaceStruct] {
        &self.spaces
    }

    pub fn current_space(&self) -> Option<&SpaceStruct> {
        self.current_space.as_ref()
    }

    pub fn profile(&self, id: &str) -> Option<&ProfileStruct> {
        self.profiles.iter().find(|profile| profile.id == id)
    }

    pub fn content(&self, key: &ContentKey) -> Option<&Content> {
        self.contents.get(key)
    }

    pub fn suggested_post_ids(&self) -> &[String] {
        &self.suggested_post_ids
    }

    pub fn space_post_ids(&self) -> &[String] {
        &self.space_post_ids
    }

    pub fn account_post_ids(&self) -> &[String] {
        &self.account_post_ids
    }

    pub fn account_space_ids(&self) -> &[String] {
        &self.account_space_ids
    }

    pub fn my_account_space_ids(&self) -> &[String] {
        &self.my_account_space_ids
    }

    pub fn selected_posts(&self) -> &HashMap<String, PostView> {
        &self.selected_posts
    }

    pub fn post_comments(&self) -> &HashMap<String, PostView> {
        &self.post_comments
    }

    // ------------------------------------------------------------------
    // Narrow mutations
    // ------------------------------------------------------------------

    /// Flip a post's hidden flag. Returns the new state, or None when the
    /// post is not in the store.
    pub fn toggle_post_hidden(&mut self, id: &str) -> Option<bool> {
        let post = self.posts.iter_mut().find(|post| post.id == id)?;
        post.hidden = !post.hidden;
        Some(post.hidden)
    }

    /// Flip a space's hidden flag. Returns the new state, or None when the
    /// space is not in the store.
    pub fn toggle_space_hidden(&mut self, id: &str) -> Option<bool> {
        let space = self.spaces.iter_mut().find(|space| space.id == id)?;
        space.hidden = !space.hidden;
        Some(space.hidden)
    }

    /// Apply a reaction change to the matching post's counters.
    ///
    /// Counters are clamped at zero and the event id is remembered, so
    /// replays return false without touching the counters.
    pub fn apply_reaction(&mut self, event: &ReactionEvent) -> bool {
        if self.applied_reactions.contains(&event.event_id) {
            debug!(event_id = %event.event_id, post_id = %event.post_id, "reaction replay ignored");
            return false;
        }

        let Some(post) = self.posts.iter_mut().find(|post| post.id == event.post_id) else {
            return false;
        };

        let counter = match event.kind {
            ReactionKind::Upvote => &mut post.upvotes_count,
            ReactionKind::Downvote => &mut post.downvotes_count,
        };
        *counter = if event.active {
            counter.saturating_add(1)
        } else {
            counter.saturating_sub(1)
        };

        self.applied_reactions.insert(event.event_id);
        true
    }

    /// Wholesale reset of the space table (explicit clear on navigation).
    pub fn clear_spaces(&mut self) {
        self.spaces.clear();
        self.current_space = None;
    }

    pub fn clear_selected_posts(&mut self) {
        self.selected_posts.clear();
    }

    // ------------------------------------------------------------------
    // Flag and id-list setters
    // ------------------------------------------------------------------

    pub fn set_loading_posts(&mut self, loading: bool) {
        self.is_loading_posts = loading;
    }

    pub fn set_loading_post_ids(&mut self, loading: bool) {
        self.is_loading_post_ids = loading;
    }

    pub fn set_loading_spaces(&mut self, loading: bool) {
        self.is_loading_spaces = loading;
    }

    pub fn set_loading_post_id(&mut self, id: Option<String>) {
        self.loading_post_id = id;
    }

    pub fn set_new_posts_absent(&mut self, absent: bool) {
        self.new_posts_absent = absent;
    }

    pub fn set_new_spaces_absent(&mut self, absent: bool) {
        self.new_spaces_absent = absent;
    }

    pub fn set_account_has_spaces(&mut self, has_spaces: bool) {
        self.account_has_spaces = has_spaces;
    }

    pub fn set_suggested_post_ids(&mut self, ids: Vec<String>) {
        self.suggested_post_ids = ids;
    }

    pub fn set_space_post_ids(&mut self, ids: Vec<String>) {
        self.space_post_ids = ids;
    }

    pub fn set_account_post_ids(&mut self, ids: Vec<String>) {
        self.account_post_ids = ids;
    }

    pub fn set_account_space_ids(&mut self, ids: Vec<String>) {
        self.account_space_ids = ids;
    }

    pub fn set_my_account_space_ids(&mut self, ids: Vec<String>) {
        self.my_account_space_ids = ids;
    }

    pub fn set_current_space(&mut self, space: Option<SpaceStruct>) {
        self.current_space = space;
    }

    pub fn extend_selected_posts(&mut self, views: HashMap<String, PostView>) {
        self.selected_posts.extend(views);
    }

    pub fn extend_post_comments(&mut self, views: HashMap<String, PostView>) {
        self.post_comments.extend(views);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str) -> PostStruct {
        PostStruct {
            id: id.to_string(),
            owner_id: "alice".to_string(),
            space_id: Some("100".to_string()),
            content_id: format!("c-{id}"),
            root_post_id: None,
            shared_post_id: None,
            replies_count: 0,
            hidden_replies_count: 0,
            visible_replies_count: 0,
            shares_count: 0,
            upvotes_count: 0,
            downvotes_count: 0,
            is_comment: false,
            is_shared_post: false,
            hidden: false,
            created_at_time: 0,
        }
    }

    fn post_with_owner(id: &str, owner: &str) -> PostStruct {
        PostStruct {
            owner_id: owner.to_string(),
            ..post(id)
        }
    }

    #[test]
    fn test_merge_is_last_write_wins() {
        let mut store = EntityStore::new();
        store.merge_posts(vec![post("1"), post("2"), post("3")]);
        store.merge_posts(vec![post_with_owner("2", "bob"), post("4")]);

        assert_eq!(store.posts().len(), 4);
        assert_eq!(store.post("2").unwrap().owner_id, "bob");
        // First occurrence keeps its position, new ids append
        let order: Vec<&str> = store.posts().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_merge_dedupes_within_one_batch() {
        let mut store = EntityStore::new();
        store.merge_posts(vec![post("1"), post_with_owner("1", "bob")]);

        assert_eq!(store.posts().len(), 1);
        assert_eq!(store.post("1").unwrap().owner_id, "bob");
    }

    #[test]
    fn test_toggle_hidden_is_involution() {
        let mut store = EntityStore::new();
        store.merge_posts(vec![post("1")]);

        assert_eq!(store.toggle_post_hidden("1"), Some(true));
        assert_eq!(store.toggle_post_hidden("1"), Some(false));
        assert!(!store.post("1").unwrap().hidden);
        assert_eq!(store.toggle_post_hidden("missing"), None);
    }

    #[test]
    fn test_reaction_decrement_clamps_at_zero() {
        let mut store = EntityStore::new();
        store.merge_posts(vec![post("1")]);

        let withdraw = ReactionEvent::new("1", ReactionKind::Upvote, false);
        assert!(store.apply_reaction(&withdraw));
        assert_eq!(store.post("1").unwrap().upvotes_count, 0);
    }

    #[test]
    fn test_reaction_replay_is_ignored() {
        let mut store = EntityStore::new();
        store.merge_posts(vec![post("1")]);

        let event = ReactionEvent::new("1", ReactionKind::Downvote, true);
        assert!(store.apply_reaction(&event));
        assert!(!store.apply_reaction(&event));
        assert_eq!(store.post("1").unwrap().downvotes_count, 1);
    }

    #[test]
    fn test_reaction_directions() {
        let mut store = EntityStore::new();
        store.merge_posts(vec![post("1")]);

        store.apply_reaction(&ReactionEvent::new("1", ReactionKind::Upvote, true));
        store.apply_reaction(&ReactionEvent::new("1", ReactionKind::Upvote, true));
        store.apply_reaction(&ReactionEvent::new("1", ReactionKind::Upvote, false));

        assert_eq!(store.post("1").unwrap().upvotes_count, 1);
        assert_eq!(store.post("1").unwrap().downvotes_count, 0);
    }

    #[test]
    fn test_shared_store_serializes_mutations() {
        tokio_test::block_on(async {
            let store = EntityStore::shared();
            store.write().await.set_loading_posts(true);
            assert!(store.read().await.is_loading_posts);
        });
    }

    #[test]
    fn test_space_lookup_considers_current_space() {
        let mut store = EntityStore::new();
        store.set_current_space(Some(SpaceStruct {
            id: "200".to_string(),
            content_id: None,
            handle: None,
            hidden: false,
        }));

        assert!(store.space("200").is_some());
        store.clear_spaces();
        assert!(store.space("200").is_none());
    }
}
