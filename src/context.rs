//! Application context: one explicitly constructed object per session.
//!
//! The context owns the shared store and the orchestrators, replacing any
//! module-scoped singletons: create it once when the session starts, pass
//! it to whoever fetches or selects, drop it on session end.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::Result;
use crate::fetch::{AccountOrchestrator, BalanceApi, PostOrchestrator, QueryApi, SpaceOrchestrator};
use crate::select::{self, PostView, SpaceView};
use crate::store::{EntityStore, ReactionEvent, SharedStore};

/// Session-scoped wiring of config, store, and orchestrators.
pub struct AppContext<Q, B> {
    config: AppConfig,
    store: SharedStore,
    pub posts: PostOrchestrator<Q>,
    pub spaces: SpaceOrchestrator<Q>,
    pub accounts: AccountOrchestrator<Q, B>,
}

impl<Q: QueryApi, B: BalanceApi> AppContext<Q, B> {
    /// Validate the config and wire up a fresh session.
    pub fn new(config: AppConfig, query: Arc<Q>, balances: Arc<B>) -> Result<Self> {
        config.validate()?;
        let store = EntityStore::shared();
        Ok(Self {
            posts: PostOrchestrator::new(Arc::clone(&query), Arc::clone(&store), config.clone()),
            spaces: SpaceOrchestrator::new(Arc::clone(&query), Arc::clone(&store), config.clone()),
            accounts: AccountOrchestrator::new(query, balances, config.clone()),
            store,
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Shared store handle, for callers that need direct reads.
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    // ------------------------------------------------------------------
    // Selector conveniences (read lock per call, always-fresh)
    // ------------------------------------------------------------------

    pub async fn post_views(&self, ids: &[String]) -> HashMap<String, PostView> {
        let store = self.store.read().await;
        select::select_post_views(&store, ids)
    }

    pub async fn comment_views(&self, ids: &[String]) -> HashMap<String, PostView> {
        let store = self.store.read().await;
        select::select_comment_views(&store, ids, &self.config.content_gateway_url)
    }

    pub async fn post_info(&self, id: &str) -> Option<PostView> {
        let store = self.store.read().await;
        select::post_info(&store, id)
    }

    pub async fn comment_info(&self, id: &str) -> Option<PostView> {
        let store = self.store.read().await;
        select::comment_info(&store, id, &self.config.content_gateway_url)
    }

    pub async fn find_space(&self, id_or_handle: &str) -> Option<SpaceView> {
        let store = self.store.read().await;
        select::find_space(&store, id_or_handle)
    }

    pub async fn recommended_spaces(&self, start: usize, end: usize) -> Vec<SpaceView> {
        let store = self.store.read().await;
        select::recommended_space_views(&store, &self.config, start, end)
    }

    // ------------------------------------------------------------------
    // Narrow mutations (serialized through the store's write lock)
    // ------------------------------------------------------------------

    /// Apply a reaction change. Returns false for replays and unknown posts.
    pub async fn apply_reaction(&self, event: &ReactionEvent) -> bool {
        self.store.write().await.apply_reaction(event)
    }

    pub async fn toggle_post_hidden(&self, id: &str) -> Option<bool> {
        self.store.write().await.toggle_post_hidden(id)
    }

    pub async fn toggle_space_hidden(&self, id: &str) -> Option<bool> {
        self.store.write().await.toggle_space_hidden(id)
    }

    /// Wholesale space-list reset (navigation away from a space listing).
    pub async fn clear_spaces(&self) {
        self.store.write().await.clear_spaces();
    }
}
