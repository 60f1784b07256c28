//! Post fetch orchestration.
//!
//! Sequences query → normalize → commit: raw composite records come from
//! the injected [`QueryApi`], pass through the normalizer, and land in the
//! store under a single write guard, so concurrent selector reads never see
//! a partial commit. Loading flags bracket every request and are cleared on
//! the error path too.

use std::sync::Arc;

use futures::future::join_all;
use tracing::debug;

use super::{with_retry, QueryApi};
use crate::config::AppConfig;
use crate::error::Result;
use crate::normalize::{self, Visibility};
use crate::rank;
use crate::select;
use crate::store::SharedStore;

/// Orchestrates post and feed loading for one session.
pub struct PostOrchestrator<Q> {
    api: Arc<Q>,
    store: SharedStore,
    config: AppConfig,
}

impl<Q: QueryApi> PostOrchestrator<Q> {
    pub fn new(api: Arc<Q>, store: SharedStore, config: AppConfig) -> Self {
        Self { api, store, config }
    }

    /// Load the discovery feed's candidate post ids, newest first.
    pub async fn fetch_suggested_post_ids(&self) -> Result<Vec<String>> {
        self.store.write().await.set_loading_post_ids(true);
        let result = self
            .ranked_ids_for_spaces(&self.config.recommended_space_ids)
            .await;
        let mut store = self.store.write().await;
        store.set_loading_post_ids(false);
        let ids = result?;
        store.set_suggested_post_ids(ids.clone());
        Ok(ids)
    }

    /// Fetch composite records for the given ids and commit them.
    ///
    /// [`Visibility::Public`] uses the broad-visibility query;
    /// [`Visibility::AllowHidden`] the all-details query used on
    /// single-post and comment views.
    pub async fn fetch_posts_by_ids(&self, ids: &[String], visibility: Visibility) -> Result<()> {
        self.store.write().await.set_loading_posts(true);
        let fetched = match visibility {
            Visibility::Public => {
                with_retry(&self.config, "find_public_posts_with_all_details", || {
                    self.api.find_public_posts_with_all_details(ids)
                })
                .await
            }
            Visibility::AllowHidden => {
                with_retry(&self.config, "find_posts_with_all_details", || {
                    self.api.find_posts_with_all_details(ids)
                })
                .await
            }
        };

        let mut store = self.store.write().await;
        store.set_loading_posts(false);
        let records = fetched?;

        let batch = normalize::split_by_entity(records, visibility);
        if batch.is_empty() {
            store.set_new_posts_absent(true);
        }
        debug!(
            posts = batch.posts.len(),
            dropped = batch.dropped,
            "committing normalized post batch"
        );
        store.commit(batch);
        Ok(())
    }

    /// Load one post with hidden content tolerated (single-post view).
    ///
    /// Returns the loaded post id, which is also recorded as the store's
    /// `loading_post_id`.
    pub async fn fetch_post_by_id(&self, id: &str) -> Result<Option<String>> {
        let ids = vec![id.to_string()];

        self.store.write().await.set_loading_posts(true);
        let fetched = with_retry(&self.config, "find_posts_with_all_details", || {
            self.api.find_posts_with_all_details(&ids)
        })
        .await;

        let mut store = self.store.write().await;
        store.set_loading_posts(false);
        let records = fetched?;

        let batch = normalize::split_by_entity(records, Visibility::AllowHidden);
        let loaded = batch.posts.first().map(|post| post.id.clone());
        store.commit(batch);
        store.set_loading_post_id(loaded.clone());
        Ok(loaded)
    }

    /// Load a space's posts: the full ranked id list, then the first window.
    pub async fn fetch_posts_by_space(&self, space_id: &str) -> Result<Vec<String>> {
        self.store.write().await.set_loading_post_ids(true);
        let result = with_retry(&self.config, "post_ids_by_space_id", || {
            self.api.post_ids_by_space_id(space_id)
        })
        .await;

        let mut store = self.store.write().await;
        store.set_loading_post_ids(false);
        let ids = rank::newest_first(result?);
        store.set_space_post_ids(ids.clone());
        drop(store);

        let first_window = rank::window(&ids, self.config.window_size, 0).to_vec();
        self.fetch_posts_by_ids(&first_window, Visibility::Public)
            .await?;
        Ok(ids)
    }

    /// Load an account's posts across its spaces, then the first window.
    pub async fn fetch_account_posts(&self, space_ids: &[String]) -> Result<Vec<String>> {
        self.store.write().await.set_loading_post_ids(true);
        let result = self.ranked_ids_for_spaces(space_ids).await;

        let mut store = self.store.write().await;
        store.set_loading_post_ids(false);
        let ids = result?;
        store.set_account_post_ids(ids.clone());
        drop(store);

        let first_window = rank::window(&ids, self.config.window_size, 0).to_vec();
        self.fetch_posts_by_ids(&first_window, Visibility::Public)
            .await?;
        Ok(ids)
    }

    /// Ranked feed ids for the spaces an account follows.
    pub async fn fetch_account_feed(&self, account_id: &str) -> Result<Vec<String>> {
        let space_ids = with_retry(&self.config, "space_ids_followed_by_account", || {
            self.api.space_ids_followed_by_account(account_id)
        })
        .await?;
        self.ranked_ids_for_spaces(&space_ids).await
    }

    /// One fixed-size pagination window over a ranked id list.
    pub fn next_window<'a>(&self, ids: &'a [String], page: usize) -> &'a [String] {
        rank::window(ids, self.config.window_size, page)
    }

    /// Run the selector over the stored entities and keep the result as the
    /// current selection (post detail and comment-thread views read these).
    pub async fn materialize_selected(&self, ids: &[String], comments: bool) {
        let mut store = self.store.write().await;
        if comments {
            let views =
                select::select_comment_views(&store, ids, &self.config.content_gateway_url);
            store.extend_post_comments(views);
        } else {
            let views = select::select_post_views(&store, ids);
            store.extend_selected_posts(views);
        }
    }

    /// Concurrently collect post ids across spaces, ranked newest-first.
    ///
    /// All space queries are dispatched at once and joined; sequential
    /// dispatch would stack latencies.
    async fn ranked_ids_for_spaces(&self, space_ids: &[String]) -> Result<Vec<String>> {
        let fetches = space_ids.iter().map(|space_id| async move {
            with_retry(&self.config, "post_ids_by_space_id", || {
                self.api.post_ids_by_space_id(space_id)
            })
            .await
        });

        let mut ids = Vec::new();
        for result in join_all(fetches).await {
            ids.extend(result?);
        }
        Ok(rank::newest_first(ids))
    }
}
