//! Space fetch orchestration.

use std::sync::Arc;

use super::{with_retry, QueryApi};
use crate::config::AppConfig;
use crate::error::Result;
use crate::normalize;
use crate::select::{self, SpaceView};
use crate::store::SharedStore;

/// Orchestrates space loading and account-space listings.
pub struct SpaceOrchestrator<Q> {
    api: Arc<Q>,
    store: SharedStore,
    config: AppConfig,
}

impl<Q: QueryApi> SpaceOrchestrator<Q> {
    pub fn new(api: Arc<Q>, store: SharedStore, config: AppConfig) -> Self {
        Self { api, store, config }
    }

    /// Fetch and commit the given spaces.
    pub async fn fetch_spaces_by_ids(&self, ids: &[String]) -> Result<()> {
        self.store.write().await.set_loading_spaces(true);
        let fetched = with_retry(&self.config, "find_spaces", || self.api.find_spaces(ids)).await;

        let mut store = self.store.write().await;
        store.set_loading_spaces(false);
        let records = fetched?;

        let (structs, contents) = normalize::split_spaces(records);
        if contents.is_empty() {
            store.set_new_spaces_absent(true);
        }
        store.merge_spaces(structs);
        store.merge_contents(contents);
        Ok(())
    }

    /// Fetch spaces hidden from public listings (owner dashboards).
    pub async fn fetch_unlisted_spaces(&self, ids: &[String]) -> Result<()> {
        let records = with_retry(&self.config, "find_unlisted_spaces", || {
            self.api.find_unlisted_spaces(ids)
        })
        .await?;

        let (structs, contents) = normalize::split_spaces(records);
        let mut store = self.store.write().await;
        store.merge_spaces(structs);
        store.merge_contents(contents);
        Ok(())
    }

    /// Open a space by id or `@handle`; it becomes the current space.
    pub async fn fetch_space(&self, id_or_handle: &str) -> Result<Option<SpaceView>> {
        let id = match id_or_handle.strip_prefix('@') {
            Some(handle) => {
                let resolved = with_retry(&self.config, "space_id_by_handle", || {
                    self.api.space_id_by_handle(handle)
                })
                .await?;
                match resolved {
                    Some(id) => id,
                    None => return Ok(None),
                }
            }
            None => id_or_handle.to_string(),
        };

        let ids = vec![id.clone()];
        let records =
            with_retry(&self.config, "find_spaces", || self.api.find_spaces(&ids)).await?;

        let (structs, contents) = normalize::split_spaces(records);
        let mut store = self.store.write().await;
        store.set_current_space(structs.first().cloned());
        store.merge_spaces(structs);
        store.merge_contents(contents);
        Ok(select::space_view(&store, &id))
    }

    /// Whether the account owns any spaces; records the owned-id list.
    pub async fn account_has_spaces(&self, account_id: &str) -> Result<bool> {
        let ids = with_retry(&self.config, "space_ids_by_owner", || {
            self.api.space_ids_by_owner(account_id)
        })
        .await?;

        let has_spaces = !ids.is_empty();
        let mut store = self.store.write().await;
        store.set_account_has_spaces(has_spaces);
        store.set_my_account_space_ids(ids);
        Ok(has_spaces)
    }

    /// Load the spaces an account owns. Owners also get the unlisted
    /// remainder that public listings omit.
    pub async fn fetch_account_spaces(&self, account_id: &str, is_owner: bool) -> Result<()> {
        self.store.write().await.set_loading_spaces(true);
        let result = self.load_account_spaces(account_id, is_owner).await;
        self.store.write().await.set_loading_spaces(false);
        result
    }

    async fn load_account_spaces(&self, account_id: &str, is_owner: bool) -> Result<()> {
        let ids = with_retry(&self.config, "space_ids_by_owner", || {
            self.api.space_ids_by_owner(account_id)
        })
        .await?;
        self.store.write().await.set_account_space_ids(ids.clone());

        let records =
            with_retry(&self.config, "find_spaces", || self.api.find_spaces(&ids)).await?;

        if is_owner {
            let unlisted: Vec<String> = ids
                .iter()
                .filter(|id| !records.iter().any(|record| record.space.id == **id))
                .cloned()
                .collect();
            if !unlisted.is_empty() {
                self.fetch_unlisted_spaces(&unlisted).await?;
            }
        }

        let (structs, contents) = normalize::split_spaces(records);
        let mut store = self.store.write().await;
        store.merge_spaces(structs);
        store.merge_contents(contents);
        Ok(())
    }
}
