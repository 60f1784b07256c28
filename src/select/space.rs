//! Space view models.

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::model::{Content, ContentKey, SpaceContent, SpaceStruct};
use crate::store::EntityStore;

/// A space struct paired with its content payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceView {
    pub space: SpaceStruct,
    pub content: SpaceContent,
}

fn join_space(store: &EntityStore, space: &SpaceStruct) -> Option<SpaceView> {
    let content_id = space.content_id.as_ref()?;
    let content = store
        .content(&ContentKey::space(content_id.clone()))?
        .as_space()?;
    Some(SpaceView {
        space: space.clone(),
        content: content.clone(),
    })
}

/// Join one space by id.
pub fn space_view(store: &EntityStore, id: &str) -> Option<SpaceView> {
    join_space(store, store.space(id)?)
}

/// Join the requested space ids, skipping any without stored content.
pub fn space_views_by_ids(store: &EntityStore, ids: &[String]) -> Vec<SpaceView> {
    ids.iter()
        .filter_map(|id| store.space(id))
        .filter_map(|space| join_space(store, space))
        .collect()
}

/// Discovery listing: recommended spaces only, sliced to `[start, end)`.
pub fn recommended_space_views(
    store: &EntityStore,
    config: &AppConfig,
    start: usize,
    end: usize,
) -> Vec<SpaceView> {
    store
        .spaces()
        .iter()
        .filter(|space| config.recommended_space_ids.contains(&space.id))
        .skip(start)
        .take(end.saturating_sub(start))
        .filter_map(|space| join_space(store, space))
        .collect()
}

/// Resolve a space by id or `@handle`.
pub fn find_space(store: &EntityStore, id_or_handle: &str) -> Option<SpaceView> {
    let space = match id_or_handle.strip_prefix('@') {
        Some(handle) => store.space_by_handle(handle)?,
        None => store.space(id_or_handle)?,
    };
    join_space(store, space)
}
