//! Post and comment view models.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{Content, ContentKey, PostStruct, ProfileStruct};
use crate::store::EntityStore;

/// Maximum characters of summary used when deriving a link slug
const SLUG_SUMMARY_LEN: usize = 50;

/// Routing target for a post, with the handle/id distinction the router
/// needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostLink {
    pub href: String,
    pub by_handle: bool,
}

/// Fully-joined, UI-ready representation of one post or comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: String,
    pub owner_id: String,
    pub owner_name: String,
    pub owner_image_url: String,

    /// Space join; absent on comments rendered without their space
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_space: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub summary: String,
    pub body: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_link: Option<PostLink>,

    pub created_at_time: u64,
    pub replies_count: u32,
    pub hidden_replies_count: u32,
    pub visible_replies_count: u32,
    pub shares_count: u32,
    pub upvotes_count: u32,
    pub downvotes_count: u32,

    pub is_comment: bool,
    pub is_shared_post: bool,
    pub is_show_more: bool,
    pub hidden: bool,

    pub content_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_post_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_post_id: Option<String>,
}

/// Build the routing link for a post.
///
/// Routes by handle when the space has one, by space id otherwise.
pub fn post_link(handle: Option<&str>, space_id: &str, slug_source: &str, post_id: &str) -> PostLink {
    let slug = slugify(slug_source);
    let tail = if slug.is_empty() {
        post_id.to_string()
    } else {
        format!("{slug}-{post_id}")
    };

    match handle.filter(|handle| !handle.is_empty()) {
        Some(handle) => PostLink {
            href: format!("/@{handle}/{tail}"),
            by_handle: true,
        },
        None => PostLink {
            href: format!("/space/{space_id}/{tail}"),
            by_handle: false,
        },
    }
}

fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn truncated_summary(summary: &str) -> String {
    summary.chars().take(SLUG_SUMMARY_LEN).collect()
}

/// Non-empty title, then truncated summary, then the given fallback.
fn slug_source(title: Option<&str>, summary: &str, fallback: Option<&str>) -> String {
    if let Some(title) = title.filter(|title| !title.is_empty()) {
        return title.to_string();
    }
    let summary = truncated_summary(summary);
    if !summary.is_empty() {
        return summary;
    }
    fallback.unwrap_or_default().to_string()
}

fn owner_display(store: &EntityStore, profile: &ProfileStruct, owner_id: &str) -> (String, String) {
    let content = profile
        .content_id
        .as_ref()
        .and_then(|content_id| store.content(&ContentKey::profile(content_id.clone())))
        .and_then(Content::as_profile);

    let name = content
        .map(|content| content.name.clone())
        .unwrap_or_else(|| owner_id.to_string());
    let avatar = content
        .and_then(|content| content.avatar.clone())
        .unwrap_or_default();
    (name, avatar)
}

/// Join the requested post ids into view models, keyed by post id.
///
/// Requires the full join chain: struct, owner profile, post content, space
/// struct, space content. Any missing target skips the record.
pub fn select_post_views(store: &EntityStore, ids: &[String]) -> HashMap<String, PostView> {
    let mut views = HashMap::new();
    for id in ids {
        let Some(post) = store.post(id) else { continue };
        if let Some(view) = build_post_view(store, post) {
            views.insert(post.id.clone(), view);
        }
    }
    views
}

/// Join the requested comment ids into view models, keyed by post id.
///
/// Comments render without a space; when the space and its content happen to
/// be present the link and space name are filled in, otherwise they degrade
/// to None. Comment images resolve against the content gateway.
pub fn select_comment_views(
    store: &EntityStore,
    ids: &[String],
    gateway_url: &str,
) -> HashMap<String, PostView> {
    let mut views = HashMap::new();
    for id in ids {
        let Some(post) = store.post(id) else { continue };
        if let Some(view) = build_comment_view(store, post, gateway_url) {
            views.insert(post.id.clone(), view);
        }
    }
    views
}

/// Single-id convenience wrapper over [`select_post_views`].
pub fn post_info(store: &EntityStore, id: &str) -> Option<PostView> {
    let mut views = select_post_views(store, std::slice::from_ref(&id.to_string()));
    views.remove(id)
}

/// Single-id convenience wrapper over [`select_comment_views`].
pub fn comment_info(store: &EntityStore, id: &str, gateway_url: &str) -> Option<PostView> {
    let mut views = select_comment_views(store, std::slice::from_ref(&id.to_string()), gateway_url);
    views.remove(id)
}

fn build_post_view(store: &EntityStore, post: &PostStruct) -> Option<PostView> {
    let profile = store.profile(&post.owner_id)?;
    let content = store
        .content(&ContentKey::post(post.content_id.clone()))?
        .as_post()?;
    let space = store.space(post.space_id.as_deref()?)?;
    let space_content = space
        .content_id
        .as_ref()
        .and_then(|content_id| store.content(&ContentKey::space(content_id.clone())))
        .and_then(Content::as_space)?;

    let (owner_name, owner_image_url) = owner_display(store, profile, &post.owner_id);
    let slug = slug_source(
        content.title.as_deref(),
        &content.summary,
        Some(&space_content.name),
    );
    let link = post_link(space.handle.as_deref(), &space.id, &slug, &post.id);

    Some(PostView {
        id: post.id.clone(),
        owner_id: post.owner_id.clone(),
        owner_name,
        owner_image_url,
        space_id: Some(space.id.clone()),
        space_name: Some(space_content.name.clone()),
        handle: space.handle.clone(),
        hidden_space: Some(space.hidden),
        title: content.title.clone(),
        summary: content.summary.clone(),
        body: content.body.clone(),
        tags: content.tags.clone(),
        link: content.link.clone(),
        image_url: content.image.clone().unwrap_or_default(),
        post_link: Some(link),
        created_at_time: post.created_at_time,
        replies_count: post.replies_count,
        hidden_replies_count: post.hidden_replies_count,
        visible_replies_count: post.visible_replies_count,
        shares_count: post.shares_count,
        upvotes_count: post.upvotes_count,
        downvotes_count: post.downvotes_count,
        is_comment: post.is_comment,
        is_shared_post: post.is_shared_post,
        is_show_more: content.is_show_more,
        hidden: post.hidden,
        content_id: post.content_id.clone(),
        shared_post_id: post.shared_post_id.clone(),
        root_post_id: post.root_post_id.clone(),
    })
}

fn build_comment_view(
    store: &EntityStore,
    post: &PostStruct,
    gateway_url: &str,
) -> Option<PostView> {
    let profile = store.profile(&post.owner_id)?;
    let content = store
        .content(&ContentKey::post(post.content_id.clone()))?
        .as_post()?;

    let space = post.space_id.as_deref().and_then(|id| store.space(id));
    let space_content = space
        .and_then(|space| space.content_id.as_ref())
        .and_then(|content_id| store.content(&ContentKey::space(content_id.clone())))
        .and_then(Content::as_space);

    let (owner_name, owner_image_url) = owner_display(store, profile, &post.owner_id);
    let slug = slug_source(content.title.as_deref(), &content.summary, None);
    let link = space.map(|space| post_link(space.handle.as_deref(), &space.id, &slug, &post.id));

    // Comment images are content-addressed; resolve through the gateway
    let image_url = content
        .image
        .as_ref()
        .map(|image| format!("{gateway_url}{image}"))
        .unwrap_or_default();

    Some(PostView {
        id: post.id.clone(),
        owner_id: post.owner_id.clone(),
        owner_name,
        owner_image_url,
        space_id: space.map(|space| space.id.clone()),
        space_name: space_content.map(|content| content.name.clone()),
        handle: space.and_then(|space| space.handle.clone()),
        hidden_space: space.map(|space| space.hidden),
        title: content.title.clone(),
        summary: content.summary.clone(),
        body: content.body.clone(),
        tags: content.tags.clone(),
        link: content.link.clone(),
        image_url,
        post_link: link,
        created_at_time: post.created_at_time,
        replies_count: post.replies_count,
        hidden_replies_count: post.hidden_replies_count,
        visible_replies_count: post.visible_replies_count,
        shares_count: post.shares_count,
        upvotes_count: post.upvotes_count,
        downvotes_count: post.downvotes_count,
        is_comment: post.is_comment,
        is_shared_post: post.is_shared_post,
        is_show_more: content.is_show_more,
        hidden: post.hidden,
        content_id: post.content_id.clone(),
        shared_post_id: post.shared_post_id.clone(),
        root_post_id: post.root_post_id.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PostContent, ProfileContent, SpaceContent, SpaceStruct};

    fn seeded_store() -> EntityStore {
        let mut store = EntityStore::new();
        store.merge_posts(vec![PostStruct {
            id: "1".to_string(),
            owner_id: "alice".to_string(),
            space_id: Some("100".to_string()),
            content_id: "c-1".to_string(),
            root_post_id: None,
            shared_post_id: None,
            replies_count: 2,
            hidden_replies_count: 0,
            visible_replies_count: 2,
            shares_count: 1,
            upvotes_count: 5,
            downvotes_count: 0,
            is_comment: false,
            is_shared_post: false,
            hidden: false,
            created_at_time: 1_700_000_000_000,
        }]);
        store.merge_spaces(vec![SpaceStruct {
            id: "100".to_string(),
            content_id: Some("sc-100".to_string()),
            handle: Some("rustlang".to_string()),
            hidden: false,
        }]);
        store.merge_profiles(vec![ProfileStruct {
            id: "alice".to_string(),
            content_id: Some("pc-alice".to_string()),
        }]);
        store.merge_contents(vec![
            (
                ContentKey::post("c-1"),
                Content::Post(PostContent {
                    title: Some("Hello World".to_string()),
                    summary: "A greeting".to_string(),
                    body: "Full body".to_string(),
                    image: Some("img.png".to_string()),
                    tags: vec!["intro".to_string()],
                    link: None,
                    is_show_more: false,
                }),
            ),
            (
                ContentKey::space("sc-100"),
                Content::Space(SpaceContent {
                    name: "Rustaceans".to_string(),
                    about: None,
                    image: None,
                }),
            ),
            (
                ContentKey::profile("pc-alice"),
                Content::Profile(ProfileContent {
                    name: "Alice".to_string(),
                    avatar: Some("alice.png".to_string()),
                }),
            ),
        ]);
        store
    }

    #[test]
    fn test_select_joins_all_tables() {
        let store = seeded_store();
        let views = select_post_views(&store, &["1".to_string()]);

        let view = &views["1"];
        assert_eq!(view.owner_name, "Alice");
        assert_eq!(view.owner_image_url, "alice.png");
        assert_eq!(view.space_name.as_deref(), Some("Rustaceans"));
        assert_eq!(view.image_url, "img.png");
        let link = view.post_link.as_ref().unwrap();
        assert!(link.by_handle);
        assert_eq!(link.href, "/@rustlang/hello-world-1");
    }

    #[test]
    fn test_missing_profile_content_falls_back_to_owner_id() {
        let mut store = seeded_store();
        store.merge_profiles(vec![ProfileStruct {
            id: "alice".to_string(),
            content_id: None,
        }]);

        let view = post_info(&store, "1").unwrap();
        assert_eq!(view.owner_name, "alice");
        assert_eq!(view.owner_image_url, "");
    }

    #[test]
    fn test_missing_post_content_skips_record() {
        let mut store = seeded_store();
        let base = store.post("1").unwrap().clone();
        store.merge_posts(vec![PostStruct {
            id: "2".to_string(),
            content_id: "c-missing".to_string(),
            ..base
        }]);

        let views = select_post_views(&store, &["1".to_string(), "2".to_string()]);
        assert!(views.contains_key("1"));
        assert!(!views.contains_key("2"));
    }

    #[test]
    fn test_link_slug_falls_back_to_truncated_summary() {
        let mut store = seeded_store();
        store.merge_contents(vec![(
            ContentKey::post("c-1"),
            Content::Post(PostContent {
                title: None,
                summary: "word ".repeat(20),
                body: String::new(),
                image: None,
                tags: vec![],
                link: None,
                is_show_more: true,
            }),
        )]);

        let view = post_info(&store, "1").unwrap();
        let link = view.post_link.unwrap();
        // 50 chars of "word word ..." slugified
        assert!(link.href.starts_with("/@rustlang/word-word-"));
        assert!(link.href.ends_with("-1"));
    }

    #[test]
    fn test_id_routing_without_handle() {
        let mut store = seeded_store();
        store.merge_spaces(vec![SpaceStruct {
            id: "100".to_string(),
            content_id: Some("sc-100".to_string()),
            handle: None,
            hidden: false,
        }]);

        let view = post_info(&store, "1").unwrap();
        let link = view.post_link.unwrap();
        assert!(!link.by_handle);
        assert_eq!(link.href, "/space/100/hello-world-1");
    }

    #[test]
    fn test_comment_renders_without_space() {
        let mut store = seeded_store();
        let base = store.post("1").unwrap().clone();
        store.merge_posts(vec![PostStruct {
            id: "9".to_string(),
            space_id: None,
            root_post_id: Some("1".to_string()),
            is_comment: true,
            content_id: "c-9".to_string(),
            ..base
        }]);
        store.merge_contents(vec![(
            ContentKey::post("c-9"),
            Content::Post(PostContent {
                title: None,
                summary: "a reply".to_string(),
                body: "a reply".to_string(),
                image: Some("QmHash".to_string()),
                tags: vec![],
                link: None,
                is_show_more: false,
            }),
        )]);

        let view = comment_info(&store, "9", "https://gw.example/").unwrap();
        assert!(view.is_comment);
        assert!(view.space_id.is_none());
        assert!(view.post_link.is_none());
        assert_eq!(view.image_url, "https://gw.example/QmHash");
        assert_eq!(view.root_post_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_comment_link_degrades_gracefully_with_space() {
        let mut store = seeded_store();
        let base = store.post("1").unwrap().clone();
        store.merge_posts(vec![PostStruct {
            id: "9".to_string(),
            space_id: Some("100".to_string()),
            root_post_id: Some("1".to_string()),
            is_comment: true,
            ..base
        }]);

        let view = comment_info(&store, "9", "https://gw.example/").unwrap();
        assert_eq!(view.space_name.as_deref(), Some("Rustaceans"));
        let link = view.post_link.unwrap();
        assert!(link.by_handle);
        assert_eq!(link.href, "/@rustlang/hello-world-9");
    }

    #[test]
    fn test_slugify_collapses_punctuation() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  spaced   out  "), "spaced-out");
        assert_eq!(slugify("!!!"), "");
    }
}
