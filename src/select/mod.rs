//! Selector layer: joins the flat entity tables back into UI-ready view
//! models.
//!
//! Selectors are pure functions over a store snapshot, recomputed on every
//! call so they always reflect the latest committed tables. Missing join
//! targets exclude a record from the derived view; they never raise.

pub mod post;
pub mod space;

pub use post::{
    comment_info, post_info, post_link, select_comment_views, select_post_views, PostLink,
    PostView,
};
pub use space::{
    find_space, recommended_space_views, space_view, space_views_by_ids, SpaceView,
};
