//! Entity model for the chain content index.
//!
//! A *struct* is the canonical on-chain record (ids, counters, flags); its
//! human-readable *content* is an off-chain payload referenced by
//! `content_id`. Content ids are only unique within a struct kind, so
//! contents are addressed by scoped [`ContentKey`]s rather than a flat id
//! space.

pub mod composite;
pub mod content;
pub mod post;
pub mod profile;
pub mod space;

pub use composite::{CompositeRecord, PostWithContent, ProfileWithContent, SpaceWithContent};
pub use content::{Content, ContentKey, ContentKind, PostContent, ProfileContent, SpaceContent};
pub use post::PostStruct;
pub use profile::ProfileStruct;
pub use space::SpaceStruct;
