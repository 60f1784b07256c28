//! Agora - entity cache and view-model layer for chain-indexed social
//! content
//!
//! Agora sits between a blockchain-backed content index and a UI layer. It
//! pulls composite post/space/account records from the index (injected
//! behind traits), normalizes them into flat id-keyed entity tables, and
//! joins them back on demand into UI-ready view models with derived fields
//! (routing links, fallback names, gateway-resolved images).
//!
//! ## Components
//!
//! - **Normalizer**: splits nested post+space+owner records into flat,
//!   deduplicated tables, skipping records missing required content
//! - **Store**: id-indexed entity tables with last-write-wins merge and
//!   narrow counter/hidden mutations
//! - **Selectors**: pure join layer producing [`select::PostView`] /
//!   [`select::SpaceView`] models, recomputed per call
//! - **Orchestrators**: fetch → normalize → commit sequencing with retry,
//!   loading-flag bracketing, and concurrent fan-out
//! - **Ranking**: newest-first id ordering and fixed-size pagination
//!   windows

pub mod config;
pub mod context;
pub mod error;
pub mod fetch;
pub mod model;
pub mod normalize;
pub mod rank;
pub mod select;
pub mod store;

pub use config::{AppConfig, TokenRegistry};
pub use context::AppContext;
pub use error::{DataError, Result};
