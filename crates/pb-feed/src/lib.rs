//! External feed of placeholder posts.
//!
//! The feed is read-only and idempotent. Every post it yields has a
//! synthesized `remote-<n>` identifier, no creation timestamp, and
//! [`pb_types::Provenance::Remote`].

pub mod config;
pub mod error;
pub mod fetcher;
pub mod http;

pub use config::{FeedConfig, DEFAULT_FEED_URL};
pub use error::{FeedError, FeedResult};
pub use fetcher::{feed_from_config, DisabledFeed, FeedFetcher, StaticFeed};
pub use http::HttpFeedFetcher;
