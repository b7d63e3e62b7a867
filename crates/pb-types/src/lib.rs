//! Foundation types for Postboard.
//!
//! Every other Postboard crate depends on `pb-types`.
//!
//! # Key Types
//!
//! - [`Post`] -- a title/body pair with an identifier and a provenance tag
//! - [`PostId`] -- numeric surrogate key or opaque string key
//! - [`Provenance`] -- which source produced a post (local store or remote feed)
//! - [`NewPost`] -- a validated creation request
//! - [`PostPatch`] -- a merge-patch over title and/or body

pub mod error;
pub mod id;
pub mod post;
pub mod request;

pub use error::TypeError;
pub use id::{PostId, REMOTE_KEY_PREFIX};
pub use post::{Post, Provenance};
pub use request::{NewPost, PostPatch};
