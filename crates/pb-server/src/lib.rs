//! HTTP API for Postboard.
//!
//! | Route | Methods | Auth |
//! |---|---|---|
//! | `/posts` | `GET`, `POST` | `POST` needs `x-api-key` |
//! | `/posts/{id}` | `GET`, `PUT`, `DELETE` | `PUT`, `DELETE` need `x-api-key` |
//! | `/health`, `/info` | `GET` | none |
//!
//! Authorization runs before any validation, and validation runs before any
//! mutation. Internal faults are logged and surface as a generic 500.

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;


pub use auth::{Action, AuthProvider, Credentials, SharedSecretAuth, API_KEY_HEADER};
pub use config::{ServerConfig, API_KEY_ENV};
pub use error::{ApiError, ApiResult, ServerError, ServerResult};
pub use handler::AppState;
pub use router::build_router;
pub use server::PostboardServer;
