use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use pb_feed::FeedConfig;
use pb_store::StoreConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Environment variable that overrides `api_key`.
pub const API_KEY_ENV: &str = "POSTBOARD_API_KEY";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Shared secret for mutating requests. `None` refuses all mutations.
    pub api_key: Option<String>,
    pub store: StoreConfig,
    pub feed: FeedConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 3000)),
            api_key: None,
            store: StoreConfig::default(),
            feed: FeedConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Read a TOML config file, then apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Ok(Self::from_toml(&text)?.with_env_overrides())
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert!(c.api_key.is_none());
        assert_eq!(c.store, StoreConfig::Memory);
        assert!(c.feed.enabled);
    }

    #[test]
    fn full_toml() {
        let c = ServerConfig::from_toml(
            r#"
            bind_addr = "0.0.0.0:8080"
            api_key = "enabl123"

            [store]
            backend = "sqlite"
            database_url = "sqlite://posts.db"

            [feed]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 8080);
        assert_eq!(c.api_key.as_deref(), Some("enabl123"));
        assert_eq!(c.store, StoreConfig::Sqlite { database_url: "sqlite://posts.db".into() });
        assert!(!c.feed.enabled);
        assert_eq!(c.feed.timeout_secs, 10);
    }

    #[test]
    fn empty_toml_is_default() {
        let c = ServerConfig::from_toml("").unwrap();
        assert_eq!(c.bind_addr, ServerConfig::default().bind_addr);
    }

    #[test]
    fn bad_toml_is_config_error() {
        assert!(matches!(ServerConfig::from_toml("bind_addr = 5"), Err(ServerError::Config(_))));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bind_addr = \"127.0.0.1:4000\"").unwrap();
        let c = ServerConfig::load(file.path()).unwrap();
        assert_eq!(c.bind_addr.port(), 4000);
    }

    #[test]
    fn missing_file_is_config_error() {
        assert!(matches!(
            ServerConfig::load("/nonexistent/postboard.toml"),
            Err(ServerError::Config(_))
        ));
    }
}
