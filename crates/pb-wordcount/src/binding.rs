use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::WordCountError;
use crate::module::{CountModule, WhitespaceModule};

/// Produces a counting module. Loading may fail.
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn CountModule>, WordCountError>;
}

/// Loads the built-in [`WhitespaceModule`]. Never fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinLoader;

#[async_trait]
impl ModuleLoader for BuiltinLoader {
    async fn load(&self) -> Result<Arc<dyn CountModule>, WordCountError> {
        Ok(Arc::new(WhitespaceModule))
    }
}

/// Entry point used by views to count words without ever failing.
#[derive(Clone)]
pub struct WordCountBinding {
    loader: Arc<dyn ModuleLoader>,
}

impl WordCountBinding {
    pub fn new(loader: Arc<dyn ModuleLoader>) -> Self {
        Self { loader }
    }

    pub fn builtin() -> Self {
        Self::new(Arc::new(BuiltinLoader))
    }

    /// Load the module once for the lifetime of a view.
    pub async fn activate(&self) -> ActiveCounter {
        match self.loader.load().await {
            Ok(module) => {
                debug!(module = module.name(), "word count module loaded");
                ActiveCounter { module: Some(module) }
            }
            Err(err) => {
                warn!(error = %err, "word count unavailable, counts will show 0");
                ActiveCounter { module: None }
            }
        }
    }

    /// Load the module afresh and count. Returns 0 on any failure.
    pub async fn count(&self, text: &str) -> u64 {
        self.activate().await.count(text)
    }
}

impl Default for WordCountBinding {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for WordCountBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordCountBinding").finish_non_exhaustive()
    }
}

/// A module loaded for one view activation.
#[derive(Clone)]
pub struct ActiveCounter {
    module: Option<Arc<dyn CountModule>>,
}

impl ActiveCounter {
    pub fn is_loaded(&self) -> bool {
        self.module.is_some()
    }

    pub fn count(&self, text: &str) -> u64 {
        let Some(module) = &self.module else {
            return 0;
        };
        match module.word_count(text) {
            Ok(count) => count,
            Err(err) => {
                warn!(error = %err, module = module.name(), "word count failed");
                0
            }
        }
    }
}
