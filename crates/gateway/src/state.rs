//! Application state shared across handlers.

use std::sync::Arc;

use crate::chain::{ReadPath, WritePipeline};
use crate::config::GatewayConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The chain client and signer
/// are constructed once at startup and injected here; handlers never build
/// their own.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: GatewayConfig,
    pipeline: WritePipeline,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Gateway configuration
    /// * `pipeline` - Write pipeline bound to the configured chain and signer
    #[must_use]
    pub fn new(config: GatewayConfig, pipeline: WritePipeline) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pipeline }),
        }
    }

    /// Get a reference to the gateway configuration.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    /// Get a reference to the write pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &WritePipeline {
        &self.inner.pipeline
    }

    /// Get a reference to the read path.
    #[must_use]
    pub fn reader(&self) -> &ReadPath {
        self.inner.pipeline.reader()
    }
}
