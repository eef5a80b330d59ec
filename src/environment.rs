// Bootstrap handle owning the adapter that the rest of an application uses

use crate::adapter::Adapter;
use crate::options::{AdapterOptions, ConfigError};
use crate::transport::{ReqwestTransport, Transport};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

// Host used when an environment is initialized without one
pub const ENVIRONMENT_HOST: &str = "demo.goboo.io";

/// Holds the currently active adapter.
///
/// Created once at startup and passed to whatever issues requests. Replacing
/// the adapter does not affect requests already running on the old one.
pub struct Environment<T = ReqwestTransport> {
    active: RwLock<Arc<Adapter<T>>>,
}

/// `{host: "demo.goboo.io"}` overridden by `custom`, key by key.
pub fn environment_options(custom: Map<String, Value>) -> Result<AdapterOptions, ConfigError> {
    AdapterOptions::with_host(ENVIRONMENT_HOST).merge(custom)
}

impl Environment<ReqwestTransport> {
    pub fn init(custom: Map<String, Value>) -> Result<Self, ConfigError> {
        let options = environment_options(custom)?;
        info!(host = %options.host, path = %options.path, "initializing booking environment");
        Ok(Self::with_adapter(Adapter::new(options)))
    }

    // Same defaults as `init`, overridden by GOBOO_HOST / GOBOO_PATH
    pub fn from_env() -> Result<Self, ConfigError> {
        let options = AdapterOptions::from_env(AdapterOptions::with_host(ENVIRONMENT_HOST))?;
        Ok(Self::with_adapter(Adapter::new(options)))
    }

    /// Builds a new adapter from `custom` and makes it the active one.
    pub fn reinit(&self, custom: Map<String, Value>) -> Result<Arc<Adapter>, ConfigError> {
        let options = environment_options(custom)?;
        info!(host = %options.host, path = %options.path, "replacing booking adapter");
        Ok(self.replace(Adapter::new(options)))
    }
}

impl<T: Transport> Environment<T> {
    pub fn with_adapter(adapter: Adapter<T>) -> Self {
        Self {
            active: RwLock::new(Arc::new(adapter)),
        }
    }

    pub fn adapter(&self) -> Arc<Adapter<T>> {
        Arc::clone(&self.active.read())
    }

    // Last writer wins; returns the adapter that is now active
    pub fn replace(&self, adapter: Adapter<T>) -> Arc<Adapter<T>> {
        let adapter = Arc::new(adapter);
        *self.active.write() = Arc::clone(&adapter);
        adapter
    }
}
