// Adapter options: defaults, shallow merge of caller overrides, env loading

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const DEFAULT_HOST: &str = "demo.goboo.de";
pub const API_PATH: &str = "/api/v3/";
pub const ENV_PREFIX: &str = "GOBOO";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid option `{key}`: expected a string, got {value}")]
    InvalidOption { key: String, value: Value },

    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterOptions {
    pub host: String,
    #[serde(default)]
    pub path: String,
    // Keys the adapter does not interpret, kept as given
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for AdapterOptions {
    fn default() -> Self {
        Self::with_host(DEFAULT_HOST)
    }
}

impl AdapterOptions {
    pub fn with_host(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: String::new(),
            extra: Map::new(),
        }
    }

    /// Overrides options key by key with `custom`.
    ///
    /// `host` and `path` must be strings; any other key is stored in `extra`,
    /// replacing an earlier value under the same key.
    pub fn merge(mut self, custom: Map<String, Value>) -> Result<Self, ConfigError> {
        for (key, value) in custom {
            match key.as_str() {
                "host" => self.host = expect_string(key, value)?,
                "path" => self.path = expect_string(key, value)?,
                _ => {
                    self.extra.insert(key, value);
                }
            }
        }
        Ok(self)
    }

    /// Reads `GOBOO_HOST` / `GOBOO_PATH`, falling back to `defaults`.
    pub fn from_env(defaults: Self) -> Result<Self, ConfigError> {
        Self::from_env_source(defaults, None)
    }

    fn from_env_source(
        defaults: Self,
        source: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .set_default("host", defaults.host.as_str())?
            .set_default("path", defaults.path.as_str())?
            .add_source(config::Environment::with_prefix(ENV_PREFIX).source(source))
            .build()?;

        Ok(Self {
            host: settings.get_string("host")?,
            path: settings.get_string("path")?,
            extra: defaults.extra,
        })
    }

    /// `http://{host}{path}/api/v3/`
    pub fn base_url(&self) -> String {
        format!("http://{}{}{}", self.host, self.path, API_PATH)
    }
}

fn expect_string(key: String, value: Value) -> Result<String, ConfigError> {
    match value {
        Value::String(text) => Ok(text),
        value => Err(ConfigError::InvalidOption { key, value }),
    }
}
