use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

const CONFIG_PATH_VAR: &str = "PENNANT_CONFIG";
const LISTEN_VAR: &str = "LISTEN";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    /// Largest request line plus header block accepted, in bytes. Also the
    /// size of each connection's read buffer.
    pub max_head_bytes: usize,
    /// Base URL that `/httpbin/...` requests are relayed to.
    pub upstream: String,
    pub upstream_connect_timeout_ms: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:42069".to_string(),
            max_head_bytes: 8192,
            upstream: "http://httpbin.org".to_string(),
            upstream_connect_timeout_ms: 5000,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Builds the configuration from the environment.
    ///
    /// Starts from defaults, reads the YAML file named by `PENNANT_CONFIG`
    /// if set, then lets `LISTEN` override the listen address.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(addr) = std::env::var(LISTEN_VAR) {
            cfg.listen_addr = addr;
        }

        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(text)?;
        if cfg.max_head_bytes == 0 {
            anyhow::bail!("max_head_bytes must be greater than zero");
        }
        Ok(cfg)
    }

    pub fn upstream_connect_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_connect_timeout_ms)
    }

    /// The configured log level, falling back to INFO if it does not parse.
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}
