//! Layered configuration.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults,
//! 2. `config.toml` in the user's configuration directory, if present,
//! 3. an explicitly requested file (TOML, YAML or JSON, by extension),
//! 4. `SPELUNK_` environment variables, `__` separating nested keys
//!    (`SPELUNK_HTTP__TIMEOUT_SECS=5`),
//! 5. command-line overrides.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "SPELUNK_";
const USER_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of paths processed at the same time.
    pub concurrency: u16,
    pub http: HttpConfig,
    pub rate_limit: RateLimitConfig,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            concurrency: 32,
            http: HttpConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: Option<String>,
    pub timeout_secs: u64,
    /// Accept invalid TLS certificates.
    pub insecure: bool,
}
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout_secs: 30,
            insecure: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// How long a worker sleeps between checks while the remote is throttling.
    pub pause_ms: u64,
    /// How long after a `429` the throttle flag stays raised.
    pub cooldown_ms: u64,
}
impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            pause_ms: 1_000,
            cooldown_ms: 10_000,
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.rate_limit.pause_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.rate_limit.cooldown_ms)
    }

    fn validate(self) -> Result<Self> {
        if self.concurrency == 0 {
            exn::bail!(ErrorKind::Invalid {
                field: "concurrency",
                reason: "must be at least 1",
            });
        }
        if self.http.timeout_secs == 0 {
            exn::bail!(ErrorKind::Invalid {
                field: "http.timeout_secs",
                reason: "must be at least 1",
            });
        }
        Ok(self)
    }
}

/// Values given on the command line. `None` leaves lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<u16>,
    pub http: HttpOverrides,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HttpOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
}

/// Builder for a [`Config`].
///
/// ```no_run
/// use spelunk_config::{Loader, Overrides};
///
/// # fn example() -> spelunk_config::error::Result<()> {
/// let config = Loader::new()
///     .file("spelunk.yaml")
///     .overrides(Overrides { concurrency: Some(8), ..Overrides::default() })
///     .load()?;
/// assert_eq!(config.concurrency, 8);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Loader {
    user_file: Option<PathBuf>,
    file: Option<PathBuf>,
    env: bool,
    overrides: Overrides,
}
impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
impl Loader {
    /// A loader reading the user configuration file and the environment.
    pub fn new() -> Self {
        Self {
            user_file: ProjectDirs::from("", "", "spelunk").map(|dirs| dirs.config_dir().join(USER_CONFIG_FILE)),
            file: None,
            env: true,
            overrides: Overrides::default(),
        }
    }

    /// A loader that only uses defaults, plus whatever is added to it.
    pub fn isolated() -> Self {
        Self {
            user_file: None,
            file: None,
            env: false,
            overrides: Overrides::default(),
        }
    }

    /// Read an explicit configuration file, which must exist.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn load(&self) -> Result<Config> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(user_file) = &self.user_file
            && user_file.is_file()
        {
            tracing::debug!(file = %user_file.display(), "reading user configuration");
            figment = figment.merge(Toml::file(user_file));
        }
        if let Some(file) = &self.file {
            if !file.is_file() {
                exn::bail!(ErrorKind::NotFound(file.clone()));
            }
            tracing::debug!(file = %file.display(), "reading configuration");
            figment = Self::merge_file(figment, file)?;
        }
        if self.env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }
        figment = figment.merge(Serialized::defaults(&self.overrides));
        let config: Config = figment.extract().map_err(|e| ErrorKind::Load(e.to_string()))?;
        config.validate()
    }

    fn merge_file(figment: Figment, file: &Path) -> Result<Figment> {
        let extension = file.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
        Ok(match extension.as_deref() {
            Some("toml") => figment.merge(Toml::file(file)),
            Some("yaml" | "yml") => figment.merge(Yaml::file(file)),
            Some("json") => figment.merge(Json::file(file)),
            _ => exn::bail!(ErrorKind::UnsupportedFormat(file.to_path_buf())),
        })
    }
}
