use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::api::Interceptor;
use crate::storage::StorageConfig;

/// Environment variable that overrides the listen port
pub const PORT_ENV: &str = "PORT";

/// Top-level application configuration loaded from file + environment.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreSection,
    pub logging: LoggingSection,
}

impl AppConfig {
    /// Load configuration from disk and environment.
    ///
    /// Environment keys nest with a double underscore, e.g.
    /// `PIZZERIA_STORE__LOCAL__ROOT_PATH` sets `store.local.root_path`.
    pub fn load() -> Result<Self> {
        let config_path =
            env::var("PIZZERIA_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let mut builder = config::Config::builder();

        if Path::new(&config_path).exists() {
            builder = builder.add_source(config::File::from(PathBuf::from(&config_path)));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("PIZZERIA")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.interceptors")
                .try_parsing(true),
        );

        let settings = builder.build()?;
        let mut config: Self = settings.try_deserialize()?;

        if let Ok(profile) = env::var("PIZZERIA_PROFILE") {
            config.server.profile = profile.parse().context("invalid PIZZERIA_PROFILE")?;
        }

        if config.logging.level.trim().is_empty() {
            config.logging.level = "info".to_string();
        }

        Ok(config)
    }

    /// Resolve and validate the store configuration.
    pub fn store_runtime(&self) -> Result<StorageConfig> {
        self.store.to_runtime()
    }
}

/// Which set of routes the process serves
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceProfile {
    /// Full ordering API backed by the store
    #[default]
    Api,
    /// Health endpoint only
    Health,
    /// Static home page only
    Home,
}

impl ServiceProfile {
    pub fn default_port(self) -> u16 {
        match self {
            ServiceProfile::Api | ServiceProfile::Health => 4040,
            ServiceProfile::Home => 3000,
        }
    }

    /// Whether this profile talks to the document store
    pub fn needs_store(self) -> bool {
        matches!(self, ServiceProfile::Api)
    }
}

impl std::str::FromStr for ServiceProfile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "api" => Ok(ServiceProfile::Api),
            "health" => Ok(ServiceProfile::Health),
            "home" => Ok(ServiceProfile::Home),
            other => anyhow::bail!("unsupported service profile: {}", other),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: Option<u16>,
    pub profile: ServiceProfile,
    pub interceptors: Vec<Interceptor>,
}

impl ServerConfig {
    /// Listen port: `PORT` env wins, then the configured port, then the
    /// profile default.
    pub fn resolve_port(&self, env_port: Option<&str>) -> Result<u16> {
        if let Some(raw) = env_port {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return trimmed
                    .parse()
                    .with_context(|| format!("invalid {} value '{}'", PORT_ENV, raw));
            }
        }

        Ok(self.port.unwrap_or_else(|| self.profile.default_port()))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: None,
            profile: ServiceProfile::default(),
            interceptors: Interceptor::default_chain(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub backend: StoreBackendKind,
    pub local: Option<LocalStoreSection>,
}

impl StoreSection {
    pub fn to_runtime(&self) -> Result<StorageConfig> {
        match self.backend {
            StoreBackendKind::Memory => Ok(StorageConfig::Memory),
            StoreBackendKind::Local => {
                let local = self.local.clone().unwrap_or_default();

                if local.root_path.trim().is_empty() {
                    bail!("store.local.root_path must be specified");
                }

                Ok(StorageConfig::Local {
                    root_path: local.root_path,
                })
            }
        }
    }
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: StoreBackendKind::Local,
            local: Some(LocalStoreSection::default()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackendKind {
    Memory,
    #[default]
    Local,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocalStoreSection {
    pub root_path: String,
}

impl Default for LocalStoreSection {
    fn default() -> Self {
        Self {
            root_path: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}
