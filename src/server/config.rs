use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchBackendKind {
    /// Rank recipes in-process from the database.
    #[default]
    Local,
    /// Delegate ranking to the external search service.
    Remote,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub jwt_secret: String,

    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default)]
    pub search_backend: SearchBackendKind,

    #[serde(default)]
    pub search_api_url: Option<String>,

    #[serde(default)]
    pub search_api_token: String,

    #[serde(default = "default_search_timeout_secs")]
    pub search_timeout_secs: u64,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
struct PartialServerConfig {
    database_url: Option<String>,
    jwt_secret: Option<String>,
    listen_addr: Option<String>,
    log_dir: Option<String>,
    search_backend: Option<SearchBackendKind>,
    search_api_url: Option<String>,
    search_api_token: Option<String>,
    search_timeout_secs: Option<u64>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_search_timeout_secs() -> u64 {
    15
}

impl ServerConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self, String> {
        dotenv::dotenv().ok();

        let env_config: PartialServerConfig = envy::from_env::<PartialServerConfig>()
            .map_err(|e| format!("Failed to load config from environment: {e}"))?;

        Self::layered(config_path, env_config)
    }

    fn layered(config_path: Option<&str>, env_config: PartialServerConfig) -> Result<Self, String> {
        // 1. Load from file (optional)
        let file_config: PartialServerConfig = if let Some(path_str) = config_path {
            let path = Path::new(path_str);
            if path.exists() {
                let contents = fs::read_to_string(path)
                    .map_err(|e| format!("Failed to read config file at {path:?}: {e}"))?;
                toml::from_str(&contents)
                    .map_err(|e| format!("Failed to parse TOML from config file at {path:?}: {e}"))?
            } else {
                PartialServerConfig::default()
            }
        } else {
            PartialServerConfig::default()
        };

        // 2. Merge: environment overrides file
        let final_config = ServerConfig {
            database_url: env_config
                .database_url
                .or(file_config.database_url)
                .ok_or("DATABASE_URL is required")?,
            jwt_secret: env_config
                .jwt_secret
                .or(file_config.jwt_secret)
                .ok_or("JWT_SECRET is required")?,
            listen_addr: env_config
                .listen_addr
                .or(file_config.listen_addr)
                .unwrap_or_else(default_listen_addr),
            log_dir: env_config
                .log_dir
                .or(file_config.log_dir)
                .unwrap_or_else(default_log_dir),
            search_backend: env_config
                .search_backend
                .or(file_config.search_backend)
                .unwrap_or_default(),
            search_api_url: env_config.search_api_url.or(file_config.search_api_url),
            search_api_token: env_config
                .search_api_token
                .or(file_config.search_api_token)
                .unwrap_or_default(),
            search_timeout_secs: env_config
                .search_timeout_secs
                .or(file_config.search_timeout_secs)
                .unwrap_or_else(default_search_timeout_secs),
        };

        if final_config.search_backend == SearchBackendKind::Remote
            && final_config.search_api_url.is_none()
        {
            return Err("SEARCH_API_URL is required when SEARCH_BACKEND is remote".to_string());
        }

        Ok(final_config)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs.max(1))
    }
}
