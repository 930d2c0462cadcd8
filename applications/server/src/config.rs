/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_resolver")]
    pub resolver: ResolverSettings,

    #[serde(default = "default_housekeeping")]
    pub housekeeping: HousekeepingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Public URL the web app is served from, used in bot links
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,

    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_op_timeout_ms")]
    pub op_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverSettings {
    #[serde(default = "default_ytdlp_path")]
    pub ytdlp_path: PathBuf,

    /// Search results longer than this are dropped
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HousekeepingSettings {
    /// Seconds between storage pings; 0 disables the monitor
    #[serde(default = "default_health_interval_secs")]
    pub health_interval_secs: u64,

    #[serde(default = "default_max_failed_pings")]
    pub max_failed_pings: u32,

    #[serde(default = "default_reap_enabled")]
    pub reap_enabled: bool,

    #[serde(default = "default_record_ttl_secs")]
    pub record_ttl_secs: u64,

    #[serde(default = "default_reap_interval_secs")]
    pub reap_interval_secs: u64,
}

impl StorageSettings {
    pub fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.op_timeout_ms)
    }
}

impl HousekeepingSettings {
    pub fn health_interval(&self) -> Option<Duration> {
        (self.health_interval_secs > 0).then(|| Duration::from_secs(self.health_interval_secs))
    }

    pub fn record_ttl(&self) -> Duration {
        Duration::from_secs(self.record_ttl_secs)
    }

    pub fn reap_interval(&self) -> Duration {
        Duration::from_secs(self.reap_interval_secs)
    }
}

impl ServerConfig {
    /// Load configuration from an explicit file, falling back to
    /// `config.toml` in the working directory
    ///
    /// Environment variables prefixed with `RELAY_` override file values,
    /// with `__` separating nested keys (`RELAY_SERVER__PORT=8080`).
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ServerError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from("config.toml");
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("RELAY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ServerError::Config("server.port must be non-zero".to_string()));
        }

        if self.resolver.ytdlp_path.as_os_str().is_empty() {
            return Err(ServerError::Config(
                "resolver.ytdlp_path is required (set RELAY_RESOLVER__YTDLP_PATH)".to_string(),
            ));
        }

        if self.storage.op_timeout_ms == 0 {
            return Err(ServerError::Config(
                "storage.op_timeout_ms must be non-zero".to_string(),
            ));
        }

        let housekeeping = &self.housekeeping;
        if housekeeping.health_interval_secs > 0 && housekeeping.max_failed_pings == 0 {
            return Err(ServerError::Config(
                "housekeeping.max_failed_pings must be non-zero".to_string(),
            ));
        }

        if housekeeping.reap_enabled
            && (housekeeping.record_ttl_secs == 0 || housekeeping.reap_interval_secs == 0)
        {
            return Err(ServerError::Config(
                "housekeeping.record_ttl_secs and reap_interval_secs must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.server.host.parse().map_err(|_| {
            ServerError::Config(format!(
                "server.host is not an IP address: {}",
                self.server.host
            ))
        })?;
        Ok(SocketAddr::from((ip, self.server.port)))
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
        base_url: None,
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        backend: default_backend(),
        database_url: default_database_url(),
        op_timeout_ms: default_op_timeout_ms(),
    }
}

fn default_backend() -> StorageBackend {
    StorageBackend::Sqlite
}

fn default_database_url() -> String {
    "sqlite://./data/relay.db".to_string()
}

fn default_op_timeout_ms() -> u64 {
    5000
}

fn default_resolver() -> ResolverSettings {
    ResolverSettings {
        ytdlp_path: default_ytdlp_path(),
        max_duration_secs: default_max_duration_secs(),
    }
}

fn default_ytdlp_path() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_max_duration_secs() -> u64 {
    3600
}

fn default_housekeeping() -> HousekeepingSettings {
    HousekeepingSettings {
        health_interval_secs: default_health_interval_secs(),
        max_failed_pings: default_max_failed_pings(),
        reap_enabled: default_reap_enabled(),
        record_ttl_secs: default_record_ttl_secs(),
        reap_interval_secs: default_reap_interval_secs(),
    }
}

fn default_health_interval_secs() -> u64 {
    30
}

fn default_max_failed_pings() -> u32 {
    3
}

fn default_reap_enabled() -> bool {
    true
}

fn default_record_ttl_secs() -> u64 {
    86_400
}

fn default_reap_interval_secs() -> u64 {
    3600
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            resolver: default_resolver(),
            housekeeping: default_housekeeping(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = ServerConfig::default();
        config.validate().unwrap();
        assert_eq!(
            config.bind_address().unwrap(),
            SocketAddr::from(([0, 0, 0, 0], 3000))
        );
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.housekeeping.record_ttl(), Duration::from_secs(86_400));
    }

    #[test]
    fn hostname_is_not_a_bind_address() {
        let mut config = ServerConfig::default();
        config.server.host = "localhost".to_string();
        config.server.port = 8080;

        assert!(matches!(config.bind_address(), Err(ServerError::Config(_))));

        config.server.host = "::1".to_string();
        assert_eq!(config.bind_address().unwrap().to_string(), "[::1]:8080");
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 8081\n\n[storage]\nbackend = \"memory\"\n\n[housekeeping]\nhealth_interval_secs = 0"
        )
        .unwrap();

        let config = ServerConfig::load_from(Some(file.path())).unwrap();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.housekeeping.health_interval(), None);
        assert_eq!(config.resolver.max_duration_secs, 3600);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = ServerConfig::load_from(Some(Path::new("/nonexistent/relay.toml"))).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn validate_rejects_zero_port_and_ttl() {
        let mut config = ServerConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.housekeeping.record_ttl_secs = 0;
        assert!(config.validate().is_err());

        config.housekeeping.reap_enabled = false;
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_empty_ytdlp_path() {
        let mut config = ServerConfig::default();
        config.resolver.ytdlp_path = PathBuf::new();
        assert!(config.validate().is_err());
    }
}
