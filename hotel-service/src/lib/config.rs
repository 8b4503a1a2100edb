use std::env;

use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    pub api: ApiConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub bootstrap: Option<BootstrapConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expires_minutes: i64,
}

impl JwtConfig {
    /// Issued tokens live `expires_minutes` × 24 minutes.
    ///
    /// # Errors
    /// * `ConfigError::Message` - `expires_minutes` is not positive or the
    ///   lifetime does not fit a `Duration`
    pub fn token_lifetime(&self) -> Result<Duration, ConfigError> {
        if self.expires_minutes <= 0 {
            return Err(ConfigError::Message(format!(
                "jwt.expires_minutes must be positive, got {}",
                self.expires_minutes
            )));
        }

        self.expires_minutes
            .checked_mul(24)
            .and_then(Duration::try_minutes)
            .ok_or_else(|| {
                ConfigError::Message(format!(
                    "jwt.expires_minutes is too large: {}",
                    self.expires_minutes
                ))
            })
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    /// Lets `admin` accounts receive every scope they request at login.
    #[serde(default)]
    pub allow_admin_scope_escalation: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Shared secret expected in the `X-API-TOKEN` header on gated route groups.
    pub token: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Supervisor account created at startup when no account with this username exists.
#[derive(Debug, Deserialize, Clone)]
pub struct BootstrapConfig {
    pub username: String,
    pub password: String,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, API__TOKEN, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.jwt.token_lifetime()?;

        Ok(config)
    }
}
