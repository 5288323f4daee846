use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(#[from] url::ParseError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub payment: PaymentConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StoreBackend::Postgres),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::Invalid {
                name: "STORE_BACKEND",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    /// Full connection URL; composed from DB_* credentials when DATABASE_URL is absent
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub auto_migrate: bool,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
}

// Keep the secret out of debug logs
impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    pub stripe_secret_key: Option<String>,
    pub api_base: String,
    pub currency: String,
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("stripe_secret_key", &self.stripe_secret_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("currency", &self.currency)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Environment preset plus env var overrides, without validation.
    /// Callers that layer further overrides (CLI flags) validate afterwards.
    pub fn load() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = parse_var("PORT", &v)?;
        }
        if let Ok(v) = env::var("CORS_ORIGINS") {
            self.server.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Database overrides
        if let Ok(v) = env::var("STORE_BACKEND") {
            self.database.backend = v.parse()?;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        } else if let Ok(user) = env::var("DB_USER") {
            let password = env::var("DB_PASS").ok();
            let host = env::var("DB_HOST").unwrap_or_else(|_| "localhost:5432".to_string());
            let name = env::var("DB_NAME").unwrap_or_else(|_| "bistro_boss".to_string());
            self.database.url = Some(compose_database_url(&user, password.as_deref(), &host, &name)?);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_var("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = parse_var("DATABASE_CONNECTION_TIMEOUT", &v)?;
        }
        if let Ok(v) = env::var("DATABASE_AUTO_MIGRATE") {
            self.database.auto_migrate = parse_var("DATABASE_AUTO_MIGRATE", &v)?;
        }

        // Security overrides
        if let Ok(v) = env::var("ACCESS_TOKEN_SECRET") {
            self.security.jwt_secret = v;
        }

        // Payment overrides
        if let Ok(v) = env::var("STRIPE_SECRET_KEY") {
            self.payment.stripe_secret_key = Some(v).filter(|k| !k.is_empty());
        }
        if let Ok(v) = env::var("STRIPE_API_BASE") {
            self.payment.api_base = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("PAYMENT_CURRENCY") {
            self.payment.currency = v.to_ascii_lowercase();
        }

        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::Missing("ACCESS_TOKEN_SECRET"));
        }
        if self.database.backend == StoreBackend::Postgres && self.database.url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        Ok(())
    }

    /// Bind address as `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                cors_origins: vec!["http://localhost:5173".to_string()],
            },
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                max_connections: 10,
                connection_timeout: 30,
                auto_migrate: true,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
            },
            payment: PaymentConfig {
                stripe_secret_key: None,
                api_base: "https://api.stripe.com".to_string(),
                currency: "usd".to_string(),
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.server.cors_origins = vec!["https://staging.bistro-boss.example".to_string()];
        config.database.max_connections = 20;
        config.database.connection_timeout = 10;
        config.database.auto_migrate = false;
        config
    }

    fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.server.cors_origins = vec!["https://bistro-boss.example".to_string()];
        config.database.max_connections = 50;
        config.database.connection_timeout = 5;
        config.database.auto_migrate = false;
        config
    }
}

fn parse_var<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

/// Build a Postgres URL from separate credentials, percent-encoding as needed
pub fn compose_database_url(
    user: &str,
    password: Option<&str>,
    host: &str,
    database: &str,
) -> Result<String, ConfigError> {
    let mut url = url::Url::parse(&format!("postgres://{}", host))?;
    url.set_username(user).map_err(|_| ConfigError::Invalid {
        name: "DB_USER",
        value: user.to_string(),
    })?;
    url.set_password(password).map_err(|_| ConfigError::Invalid {
        name: "DB_PASS",
        value: "<redacted>".to_string(),
    })?;
    url.set_path(&format!("/{}", database));
    Ok(url.into())
}
