use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
    /// Origin used when building public upload URLs (e.g. `https://cdn.example.org`).
    /// When unset, the origin is derived from the request `Host` header.
    pub public_base_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Local disk storage for uploaded complaint media
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding uploaded files, served under `/uploads`
    pub upload_dir: PathBuf,
    /// Maximum size of a single uploaded file in bytes
    pub max_file_size: usize,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Non-blank value of an environment variable
fn non_blank(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse an optional variable, falling back to `default` when unset
fn parse_or<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match non_blank(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| format!("{} must be a valid number, got '{}'", key, raw)),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_PORT: u16 = 5000;
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 50 * 1024 * 1024; // 50MB

    pub fn from_env() -> Result<Self, String> {
        let cors_allowed_origins = non_blank("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host: non_blank("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", Self::DEFAULT_PORT)?,
            cors_allowed_origins,
            max_request_body_size: parse_or(
                "MAX_REQUEST_BODY_SIZE",
                Self::DEFAULT_MAX_REQUEST_BODY_SIZE,
            )?,
            public_base_url: non_blank("PUBLIC_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string()),
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Host used for upload URLs when the request carries no `Host` header
    pub fn fallback_host(&self) -> String {
        format!("localhost:{}", self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 0;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = non_blank("DATABASE_URL").ok_or_else(|| "DATABASE_URL must be set".to_string())?;

        Ok(Self {
            url,
            max_connections: parse_or("DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?,
            min_connections: parse_or("DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?,
            acquire_timeout_secs: parse_or(
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: parse_or("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?,
            max_lifetime_secs: parse_or("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?,
        })
    }

    /// Connection URL with credentials stripped, safe for logs
    pub fn redacted_url(&self) -> &str {
        self.url.split('@').next_back().unwrap_or("***")
    }
}

impl StorageConfig {
    const DEFAULT_UPLOAD_DIR: &'static str = "uploads";
    const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024; // 10MB

    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            upload_dir: PathBuf::from(
                non_blank("UPLOAD_DIR").unwrap_or_else(|| Self::DEFAULT_UPLOAD_DIR.to_string()),
            ),
            max_file_size: parse_or("MAX_UPLOAD_FILE_SIZE", Self::DEFAULT_MAX_FILE_SIZE)?,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            title: non_blank("SWAGGER_TITLE").unwrap_or_else(|| "Complaints API".to_string()),
            version: non_blank("SWAGGER_VERSION").unwrap_or_else(|| "0.1.0".to_string()),
            description: non_blank("SWAGGER_DESCRIPTION").unwrap_or_else(|| {
                "API documentation for the civic complaints service".to_string()
            }),
        })
    }
}
