/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, JWT_SECRET, CORS 許可など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - プロセス起動時に一度だけ構築し、以降は read-only で共有する
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Test,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "test" => Self::Test,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn is_test(&self) -> bool {
        matches!(self, Self::Test)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub database_url: String,
    pub cors_allowed_origins: Vec<String>,

    // HMAC secret shared by token signing and verification
    pub jwt_secret: String,
    pub access_token_ttl_seconds: u64,
    pub access_token_leeway_seconds: u64,

    pub bcrypt_cost: u32,
    pub body_limit_bytes: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print secrets
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("database_url", &"[REDACTED]")
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("jwt_secret", &"[REDACTED]")
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field(
                "access_token_leeway_seconds",
                &self.access_token_leeway_seconds,
            )
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("body_limit_bytes", &self.body_limit_bytes)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8888);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let database_url = if app_env.is_test() {
            std::env::var("TEST_DATABASE_URL")
                .map_err(|_| ConfigError::Missing("TEST_DATABASE_URL"))?
        } else {
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?
        };

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let access_token_ttl_seconds = std::env::var("ACCESS_TOKEN_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(86_400); // 24h

        let access_token_leeway_seconds = std::env::var("ACCESS_TOKEN_LEEWAY_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        let bcrypt_cost = std::env::var("BCRYPT_COST")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid("BCRYPT_COST"));
        }

        let body_limit_bytes = std::env::var("BODY_LIMIT_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1024 * 1024);

        Ok(Self {
            addr,
            app_env,
            database_url,
            cors_allowed_origins,
            jwt_secret,
            access_token_ttl_seconds,
            access_token_leeway_seconds,
            bcrypt_cost,
            body_limit_bytes,
        })
    }
}
