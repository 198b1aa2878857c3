/// Configuration management
///
/// Loaded from environment variables, with a `.env` file honoured in
/// development.
///
/// # Environment Variables
///
/// | Variable                   | Default   | Notes                                  |
/// |----------------------------|-----------|----------------------------------------|
/// | `API_HOST`                 | `0.0.0.0` |                                        |
/// | `API_PORT`                 | `8080`    |                                        |
/// | `DATABASE_URL`             | *(unset)* | unset runs on the in-memory store      |
/// | `DATABASE_MAX_CONNECTIONS` | `10`      |                                        |
/// | `JWT_SECRET`               | required  | at least 32 characters                 |
/// | `JWT_TTL_HOURS`            | `24`      | bearer token lifetime, at most 8760    |
/// | `TASK_DEFAULT_LIMIT`       | `10`      | page size when `limit` is absent       |
/// | `ADMIN_TASK_MAX_LIMIT`     | `20`      | cap on the admin task listing          |

use std::env;
use std::str::FromStr;

use chrono::Duration;
use taskgate_shared::auth::jwt::{default_token_ttl, TokenSigner};
use taskgate_shared::services::PaginationPolicy;

/// Upper bound on `JWT_TTL_HOURS`, one year
pub const MAX_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,

    /// `None` selects the in-memory store
    pub database: Option<DatabaseConfig>,

    pub jwt: JwtConfig,

    pub tasks: TaskConfig,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,

    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,

    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,

    pub ttl_hours: i64,
}

#[derive(Debug, Clone)]
pub struct TaskConfig {
    pub default_limit: i64,

    pub admin_max_limit: i64,
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{} is invalid: {}", key, e)),
        None => Ok(default),
    }
}

impl Config {
    /// Loads configuration from the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "API_PORT", 8080u16)?;

        let database = match lookup("DATABASE_URL").filter(|url| !url.is_empty()) {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10u32)?,
            }),
            None => None,
        };

        let secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        if secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }
        let ttl_hours = parse_or(&lookup, "JWT_TTL_HOURS", default_token_ttl().num_hours())?;
        if ttl_hours <= 0 {
            anyhow::bail!("JWT_TTL_HOURS must be positive");
        }
        if ttl_hours > MAX_TTL_HOURS {
            anyhow::bail!("JWT_TTL_HOURS must not exceed {}", MAX_TTL_HOURS);
        }

        let default_limit = parse_or(&lookup, "TASK_DEFAULT_LIMIT", 10i64)?;
        let admin_max_limit = parse_or(&lookup, "ADMIN_TASK_MAX_LIMIT", 20i64)?;
        if default_limit < 0 || admin_max_limit < 0 {
            anyhow::bail!("task limits must not be negative");
        }

        Ok(Self {
            api: ApiConfig { host, port },
            database,
            jwt: JwtConfig { secret, ttl_hours },
            tasks: TaskConfig {
                default_limit,
                admin_max_limit,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    pub fn token_signer(&self) -> TokenSigner {
        TokenSigner::new(&self.jwt.secret, Duration::hours(self.jwt.ttl_hours))
    }

    pub fn pagination(&self) -> PaginationPolicy {
        PaginationPolicy {
            default_limit: self.tasks.default_limit,
            admin_max_limit: self.tasks.admin_max_limit,
            ..PaginationPolicy::default()
        }
    }
}
