use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Without a database URL accounts live in memory for the life of the process.
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", 3050),
            database_url: var("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            max_connections: try_load("DATABASE_MAX_CONNECTIONS", 5),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = var(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };

    raw.trim().parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value '{raw}': {e}, using default: {default}");
        default
    })
}
