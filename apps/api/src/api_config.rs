use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use colaraz_core::AppError;
use tracing_subscriber::EnvFilter;

const MIN_INTERNAL_API_TOKEN_LENGTH: usize = 32;

/// Backing store for access roles and course-creator records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(AppError::Validation(format!(
                "STORE_BACKEND must be either 'postgres' or 'memory', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub internal_api_token: String,
    pub api_host: String,
    pub api_port: u16,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let store_backend = env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_owned())
            .parse::<StoreBackend>()?;

        let database_url = match store_backend {
            StoreBackend::Postgres => Some(required_non_empty_env("DATABASE_URL")?),
            StoreBackend::Memory => env::var("DATABASE_URL")
                .ok()
                .filter(|value| !value.trim().is_empty()),
        };
        if migrate_only && database_url.is_none() {
            return Err(AppError::Validation(
                "DATABASE_URL is required to apply migrations".to_owned(),
            ));
        }

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .map(|value| {
                value.parse::<u32>().map_err(|error| {
                    AppError::Validation(format!("invalid DATABASE_MAX_CONNECTIONS: {error}"))
                })
            })
            .transpose()?
            .unwrap_or(10);

        let internal_api_token = required_env("INTERNAL_API_TOKEN")?;
        if internal_api_token.len() < MIN_INTERNAL_API_TOKEN_LENGTH {
            return Err(AppError::Validation(format!(
                "INTERNAL_API_TOKEN must be at least {MIN_INTERNAL_API_TOKEN_LENGTH} characters"
            )));
        }

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        Ok(Self {
            migrate_only,
            store_backend,
            database_url,
            database_max_connections,
            internal_api_token,
            api_host,
            api_port,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::StoreBackend;

    #[test]
    fn store_backend_parses_known_values() {
        assert!(matches!("postgres".parse::<StoreBackend>(), Ok(StoreBackend::Postgres)));
        assert!(matches!(" Memory ".parse::<StoreBackend>(), Ok(StoreBackend::Memory)));
        assert!("redis".parse::<StoreBackend>().is_err());
    }
}
