use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use queuewait_core::AppError;
use queuewait_infrastructure::redis_connection_url;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub redis_url: String,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        Ok(Self {
            api_host,
            api_port,
            redis_url: redis_url_from_env()?,
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

fn redis_url_from_env() -> Result<String, AppError> {
    if let Some(redis_url) = env::var("REDIS_URL")
        .ok()
        .filter(|value| !value.trim().is_empty())
    {
        return Ok(redis_url);
    }

    let host = required_non_empty_env("REDIS_HOST")?;
    let port = match env::var("REDIS_PORT") {
        Ok(value) => value
            .parse::<u16>()
            .map_err(|error| AppError::Validation(format!("invalid REDIS_PORT: {error}")))?,
        Err(_) => 6379,
    };
    let password = env::var("REDIS_PASSWORD").ok();

    Ok(redis_connection_url(&host, port, password.as_deref()))
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
