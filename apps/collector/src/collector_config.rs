use std::env;
use std::time::Duration;

use queuewait_core::{AppError, AppResult};
use queuewait_infrastructure::{TaskRouterConfig, redis_connection_url};
use tracing_subscriber::EnvFilter;

const DEFAULT_TASKROUTER_BASE_URL: &str = "https://taskrouter.twilio.com";

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub taskrouter: TaskRouterConfig,
    pub taskrouter_timeout_seconds: u64,
    pub redis_url: String,
    pub queue_times_ttl_seconds: u64,
    pub interval_seconds: Option<u64>,
}

impl CollectorConfig {
    pub fn load() -> AppResult<Self> {
        let taskrouter = TaskRouterConfig {
            base_url: env::var("TASKROUTER_BASE_URL")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TASKROUTER_BASE_URL.to_owned()),
            account_sid: required_non_empty_env("TWILIO_ACCOUNT_SID")?,
            auth_token: required_non_empty_env("TWILIO_AUTH_TOKEN")?,
            workspace_sid: required_non_empty_env("TWILIO_WORKSPACE_SID")?,
        };
        let taskrouter_timeout_seconds = parse_env_u64("TASKROUTER_TIMEOUT_SECONDS", 15)?;
        let queue_times_ttl_seconds = parse_env_u64("QUEUE_TIMES_TTL_SECONDS", 0)?;
        let interval_seconds = match env::var("COLLECTOR_INTERVAL_SECONDS") {
            Ok(value) if !value.trim().is_empty() => Some(parse_u64(
                "COLLECTOR_INTERVAL_SECONDS",
                value.trim(),
            )?),
            _ => None,
        };

        if taskrouter_timeout_seconds == 0 {
            return Err(AppError::Validation(
                "TASKROUTER_TIMEOUT_SECONDS must be greater than zero".to_owned(),
            ));
        }

        if interval_seconds == Some(0) {
            return Err(AppError::Validation(
                "COLLECTOR_INTERVAL_SECONDS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            taskrouter,
            taskrouter_timeout_seconds,
            redis_url: redis_url_from_env()?,
            queue_times_ttl_seconds,
            interval_seconds,
        })
    }

    pub fn taskrouter_timeout(&self) -> Duration {
        Duration::from_secs(self.taskrouter_timeout_seconds)
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval_seconds.map(Duration::from_secs)
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

fn redis_url_from_env() -> AppResult<String> {
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

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> AppResult<String> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn parse_env_u64(name: &str, default: u64) -> AppResult<u64> {
    match env::var(name) {
        Ok(value) => parse_u64(name, value.as_str()),
        Err(_) => Ok(default),
    }
}

fn parse_u64(name: &str, value: &str) -> AppResult<u64> {
    value
        .parse::<u64>()
        .map_err(|error| AppError::Validation(format!("invalid {name} value '{value}': {error}")))
}
