use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, anyhow};
use dotenv::dotenv;

use crate::domain::device::models::operation::{PipelineMode, WriteAck};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Settings of the HTTP function host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server_port: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub mode: PipelineMode,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Config> {
        dotenv().ok();

        let server_port = load_env("SERVER_PORT")?;
        let database_url = load_env("DATABASE_URL")?;
        let database_max_connections =
            load_env_or("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;

        Ok(Config {
            server_port,
            database_url,
            database_max_connections,
            mode: load_mode()?,
            log_level: load_env_or("LOG_LEVEL", DEFAULT_LOG_LEVEL.to_string())?,
        })
    }
}

/// Settings of the one-shot local invoker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeConfig {
    pub mode: PipelineMode,
    pub seed_path: PathBuf,
    pub log_level: String,
}

impl InvokeConfig {
    pub fn from_env() -> anyhow::Result<InvokeConfig> {
        dotenv().ok();

        Ok(InvokeConfig {
            mode: load_mode()?,
            seed_path: PathBuf::from(load_env("DEVICE_SEED_PATH")?),
            log_level: load_env_or("LOG_LEVEL", DEFAULT_LOG_LEVEL.to_string())?,
        })
    }
}

fn load_mode() -> anyhow::Result<PipelineMode> {
    let mode: PipelineMode = load_env("FUNCTION_MODE")?
        .parse()
        .context("invalid FUNCTION_MODE")?;
    let ack_code: u16 = load_env_or("UPDATE_SUCCESS_STATUS", WriteAck::default().status_code())?;

    resolve_mode(mode, ack_code)
}

fn resolve_mode(mode: PipelineMode, ack_code: u16) -> anyhow::Result<PipelineMode> {
    match mode {
        PipelineMode::Read => Ok(PipelineMode::Read),
        PipelineMode::Update(_) => {
            let ack = WriteAck::try_from(ack_code).context("invalid UPDATE_SUCCESS_STATUS")?;
            Ok(PipelineMode::Update(ack))
        }
    }
}

fn load_env(key: &str) -> anyhow::Result<String> {
    env::var(key).with_context(|| format!("failed to load environment variable {}", key))
}

fn load_env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow!("invalid value {:?} for {}: {}", raw, key, e)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(e).with_context(|| format!("failed to load environment variable {}", key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_mode_ignores_ack() {
        let mode = resolve_mode(PipelineMode::Read, 204).unwrap();

        assert_eq!(mode, PipelineMode::Read);
    }

    #[test]
    fn test_update_mode_takes_ack() {
        let mode = resolve_mode(PipelineMode::Update(WriteAck::Ok), 204).unwrap();

        assert_eq!(mode, PipelineMode::Update(WriteAck::NoContent));
    }

    #[test]
    fn test_update_mode_rejects_unsupported_ack() {
        let result = resolve_mode(PipelineMode::Update(WriteAck::Ok), 202);

        assert!(result.is_err());
    }
}
