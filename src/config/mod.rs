use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, AppResult};

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    pub log_format: LogFormat,
    pub store: StoreKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Где живут записи: Postgres или память процесса (локальный запуск без БД).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Postgres => "postgres",
            StoreKind::Memory => "memory",
        }
    }
}

// Настройки базы данных
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
    pub acquire_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Собирает конфигурацию из произвольного источника ключей.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let store = match get("STORE", "postgres").to_lowercase().as_str() {
            "postgres" => StoreKind::Postgres,
            "memory" => StoreKind::Memory,
            other => {
                return Err(AppError::Configuration(format!(
                    "STORE must be postgres or memory, got {other}"
                )))
            }
        };

        let log_format = match get("LOG_FORMAT", "pretty").to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(AppError::Configuration(format!(
                    "LOG_FORMAT must be pretty or json, got {other}"
                )))
            }
        };

        // Без адреса БД работать нельзя, кроме режима памяти
        let url = match lookup("DATABASE_URL").map(|v| v.trim().to_string()) {
            Some(url) if !url.is_empty() => url,
            _ if store == StoreKind::Memory => String::new(),
            _ => {
                return Err(AppError::Configuration(
                    "DATABASE_URL must be set".to_string(),
                ))
            }
        };

        Ok(Config {
            app: AppConfig {
                host: get("HOST", "0.0.0.0"),
                port: parse_setting("PORT", &get("PORT", "8000"))?,
                rust_log: get("RUST_LOG", "events_core=debug,tower_http=debug"),
                log_format,
                store,
            },
            database: DatabaseConfig {
                url,
                pool_size: parse_setting("DB_POOL_SIZE", &get("DB_POOL_SIZE", "20"))?,
                acquire_timeout_secs: parse_setting(
                    "DB_ACQUIRE_TIMEOUT_SECS",
                    &get("DB_ACQUIRE_TIMEOUT_SECS", "5"),
                )?,
                connect_timeout_secs: parse_setting(
                    "DB_CONNECT_TIMEOUT_SECS",
                    &get("DB_CONNECT_TIMEOUT_SECS", "10"),
                )?,
            },
        })
    }
}

fn parse_setting<T: FromStr>(key: &str, raw: &str) -> AppResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Configuration(format!("{key} must be a valid number, got {raw:?}")))
}
