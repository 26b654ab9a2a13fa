use serde::Deserialize;
use std::env;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub api: ApiConfig,
    pub session: SessionConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub rust_log: String,
}

// Настройки бэкенда кинотеатра
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

// Настройки локального хранилища сессии
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub path: String,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "cinema_client=debug".to_string()),
            },
            api: ApiConfig {
                base_url: env::var("CINEMA_API_URL")
                    .unwrap_or_else(|_| "http://localhost:8000".to_string()),
                timeout_seconds: env::var("CINEMA_API_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .expect("CINEMA_API_TIMEOUT_SECONDS must be a valid number"),
            },
            session: SessionConfig {
                path: env::var("CINEMA_SESSION_FILE")
                    .unwrap_or_else(|_| ".cinema_session.json".to_string()),
            },
        }
    }
}
