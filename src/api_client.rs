//! api_client.rs
//!
//! Клиент REST API кинотеатра. Инкапсулирует всю работу с HTTP:
//! построение адресов, сериализацию тел запросов и разбор ответов.
//!
//! Ключевые решения:
//! 1.  **Один `reqwest::Client` с таймаутом из конфигурации** - никаких
//!     ретраев и собственных таймаутов поверх него; сетевая ошибка сразу
//!     всплывает наружу как `ApiError`.
//! 2.  **Покупка билетов одним запросом**: одно место уходит на одиночный
//!     эндпоинт, несколько - одним массивом на bulk. Клиент никогда не
//!     делает N отдельных запросов на N мест.
//! 3.  **Текст ошибки сервера**, если он есть в теле ответа, сохраняется
//!     и показывается пользователю вместо общего сообщения.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use crate::config::ApiConfig;
use crate::models::{Credentials, Movie, Registration, Showtime, Ticket, TicketPurchase, User};

/// Ошибки при обращении к API кинотеатра.
#[derive(Debug)]
pub enum ApiError {
    /// Транспортная ошибка HTTP-клиента (сеть, таймаут, декодирование).
    Http(reqwest::Error),
    /// Ответ бэкенда с ошибочным статусом; message - текст из тела, если был.
    Api {
        status: StatusCode,
        message: Option<String>,
    },
}

impl ApiError {
    /// Сообщение для пользователя: текст сервера, если он есть, иначе общее.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Api {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Api { status, .. } => format!("Запрос отклонен сервером ({})", status),
            ApiError::Http(_) => "Ошибка сети, попробуйте еще раз".to_string(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Http(e) => write!(f, "HTTP error: {}", e),
            ApiError::Api {
                status,
                message: Some(message),
            } => write!(f, "API error {}: {}", status, message),
            ApiError::Api { status, .. } => write!(f, "API error {}", status),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Http(e)
    }
}

// Тело, которое бэкенд присылает вместе с не-2xx статусом.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Клиент для всех эндпоинтов бэкенда под `{base_url}/api`.
#[derive(Clone)]
pub struct ApiClient {
    /// Асинхронный HTTP-клиент.
    http_client: reqwest::Client,
    /// Базовый URL бэкенда без завершающего слеша.
    base_url: String,
}

impl ApiClient {
    /// Создает и конфигурирует клиент на основе настроек приложения.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_seconds))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    // Общий разбор ответа: 2xx декодируем как T, иначе вытаскиваем message.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message);
            error!("API request failed: status={}, message={:?}", status, message);
            Err(ApiError::Api { status, message })
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.http_client.get(self.url(path)).send().await?;
        Self::handle_response(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http_client
            .post(self.url(path))
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn get_movies(&self) -> Result<Vec<Movie>, ApiError> {
        self.get_json("/movies").await
    }

    pub async fn get_movie(&self, id: i64) -> Result<Movie, ApiError> {
        self.get_json(&format!("/movies/{}", id)).await
    }

    pub async fn get_showtime(&self, id: i64) -> Result<Showtime, ApiError> {
        self.get_json(&format!("/showtimes/{}", id)).await
    }

    pub async fn get_showtimes_for_movie(&self, movie_id: i64) -> Result<Vec<Showtime>, ApiError> {
        self.get_json(&format!("/showtimes/movies/{}/showtimes", movie_id))
            .await
    }

    /// Проданные билеты сеанса; по ним считается занятость мест.
    pub async fn get_tickets_for_showtime(&self, showtime_id: i64) -> Result<Vec<Ticket>, ApiError> {
        self.get_json(&format!("/tickets/showtime/{}", showtime_id))
            .await
    }

    /// Покупка билетов: одно место - POST /tickets, несколько - одним
    /// массивом в POST /tickets/bulk. Оба эндпоинта отвечают списком билетов.
    pub async fn buy_tickets(&self, orders: &[TicketPurchase]) -> Result<Vec<Ticket>, ApiError> {
        info!("Submitting ticket purchase: {} seat(s)", orders.len());
        if orders.len() == 1 {
            self.post_json("/tickets", &orders[0]).await
        } else {
            self.post_json("/tickets/bulk", orders).await
        }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        info!("Logging in as {}", credentials.email);
        self.post_json("/users/login", credentials).await
    }

    pub async fn register(&self, registration: &Registration) -> Result<User, ApiError> {
        info!("Registering user {}", registration.email);
        self.post_json("/users", registration).await
    }
}
