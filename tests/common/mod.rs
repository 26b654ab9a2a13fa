use serde_json::{json, Value};
use wiremock::MockServer;

use cinema_client::api_client::ApiClient;
use cinema_client::config::ApiConfig;

pub fn api_client_for(server: &MockServer) -> ApiClient {
    ApiClient::from_config(&ApiConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
    })
}

pub fn movie_json() -> Value {
    json!({
        "id": 1,
        "title": "Интерстеллар",
        "duration": 169,
        "description": "Сквозь червоточину",
        "genre": "фантастика",
        "rating": 8.7
    })
}

pub fn showtime_json(id: i64, capacity: u32) -> Value {
    json!({
        "id": id,
        "movie": movie_json(),
        "room": { "id": 2, "name": "Зал 1", "capacity": capacity },
        "start_time": "2026-08-07T19:30:00Z",
        "format": "IMAX",
        "price": 11.5
    })
}

pub fn user_json() -> Value {
    json!({ "id": 5, "name": "Мария", "email": "maria@example.com" })
}

// Проданный билет в том виде, в каком его отдает бэкенд.
pub fn sold_ticket_json(id: i64, row: &str, seat_number: u32) -> Value {
    json!({
        "id": id,
        "user": user_json(),
        "showtime": showtime_json(7, 50),
        "seat": {
            "id": 0,
            "seat_number": seat_number,
            "row": row,
            "type": "standard",
            "price": 9.99,
            "available": false
        },
        "purchase_date": "2026-08-01T10:00:00Z"
    })
}
