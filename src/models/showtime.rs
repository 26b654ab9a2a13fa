use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Movie;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
    /// Вместимость зала; должна быть кратна числу мест в ряду.
    pub capacity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Showtime {
    pub id: i64,
    pub movie: Movie,
    pub room: Room,
    pub start_time: DateTime<Utc>,
    pub format: String,
    // Номинальная цена сеанса. Показывается в списке сеансов,
    // итог покупки всегда считается по тарифам мест.
    pub price: f64,
}
