use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Seat, Showtime, User};

/// Проданный билет: связывает пользователя, сеанс и одно место.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub user: User,
    pub showtime: Showtime,
    pub seat: Seat,
    /// Дата покупки; проставляется бэкендом.
    #[serde(default)]
    pub purchase_date: Option<DateTime<Utc>>,
}

// Тело запроса на покупку. Тип и цена места клиентом не передаются:
// бэкенд восстанавливает их сам по (showtime_id, row, seat_number).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketPurchase {
    pub user_id: i64,
    pub showtime_id: i64,
    pub seat_number: u32,
    pub row: char,
}
