use serde::{Deserialize, Serialize};

// Тариф места. Назначается на ряд целиком, а не на отдельные кресла.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatType {
    Standard,
    Premium,
    Vip,
}

impl SeatType {
    /// Фиксированная цена тарифа.
    pub fn price(&self) -> f64 {
        match self {
            SeatType::Standard => 9.99,
            SeatType::Premium => 12.99,
            SeatType::Vip => 16.99,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeatType::Standard => "standard",
            SeatType::Premium => "premium",
            SeatType::Vip => "vip",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    /// Уникален в пределах одной схемы зала: row_index * 10 + seat_number.
    pub id: i64,
    pub seat_number: u32,
    pub row: char,
    #[serde(rename = "type")]
    pub seat_type: SeatType,
    pub price: f64,
    pub available: bool,
}

impl Seat {
    /// Метка вида "B3" для отображения и ввода.
    pub fn label(&self) -> String {
        format!("{}{}", self.row, self.seat_number)
    }
}
