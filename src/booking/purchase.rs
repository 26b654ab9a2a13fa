use tracing::{error, info};

use crate::api_client::{ApiClient, ApiError};
use crate::models::{Seat, Ticket, TicketPurchase, User};

/// Отправка оформленного выбора мест на покупку.
#[derive(Clone)]
pub struct PurchaseExecutor {
    api: ApiClient,
}

impl PurchaseExecutor {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Формирует по одному заказу на место и отправляет их одним
    /// запросом: единственное место уходит на одиночный эндпоинт,
    /// несколько - на bulk. Цена в заказ не входит, бэкенд выводит ее
    /// сам по паре (ряд, номер).
    pub async fn purchase(
        &self,
        user: &User,
        showtime_id: i64,
        seats: &[&Seat],
    ) -> Result<Vec<Ticket>, ApiError> {
        let orders = shape_orders(user, showtime_id, seats);

        match self.api.buy_tickets(&orders).await {
            Ok(tickets) => {
                info!(
                    "Purchase confirmed: {} ticket(s) for showtime {}",
                    tickets.len(),
                    showtime_id
                );
                Ok(tickets)
            }
            Err(e) => {
                error!("Purchase failed for showtime {}: {}", showtime_id, e);
                Err(e)
            }
        }
    }
}

// Заявка на покупку: по одной записи на место.
fn shape_orders(user: &User, showtime_id: i64, seats: &[&Seat]) -> Vec<TicketPurchase> {
    seats
        .iter()
        .map(|seat| TicketPurchase {
            user_id: user.id,
            showtime_id,
            seat_number: seat.seat_number,
            row: seat.row,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seating::generate_seats;
    use crate::test_util::{showtime, user};

    #[test]
    fn orders_carry_only_identity_not_price() {
        let seats = generate_seats(&showtime(50)).unwrap();
        let b3 = &seats[12];
        let e7 = &seats[46];

        let orders = shape_orders(&user(), 7, &[b3, e7]);
        assert_eq!(
            orders,
            vec![
                TicketPurchase {
                    user_id: 5,
                    showtime_id: 7,
                    seat_number: 3,
                    row: 'B',
                },
                TicketPurchase {
                    user_id: 5,
                    showtime_id: 7,
                    seat_number: 7,
                    row: 'E',
                },
            ]
        );
    }

    #[test]
    fn order_serializes_without_price_or_type_fields() {
        let order = TicketPurchase {
            user_id: 5,
            showtime_id: 7,
            seat_number: 3,
            row: 'B',
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "user_id": 5,
                "showtime_id": 7,
                "seat_number": 3,
                "row": "B",
            })
        );
    }
}
