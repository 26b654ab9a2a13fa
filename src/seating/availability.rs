use std::collections::HashSet;
use tracing::warn;

use crate::models::{Seat, Ticket};

/// Помечает занятые места по списку проданных билетов.
///
/// Сопоставление идет по ключу "ряд-номер" через хеш-набор, один проход
/// по билетам и один по местам. Билет, не попадающий ни в одно место
/// схемы, не ошибка: данные бэкенда могут расходиться со схемой, такой
/// билет просто игнорируется.
pub fn resolve_availability(seats: &mut [Seat], sold_tickets: &[Ticket]) {
    let taken: HashSet<String> = sold_tickets
        .iter()
        .map(|ticket| seat_key(ticket.seat.row, ticket.seat.seat_number))
        .collect();

    let mut matched = 0usize;
    for seat in seats.iter_mut() {
        seat.available = !taken.contains(&seat_key(seat.row, seat.seat_number));
        if !seat.available {
            matched += 1;
        }
    }

    if matched < taken.len() {
        warn!(
            "{} sold ticket(s) reference seats outside the generated layout",
            taken.len() - matched
        );
    }
}

fn seat_key(row: char, seat_number: u32) -> String {
    format!("{}-{}", row, seat_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seating::generate_seats;
    use crate::test_util::{showtime, sold_ticket};

    #[test]
    fn sold_seats_become_unavailable() {
        let mut seats = generate_seats(&showtime(50)).unwrap();
        let sold = vec![sold_ticket('B', 3), sold_ticket('E', 7)];

        resolve_availability(&mut seats, &sold);

        let taken: Vec<String> = seats
            .iter()
            .filter(|seat| !seat.available)
            .map(|seat| seat.label())
            .collect();
        assert_eq!(taken, vec!["B3".to_string(), "E7".to_string()]);
    }

    #[test]
    fn unsold_layout_is_fully_available() {
        let mut seats = generate_seats(&showtime(50)).unwrap();
        resolve_availability(&mut seats, &[]);
        assert!(seats.iter().all(|seat| seat.available));
    }

    #[test]
    fn ticket_outside_the_layout_is_ignored() {
        let mut seats = generate_seats(&showtime(50)).unwrap();
        // Ряд 'Z' в зале на 5 рядов не существует, номер 11 - тоже.
        let sold = vec![sold_ticket('Z', 1), sold_ticket('A', 11), sold_ticket('A', 1)];

        resolve_availability(&mut seats, &sold);

        let taken: Vec<String> = seats
            .iter()
            .filter(|seat| !seat.available)
            .map(|seat| seat.label())
            .collect();
        assert_eq!(taken, vec!["A1".to_string()]);
    }

    #[test]
    fn refetch_overwrites_previous_availability() {
        let mut seats = generate_seats(&showtime(50)).unwrap();
        resolve_availability(&mut seats, &[sold_ticket('A', 1)]);
        assert!(!seats[0].available);

        // Повторное разрешение по новому списку полностью перезаписывает флаги.
        resolve_availability(&mut seats, &[sold_ticket('A', 2)]);
        assert!(seats[0].available);
        assert!(!seats[1].available);
    }
}
