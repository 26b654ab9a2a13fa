use thiserror::Error;
use tracing::debug;

use crate::models::{Seat, SeatType, Showtime};

/// Мест в одном ряду; вместимость зала должна быть кратна этому числу.
pub const SEATS_PER_ROW: u32 = 10;

/// Ряды помечаются одной буквой 'A'..'Z', поэтому рядов не больше 26.
pub const MAX_ROWS: u32 = 26;

// Порядок тарифных блоков: ближние к экрану ряды - standard,
// дальше premium, последний блок - vip.
const TIER_ORDER: [SeatType; 3] = [SeatType::Standard, SeatType::Premium, SeatType::Vip];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("room capacity {capacity} is not a positive multiple of 10 seats per row")]
    CapacityNotDivisible { capacity: u32 },
    #[error("room capacity {capacity} needs {rows} rows, row labels only cover 'A'..'Z'")]
    TooManyRows { capacity: u32, rows: u32 },
}

/// Строит полную карту мест зала по вместимости комнаты сеанса.
///
/// Ряды нумеруются с 'A'; тариф назначается на ряд целиком, три тарифа
/// делят ряды на непрерывные блоки максимально поровну: первые
/// `rows % 3` тарифов получают по одному лишнему ряду. Результат
/// детерминирован - одна и та же вместимость всегда дает одну и ту же
/// схему.
pub fn generate_seats(showtime: &Showtime) -> Result<Vec<Seat>, LayoutError> {
    let capacity = showtime.room.capacity;
    if capacity == 0 || capacity % SEATS_PER_ROW != 0 {
        return Err(LayoutError::CapacityNotDivisible { capacity });
    }
    let rows = capacity / SEATS_PER_ROW;
    if rows > MAX_ROWS {
        return Err(LayoutError::TooManyRows { capacity, rows });
    }

    let tiers = row_tiers(rows);
    let mut seats = Vec::with_capacity(capacity as usize);
    for row_index in 0..rows {
        let row = row_letter(row_index);
        let seat_type = tiers[row_index as usize];
        for seat_number in 1..=SEATS_PER_ROW {
            seats.push(Seat {
                id: i64::from(row_index * SEATS_PER_ROW + seat_number),
                seat_number,
                row,
                seat_type,
                price: seat_type.price(),
                available: true,
            });
        }
    }

    debug!(
        "Generated {} seats in {} rows for showtime {}",
        seats.len(),
        rows,
        showtime.id
    );
    Ok(seats)
}

// Буква ряда по индексу: 0 -> 'A'. Валидность индекса гарантирует MAX_ROWS.
fn row_letter(row_index: u32) -> char {
    char::from(b'A' + row_index as u8)
}

// Тариф каждого ряда: base рядов на тариф, первые rows % 3 тарифов
// получают по лишнему ряду.
fn row_tiers(rows: u32) -> Vec<SeatType> {
    let base = rows / 3;
    let remainder = rows % 3;
    let mut tiers = Vec::with_capacity(rows as usize);
    for (i, seat_type) in TIER_ORDER.iter().enumerate() {
        let block = base + u32::from((i as u32) < remainder);
        for _ in 0..block {
            tiers.push(*seat_type);
        }
    }
    tiers
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    use super::*;
    use crate::test_util::showtime;

    #[test]
    fn capacity_50_gives_five_rows_with_2_2_1_split() {
        let seats = generate_seats(&showtime(50)).unwrap();
        assert_eq!(seats.len(), 50);

        let row_types: BTreeMap<char, SeatType> = seats
            .iter()
            .map(|seat| (seat.row, seat.seat_type))
            .collect();
        assert_eq!(
            row_types,
            BTreeMap::from([
                ('A', SeatType::Standard),
                ('B', SeatType::Standard),
                ('C', SeatType::Premium),
                ('D', SeatType::Premium),
                ('E', SeatType::Vip),
            ])
        );
    }

    #[test]
    fn seat_ids_are_contiguous_and_derived_from_row_and_number() {
        let seats = generate_seats(&showtime(50)).unwrap();
        let ids: Vec<i64> = seats.iter().map(|seat| seat.id).collect();
        assert_eq!(ids, (1..=50).collect::<Vec<i64>>());

        // B3: индекс ряда 1, номер 3.
        let b3 = seats.iter().find(|seat| seat.label() == "B3").unwrap();
        assert_eq!(b3.id, 13);
    }

    #[test]
    fn prices_follow_the_tier_of_the_row() {
        let seats = generate_seats(&showtime(50)).unwrap();
        let price_of = |label: &str| {
            seats
                .iter()
                .find(|seat| seat.label() == label)
                .unwrap()
                .price
        };
        assert_eq!(price_of("A1"), 9.99);
        assert_eq!(price_of("D10"), 12.99);
        assert_eq!(price_of("E7"), 16.99);
    }

    #[test]
    fn single_row_room_is_all_standard() {
        let seats = generate_seats(&showtime(10)).unwrap();
        assert!(seats.iter().all(|seat| seat.seat_type == SeatType::Standard));
    }

    #[test]
    fn two_rows_split_standard_then_premium() {
        let seats = generate_seats(&showtime(20)).unwrap();
        assert!(seats
            .iter()
            .filter(|seat| seat.row == 'A')
            .all(|seat| seat.seat_type == SeatType::Standard));
        assert!(seats
            .iter()
            .filter(|seat| seat.row == 'B')
            .all(|seat| seat.seat_type == SeatType::Premium));
    }

    #[test]
    fn indivisible_capacity_is_a_configuration_error() {
        assert_eq!(
            generate_seats(&showtime(55)),
            Err(LayoutError::CapacityNotDivisible { capacity: 55 })
        );
        assert_eq!(
            generate_seats(&showtime(0)),
            Err(LayoutError::CapacityNotDivisible { capacity: 0 })
        );
    }

    #[test]
    fn more_than_26_rows_is_rejected() {
        assert_eq!(
            generate_seats(&showtime(270)),
            Err(LayoutError::TooManyRows {
                capacity: 270,
                rows: 27
            })
        );
        // Ровно 26 рядов - еще допустимо.
        assert!(generate_seats(&showtime(260)).is_ok());
    }

    proptest! {
        #[test]
        fn layout_invariants_hold_for_any_valid_capacity(rows in 1u32..=26) {
            let seats = generate_seats(&showtime(rows * 10)).unwrap();

            // Всего мест ровно capacity, id уникальны и непрерывны.
            prop_assert_eq!(seats.len() as u32, rows * 10);
            let ids: Vec<i64> = seats.iter().map(|seat| seat.id).collect();
            prop_assert_eq!(ids, (1..=i64::from(rows * 10)).collect::<Vec<i64>>());

            // Каждый ряд однороден по тарифу.
            let mut row_types: BTreeMap<char, Vec<SeatType>> = BTreeMap::new();
            for seat in &seats {
                row_types.entry(seat.row).or_default().push(seat.seat_type);
            }
            prop_assert_eq!(row_types.len() as u32, rows);
            for types in row_types.values() {
                prop_assert!(types.iter().all(|t| *t == types[0]));
            }

            // Блоки тарифов непрерывны, в порядке standard/premium/vip,
            // и отличаются по размеру не больше чем на один ряд.
            let tier_rows: Vec<SeatType> = row_types.values().map(|types| types[0]).collect();
            let mut sorted = tier_rows.clone();
            sorted.sort_by_key(|t| match t {
                SeatType::Standard => 0,
                SeatType::Premium => 1,
                SeatType::Vip => 2,
            });
            prop_assert_eq!(&tier_rows, &sorted);

            let base = rows / 3;
            let remainder = rows % 3;
            for (i, tier) in TIER_ORDER.iter().enumerate() {
                let count = tier_rows.iter().filter(|t| *t == tier).count() as u32;
                let expected = base + u32::from((i as u32) < remainder);
                prop_assert_eq!(count, expected);
            }
        }
    }
}
