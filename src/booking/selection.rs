use crate::models::Seat;

/// Упорядоченный набор мест, выбранных в рамках одного бронирования.
///
/// Идентификаторы всегда отсортированы по возрастанию, чтобы отображение
/// и сериализация были детерминированными.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeatSelection {
    ids: Vec<i64>,
}

impl SeatSelection {
    pub fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Восстановление из сохраненного списка; порядок и дубли нормализуются.
    pub fn from_ids(mut ids: Vec<i64>) -> Self {
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }

    /// Добавляет место, если его нет в наборе, иначе убирает.
    pub fn toggle(&mut self, seat_id: i64) {
        match self.ids.binary_search(&seat_id) {
            Ok(pos) => {
                self.ids.remove(pos);
            }
            Err(pos) => self.ids.insert(pos, seat_id),
        }
    }

    pub fn contains(&self, seat_id: i64) -> bool {
        self.ids.binary_search(&seat_id).is_ok()
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Выбранные места из схемы зала, в порядке возрастания id.
    /// Идентификаторы, которых в схеме нет, пропускаются.
    pub fn seats<'a>(&self, seats: &'a [Seat]) -> Vec<&'a Seat> {
        self.ids
            .iter()
            .filter_map(|id| seats.iter().find(|seat| seat.id == *id))
            .collect()
    }

    /// Итог по тарифам выбранных мест.
    pub fn total(&self, seats: &[Seat]) -> f64 {
        self.seats(seats).iter().map(|seat| seat.price).sum()
    }

    /// Метки вида "B3" для отображения.
    pub fn labels(&self, seats: &[Seat]) -> Vec<String> {
        self.seats(seats).iter().map(|seat| seat.label()).collect()
    }
}
