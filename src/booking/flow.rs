use thiserror::Error;
use tracing::{info, warn};

use crate::booking::selection::SeatSelection;
use crate::models::Seat;
use crate::session::{SessionError, SessionStore};

/// Шаги оформления покупки.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    SelectingShowtime,
    SelectingSeats,
    Confirming,
    Completed,
}

/// Куда отправить пользователя, когда шаг недостижим.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    Movies,
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("место {label} уже занято")]
    SeatUnavailable { label: String },
    #[error("не выбрано ни одного места")]
    EmptySelection,
    #[error("действие недоступно на шаге {step:?}")]
    WrongStep { step: Step },
    #[error("покупка уже отправлена и еще обрабатывается")]
    PurchaseInFlight,
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Контроллер бронирования: ведет пользователя по шагам
/// выбор сеанса -> выбор мест -> подтверждение -> завершение
/// и синхронизирует минимум состояния с локальным хранилищем.
pub struct BookingFlow {
    step: Step,
    showtime_id: Option<i64>,
    selection: SeatSelection,
    session: SessionStore,
    // Защита от повторной отправки, пока запрос покупки в полете.
    purchase_in_flight: bool,
    // Номер последней начатой загрузки карты мест; более ранние ответы
    // считаются устаревшими и отбрасываются.
    fetch_epoch: u64,
}

impl BookingFlow {
    pub fn new(session: SessionStore) -> Self {
        Self {
            step: Step::SelectingShowtime,
            showtime_id: None,
            selection: SeatSelection::new(),
            session,
            purchase_in_flight: false,
            fetch_epoch: 0,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn showtime_id(&self) -> Option<i64> {
        self.showtime_id
    }

    pub fn selection(&self) -> &SeatSelection {
        &self.selection
    }

    /// Выбор сеанса: переход к выбору мест, прежний выбор сбрасывается.
    pub fn choose_showtime(&mut self, showtime_id: i64) {
        info!("Showtime {} selected", showtime_id);
        self.showtime_id = Some(showtime_id);
        self.selection.clear();
        self.step = Step::SelectingSeats;
    }

    /// Отмечает начало загрузки карты мест и возвращает номер эпохи.
    pub fn begin_seat_fetch(&mut self) -> u64 {
        self.fetch_epoch += 1;
        self.fetch_epoch
    }

    /// Ответ с этой эпохой пришел после начала более новой загрузки?
    pub fn is_stale_fetch(&self, epoch: u64) -> bool {
        epoch != self.fetch_epoch
    }

    /// Переключает место. Занятое место выбрать нельзя; снять выбор
    /// с места, занятого после повторной загрузки, - можно.
    pub fn toggle_seat(&mut self, seat: &Seat) -> Result<(), BookingError> {
        if self.step != Step::SelectingSeats {
            return Err(BookingError::WrongStep { step: self.step });
        }
        if !seat.available && !self.selection.contains(seat.id) {
            return Err(BookingError::SeatUnavailable { label: seat.label() });
        }
        self.selection.toggle(seat.id);
        Ok(())
    }

    /// Переход к подтверждению. Выбор и сеанс сохраняются в хранилище,
    /// чтобы шаг подтверждения переживал перезапуск клиента.
    pub fn proceed_to_checkout(&mut self) -> Result<(), BookingError> {
        if self.step != Step::SelectingSeats {
            return Err(BookingError::WrongStep { step: self.step });
        }
        if self.selection.is_empty() {
            return Err(BookingError::EmptySelection);
        }
        let showtime_id = match self.showtime_id {
            Some(id) => id,
            None => return Err(BookingError::WrongStep { step: self.step }),
        };
        self.session
            .persist_checkout(showtime_id, self.selection.ids())?;
        self.step = Step::Confirming;
        Ok(())
    }

    /// Вход на шаг подтверждения "с нуля", после перезапуска клиента.
    /// Без сохраненного сеанса или с пустым выбором подтверждать нечего -
    /// пользователь уходит на список фильмов.
    pub fn resume_checkout(&mut self) -> Result<(), Redirect> {
        let (showtime_id, seat_ids) = match self.session.checkout() {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to read persisted session: {}", e);
                return Err(Redirect::Movies);
            }
        };
        match showtime_id {
            Some(id) if !seat_ids.is_empty() => {
                info!("Resuming checkout for showtime {}", id);
                self.showtime_id = Some(id);
                self.selection = SeatSelection::from_ids(seat_ids);
                self.step = Step::Confirming;
                Ok(())
            }
            _ => Err(Redirect::Movies),
        }
    }

    /// Возврат с подтверждения к карте мест; выбор сохраняется.
    pub fn back_to_seats(&mut self) -> Result<(), BookingError> {
        if self.step != Step::Confirming {
            return Err(BookingError::WrongStep { step: self.step });
        }
        self.step = Step::SelectingSeats;
        Ok(())
    }

    /// Защита от двойной отправки: пока запрос в полете, второй не начать.
    pub fn begin_purchase(&mut self) -> Result<(), BookingError> {
        if self.step != Step::Confirming {
            return Err(BookingError::WrongStep { step: self.step });
        }
        if self.purchase_in_flight {
            return Err(BookingError::PurchaseInFlight);
        }
        self.purchase_in_flight = true;
        Ok(())
    }

    /// Успешная покупка: контекст оформления стирается, поток завершен.
    pub fn complete_purchase(&mut self) -> Result<(), BookingError> {
        self.purchase_in_flight = false;
        self.session.clear_checkout()?;
        self.selection.clear();
        self.step = Step::Completed;
        info!("Booking flow completed");
        Ok(())
    }

    /// Неудачная покупка: места могли уйти другому покупателю, поэтому
    /// выбор стирается, а сеанс остается - пользователь возвращается к
    /// той же карте мест, и ее нужно загружать заново.
    pub fn fail_purchase(&mut self) -> Result<(), BookingError> {
        self.purchase_in_flight = false;
        self.session.clear_selection()?;
        self.selection.clear();
        self.step = Step::SelectingSeats;
        warn!(
            "Purchase failed, selection cleared, returning to seat map of showtime {:?}",
            self.showtime_id
        );
        Ok(())
    }

    /// Отмена оформления: полный сброс к выбору сеанса.
    pub fn abandon(&mut self) -> Result<(), BookingError> {
        self.purchase_in_flight = false;
        self.session.clear_checkout()?;
        self.selection.clear();
        self.showtime_id = None;
        self.step = Step::SelectingShowtime;
        Ok(())
    }
}
