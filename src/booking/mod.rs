pub mod flow;
pub mod purchase;
pub mod selection;

pub use flow::{BookingError, BookingFlow, Redirect, Step};
pub use purchase::PurchaseExecutor;
pub use selection::SeatSelection;
