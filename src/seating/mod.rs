pub mod availability;
pub mod layout;

pub use availability::resolve_availability;
pub use layout::{generate_seats, LayoutError, MAX_ROWS, SEATS_PER_ROW};
