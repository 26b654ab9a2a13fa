pub mod movie;
pub mod seat;
pub mod showtime;
pub mod ticket;
pub mod user;

pub use movie::Movie;
pub use seat::{Seat, SeatType};
pub use showtime::{Room, Showtime};
pub use ticket::{Ticket, TicketPurchase};
pub use user::{Credentials, Registration, User};
