pub mod booking;
pub mod cinema;
pub mod film;
pub mod room;
pub mod seat;
pub mod show;

pub use booking::{Booking, BookingStatus};
pub use cinema::Cinema;
pub use film::Film;
pub use room::ShowRoom;
pub use seat::{Seat, SeatKind, SeatKindPremium, SeatState};
pub use show::Show;

// Identifiers are auto-incrementing integers, one sequence per store.
pub type FilmId = i64;
pub type ShowRoomId = i64;
pub type SeatId = i64;
pub type SeatKindId = i64;
pub type ShowId = i64;
pub type BookingId = i64;

/// Money in minor currency units (e.g. cents).
pub type Amount = i64;
