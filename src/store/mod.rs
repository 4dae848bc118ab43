//! Seat and booking state behind a transactional interface.
//!
//! Seat statuses are the only shared mutable resource in the engine; this
//! trait is the serialization point for them. Every method is one atomic
//! transition: it either applies completely or not at all, and transitions
//! of a single seat are linearizable across callers.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{Booking, BookingId, BookingStatus, SeatId, SeatState, ShowId};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("show {0} has no seat state")]
    UnknownShow(ShowId),

    #[error("booking {0} not found")]
    UnknownBooking(BookingId),

    #[error("seats not free for show {show_id}: {conflicting:?}")]
    SeatsUnavailable {
        show_id: ShowId,
        conflicting: Vec<SeatId>,
    },

    #[error("hold expired for booking {0}")]
    HoldExpired(BookingId),

    #[error("booking {id} is already {status}")]
    BookingFinal { id: BookingId, status: BookingStatus },
}

/// Counters from one expiry sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    pub holds_released: u64,
    pub bookings_cancelled: u64,
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Registers a show's seat set, all seats starting out free.
    async fn init_show(&self, show_id: ShowId, seat_ids: &[SeatId]) -> StoreResult<()>;

    /// Drops a show's seat state and cancels every booking that still
    /// references it. Returns the ids of the cancelled bookings.
    async fn drop_show(&self, show_id: ShowId, now: DateTime<Utc>) -> StoreResult<Vec<BookingId>>;

    async fn seat_states(&self, show_id: ShowId) -> StoreResult<Vec<(SeatId, SeatState)>>;

    /// `Ok(None)` when the show exists but the seat is not part of it.
    async fn seat_state(&self, show_id: ShowId, seat_id: SeatId)
        -> StoreResult<Option<SeatState>>;

    /// All-or-nothing reservation: transitions every requested seat
    /// FREE -> HELD and records the pending booking, or fails listing
    /// exactly the seats that were not free. Expired holds count as free.
    async fn create_booking(
        &self,
        show_id: ShowId,
        seat_ids: &[SeatId],
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> StoreResult<Booking>;

    /// HELD -> BOOKED for every seat of a pending booking. If any hold has
    /// lapsed the booking is cancelled, its remaining holds are released and
    /// `HoldExpired` is returned.
    async fn confirm_booking(&self, booking_id: BookingId, now: DateTime<Utc>)
        -> StoreResult<Booking>;

    /// Releases a booking's seats (held or booked) and marks it cancelled.
    /// A second cancel fails with `BookingFinal` and releases nothing.
    async fn cancel_booking(&self, booking_id: BookingId, now: DateTime<Utc>)
        -> StoreResult<Booking>;

    async fn booking(&self, booking_id: BookingId) -> StoreResult<Booking>;

    /// Releases every hold past its expiry and cancels the owning pending
    /// bookings. Safe to run concurrently with user operations.
    async fn release_expired(&self, now: DateTime<Utc>) -> StoreResult<SweepOutcome>;
}
