use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{Booking, BookingId, Seat, SeatId, ShowId};
use crate::services::catalog::Catalog;
use crate::services::scheduler::ShowScheduler;
use crate::store::{BookingStore, SweepOutcome};

/// The booking engine: converts a set of requested seats for one show into
/// a pending booking under a time-bounded hold, then finalizes or releases
/// it. All seat-state transitions go through the store's atomic operations;
/// this layer owns validation, defaults and error mapping.
pub struct BookingEngine {
    catalog: Arc<Catalog>,
    scheduler: Arc<ShowScheduler>,
    store: Arc<dyn BookingStore>,
    default_hold_seconds: u64,
}

impl BookingEngine {
    pub fn new(
        catalog: Arc<Catalog>,
        scheduler: Arc<ShowScheduler>,
        store: Arc<dyn BookingStore>,
        default_hold_seconds: u64,
    ) -> Self {
        Self {
            catalog,
            scheduler,
            store,
            default_hold_seconds,
        }
    }

    /// Holds all requested seats or none of them. Concurrent requests
    /// racing for a seat: exactly one observes it free; the loser gets
    /// `SeatsUnavailable` naming the contested seats.
    pub async fn start_booking(
        &self,
        show_id: ShowId,
        seat_ids: &[SeatId],
        hold_seconds: Option<u64>,
    ) -> AppResult<Booking> {
        if seat_ids.is_empty() {
            return Err(AppError::InvalidRequest(
                "a booking needs at least one seat".to_string(),
            ));
        }

        let show = self.scheduler.show(show_id)?;
        let room = self.catalog.show_room(show.show_room_id)?;
        let layout: HashSet<SeatId> = room.seat_ids.iter().copied().collect();
        let foreign: Vec<SeatId> = seat_ids
            .iter()
            .copied()
            .filter(|id| !layout.contains(id))
            .collect();
        if !foreign.is_empty() {
            return Err(AppError::InvalidRequest(format!(
                "seats {foreign:?} are not in room {} of show {show_id}",
                show.show_room_id
            )));
        }

        // Dedupe while keeping request order.
        let mut seen = HashSet::new();
        let requested: Vec<SeatId> = seat_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        let now = Utc::now();
        let hold = hold_seconds.unwrap_or(self.default_hold_seconds);
        let expires_at = now + Duration::seconds(hold as i64);

        let booking = self
            .store
            .create_booking(show_id, &requested, expires_at, now)
            .await?;
        info!(
            booking_id = booking.id,
            show_id,
            seats = requested.len(),
            "seats held until {expires_at}"
        );
        Ok(booking)
    }

    /// Finalizes a pending booking. A lapsed hold is not left dangling: the
    /// booking is cancelled, its seats freed, and `Expired` returned.
    pub async fn confirm_booking(&self, booking_id: BookingId) -> AppResult<Booking> {
        let booking = self.store.confirm_booking(booking_id, Utc::now()).await?;
        info!(booking_id, show_id = booking.show_id, "booking confirmed");
        Ok(booking)
    }

    /// Releases a booking's seats (held or already confirmed) back to free.
    /// Cancelling twice fails with `AlreadyFinal` and releases nothing.
    pub async fn cancel_booking(&self, booking_id: BookingId) -> AppResult<Booking> {
        let booking = self.store.cancel_booking(booking_id, Utc::now()).await?;
        info!(
            booking_id,
            show_id = booking.show_id,
            seats = booking.seat_ids.len(),
            "booking cancelled, seats released"
        );
        Ok(booking)
    }

    pub async fn booking(&self, booking_id: BookingId) -> AppResult<Booking> {
        Ok(self.store.booking(booking_id).await?)
    }

    /// The booked seats with their labels, for the ticket.
    pub async fn booking_seats(&self, booking_id: BookingId) -> AppResult<Vec<Seat>> {
        let booking = self.store.booking(booking_id).await?;
        booking
            .seat_ids
            .iter()
            .map(|&seat_id| self.catalog.seat(seat_id))
            .collect()
    }

    /// Maintenance sweep: releases every hold past its expiry and cancels
    /// the owning pending bookings. Safe alongside user operations; each
    /// release is an atomic free-if-still-held-and-expired transition.
    pub async fn expire_stale_holds(&self, now: DateTime<Utc>) -> AppResult<SweepOutcome> {
        let outcome = self.store.release_expired(now).await?;
        if outcome.holds_released > 0 {
            info!(
                holds = outcome.holds_released,
                bookings = outcome.bookings_cancelled,
                "released stale holds"
            );
        }
        Ok(outcome)
    }
}
