use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};

use crate::models::{Booking, BookingId, BookingStatus, SeatId, SeatState, ShowId};

use super::{BookingStore, StoreError, StoreResult, SweepOutcome};

type SeatMap = HashMap<SeatId, SeatState>;

/// In-memory `BookingStore`. One mutex per show's seat map makes every
/// multi-seat operation a single serializing transaction over that show,
/// so holds are all-or-nothing and per-seat transitions are linearizable.
///
/// Lock order: seat map first, then `bookings`.
pub struct MemoryStore {
    seats: RwLock<HashMap<ShowId, Arc<Mutex<SeatMap>>>>,
    bookings: RwLock<HashMap<BookingId, Booking>>,
    next_booking_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            seats: RwLock::new(HashMap::new()),
            bookings: RwLock::new(HashMap::new()),
            next_booking_id: AtomicI64::new(1),
        }
    }

    fn show_seats(&self, show_id: ShowId) -> StoreResult<Arc<Mutex<SeatMap>>> {
        self.seats
            .read()
            .get(&show_id)
            .cloned()
            .ok_or(StoreError::UnknownShow(show_id))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn init_show(&self, show_id: ShowId, seat_ids: &[SeatId]) -> StoreResult<()> {
        let map: SeatMap = seat_ids.iter().map(|&id| (id, SeatState::Free)).collect();
        self.seats
            .write()
            .insert(show_id, Arc::new(Mutex::new(map)));
        Ok(())
    }

    async fn drop_show(&self, show_id: ShowId, now: DateTime<Utc>) -> StoreResult<Vec<BookingId>> {
        self.seats
            .write()
            .remove(&show_id)
            .ok_or(StoreError::UnknownShow(show_id))?;

        let mut bookings = self.bookings.write();
        let mut cancelled = Vec::new();
        for booking in bookings.values_mut() {
            if booking.show_id == show_id && booking.status != BookingStatus::Cancelled {
                booking.status = BookingStatus::Cancelled;
                booking.updated_at = now;
                cancelled.push(booking.id);
            }
        }
        Ok(cancelled)
    }

    async fn seat_states(&self, show_id: ShowId) -> StoreResult<Vec<(SeatId, SeatState)>> {
        let map = self.show_seats(show_id)?;
        let seats = map.lock();
        Ok(seats.iter().map(|(&id, &state)| (id, state)).collect())
    }

    async fn seat_state(
        &self,
        show_id: ShowId,
        seat_id: SeatId,
    ) -> StoreResult<Option<SeatState>> {
        let map = self.show_seats(show_id)?;
        let seats = map.lock();
        Ok(seats.get(&seat_id).copied())
    }

    async fn create_booking(
        &self,
        show_id: ShowId,
        seat_ids: &[SeatId],
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> StoreResult<Booking> {
        let map = self.show_seats(show_id)?;
        let mut seats = map.lock();

        let conflicting: Vec<SeatId> = seat_ids
            .iter()
            .copied()
            .filter(|id| {
                !seats
                    .get(id)
                    .map(|state| state.is_available(now))
                    .unwrap_or(false)
            })
            .collect();
        if !conflicting.is_empty() {
            return Err(StoreError::SeatsUnavailable {
                show_id,
                conflicting,
            });
        }

        let id = self.next_booking_id.fetch_add(1, Ordering::Relaxed);
        for &seat_id in seat_ids {
            seats.insert(
                seat_id,
                SeatState::Held {
                    booking_id: id,
                    expires_at,
                },
            );
        }

        let booking = Booking {
            id,
            show_id,
            status: BookingStatus::Pending,
            seat_ids: seat_ids.to_vec(),
            hold_expires_at: expires_at,
            created_at: now,
            updated_at: now,
        };
        self.bookings.write().insert(id, booking.clone());
        Ok(booking)
    }

    async fn confirm_booking(
        &self,
        booking_id: BookingId,
        now: DateTime<Utc>,
    ) -> StoreResult<Booking> {
        let show_id = {
            let bookings = self.bookings.read();
            let booking = bookings
                .get(&booking_id)
                .ok_or(StoreError::UnknownBooking(booking_id))?;
            if booking.is_final() {
                return Err(StoreError::BookingFinal {
                    id: booking_id,
                    status: booking.status,
                });
            }
            booking.show_id
        };

        let map = self.show_seats(show_id)?;
        let mut seats = map.lock();
        let mut bookings = self.bookings.write();
        let booking = bookings
            .get_mut(&booking_id)
            .ok_or(StoreError::UnknownBooking(booking_id))?;
        // Status may have changed between the lookup above and taking the
        // locks; re-check before mutating anything.
        if booking.is_final() {
            return Err(StoreError::BookingFinal {
                id: booking_id,
                status: booking.status,
            });
        }

        let lapsed = booking.seat_ids.iter().any(|seat_id| {
            !matches!(
                seats.get(seat_id),
                Some(SeatState::Held { booking_id: b, expires_at })
                    if *b == booking_id && now < *expires_at
            )
        });
        if lapsed {
            for seat_id in &booking.seat_ids {
                if let Some(state) = seats.get_mut(seat_id) {
                    if matches!(state, SeatState::Held { booking_id: b, .. } if *b == booking_id)
                    {
                        *state = SeatState::Free;
                    }
                }
            }
            booking.status = BookingStatus::Cancelled;
            booking.updated_at = now;
            return Err(StoreError::HoldExpired(booking_id));
        }

        for &seat_id in &booking.seat_ids {
            seats.insert(seat_id, SeatState::Booked { booking_id });
        }
        booking.status = BookingStatus::Confirmed;
        booking.updated_at = now;
        Ok(booking.clone())
    }

    async fn cancel_booking(
        &self,
        booking_id: BookingId,
        now: DateTime<Utc>,
    ) -> StoreResult<Booking> {
        let (show_id, status) = {
            let bookings = self.bookings.read();
            let booking = bookings
                .get(&booking_id)
                .ok_or(StoreError::UnknownBooking(booking_id))?;
            (booking.show_id, booking.status)
        };
        if status == BookingStatus::Cancelled {
            return Err(StoreError::BookingFinal {
                id: booking_id,
                status,
            });
        }

        let map = self.show_seats(show_id)?;
        let mut seats = map.lock();
        let mut bookings = self.bookings.write();
        let booking = bookings
            .get_mut(&booking_id)
            .ok_or(StoreError::UnknownBooking(booking_id))?;
        if booking.status == BookingStatus::Cancelled {
            return Err(StoreError::BookingFinal {
                id: booking_id,
                status: booking.status,
            });
        }

        for seat_id in &booking.seat_ids {
            if let Some(state) = seats.get_mut(seat_id) {
                let owned = matches!(
                    state,
                    SeatState::Held { booking_id: b, .. } | SeatState::Booked { booking_id: b }
                        if *b == booking_id
                );
                if owned {
                    *state = SeatState::Free;
                }
            }
        }
        booking.status = BookingStatus::Cancelled;
        booking.updated_at = now;
        Ok(booking.clone())
    }

    async fn booking(&self, booking_id: BookingId) -> StoreResult<Booking> {
        self.bookings
            .read()
            .get(&booking_id)
            .cloned()
            .ok_or(StoreError::UnknownBooking(booking_id))
    }

    async fn release_expired(&self, now: DateTime<Utc>) -> StoreResult<SweepOutcome> {
        let handles: Vec<Arc<Mutex<SeatMap>>> = self.seats.read().values().cloned().collect();

        let mut outcome = SweepOutcome::default();
        for map in handles {
            // Each show is swept as its own atomic transition.
            let mut seats = map.lock();
            let mut owners: HashSet<BookingId> = HashSet::new();
            for state in seats.values_mut() {
                if let SeatState::Held {
                    booking_id,
                    expires_at,
                } = *state
                {
                    if now >= expires_at {
                        *state = SeatState::Free;
                        outcome.holds_released += 1;
                        owners.insert(booking_id);
                    }
                }
            }
            if owners.is_empty() {
                continue;
            }
            let mut bookings = self.bookings.write();
            for owner in owners {
                if let Some(booking) = bookings.get_mut(&owner) {
                    if booking.status == BookingStatus::Pending {
                        booking.status = BookingStatus::Cancelled;
                        booking.updated_at = now;
                        outcome.bookings_cancelled += 1;
                    }
                }
            }
        }
        Ok(outcome)
    }
}
