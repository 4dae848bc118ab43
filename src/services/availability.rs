use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;

use crate::error::{AppError, AppResult};
use crate::models::{SeatId, SeatState, ShowId};
use crate::store::BookingStore;

/// Read path over per-show seat state. The booking engine is the only
/// writer; reads here overlay the expiry rule so a lapsed hold shows up as
/// free before the sweep physically releases it, while a live hold never
/// does.
pub struct AvailabilityIndex {
    store: Arc<dyn BookingStore>,
}

impl AvailabilityIndex {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// Ids of all currently bookable seats of a show, in stable order.
    pub async fn available_seats(&self, show_id: ShowId) -> AppResult<BTreeSet<SeatId>> {
        let states = self.store.seat_states(show_id).await?;
        let now = Utc::now();
        Ok(states
            .into_iter()
            .filter(|(_, state)| state.is_available(now))
            .map(|(seat_id, _)| seat_id)
            .collect())
    }

    pub async fn seat_status(&self, show_id: ShowId, seat_id: SeatId) -> AppResult<SeatState> {
        match self.store.seat_state(show_id, seat_id).await? {
            Some(state) => Ok(state.normalized(Utc::now())),
            None => Err(AppError::NotFound {
                resource: "seat",
                id: seat_id,
            }),
        }
    }

    /// Whether the show still has bookable seats ("not booked out").
    pub async fn has_free_seats(&self, show_id: ShowId) -> AppResult<bool> {
        let states = self.store.seat_states(show_id).await?;
        let now = Utc::now();
        Ok(states.iter().any(|(_, state)| state.is_available(now)))
    }
}
