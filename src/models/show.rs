use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Amount, FilmId, ShowId, ShowRoomId};

/// One scheduled screening: a film in a room over [start, end).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Show {
    pub id: ShowId,
    pub film_id: FilmId,
    pub show_room_id: ShowRoomId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Base price per seat in minor currency units, before seat-kind premium.
    pub per_seat_price: Amount,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Show {
    /// Half-open interval overlap: touching endpoints do not conflict.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end && self.start < end
    }
}
