use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, SeatId, SeatKindId, ShowRoomId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    pub id: SeatId,
    pub show_room_id: ShowRoomId,
    pub seat_kind_id: SeatKindId,
    /// Printed label, e.g. "A12".
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatKind {
    pub id: SeatKindId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One entry in the append-only premium history of a seat kind.
/// The most recently recorded entry is the effective premium.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatKindPremium {
    pub id: i64,
    pub seat_kind_id: SeatKindId,
    pub premium_percentage: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-show status of a single seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatState {
    Free,
    Held {
        booking_id: BookingId,
        expires_at: DateTime<Utc>,
    },
    Booked {
        booking_id: BookingId,
    },
}

impl SeatState {
    /// A hold is expired once `now >= expires_at` (half-open, like show
    /// intervals). Expired holds count as available even before the sweep
    /// physically releases them.
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        match *self {
            SeatState::Free => true,
            SeatState::Held { expires_at, .. } => now >= expires_at,
            SeatState::Booked { .. } => false,
        }
    }

    /// Collapses an expired hold to `Free` for read paths.
    pub fn normalized(self, now: DateTime<Utc>) -> SeatState {
        match self {
            SeatState::Held { expires_at, .. } if now >= expires_at => SeatState::Free,
            other => other,
        }
    }
}
