use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SeatId, ShowRoomId};

/// A show room and its fixed seat layout. The layout is configured once
/// per room, not per show; `seat_ids` keeps the seats in layout order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowRoom {
    pub id: ShowRoomId,
    pub name: String,
    pub seat_ids: Vec<SeatId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
