use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{BookingId, BookingStatus, SeatId, ShowId, ShowRoomId};
use crate::store::StoreError;

pub type AppResult<T> = Result<T, AppError>;

/// Error taxonomy of the booking engine. Every failure names the resource
/// that caused it so callers can react (pick other seats, retry, etc.).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    #[error("room {room_id} already runs show {existing_show_id} from {start} to {end}")]
    ScheduleConflict {
        room_id: ShowRoomId,
        existing_show_id: ShowId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("seats not available for show {show_id}: {conflicting:?}")]
    SeatsUnavailable {
        show_id: ShowId,
        conflicting: Vec<SeatId>,
    },

    #[error("hold for booking {booking_id} has expired")]
    Expired { booking_id: BookingId },

    #[error("booking {booking_id} is already {status}")]
    AlreadyFinal {
        booking_id: BookingId,
        status: BookingStatus,
    },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownShow(id) => AppError::NotFound {
                resource: "show",
                id,
            },
            StoreError::UnknownBooking(id) => AppError::NotFound {
                resource: "booking",
                id,
            },
            StoreError::SeatsUnavailable {
                show_id,
                conflicting,
            } => AppError::SeatsUnavailable {
                show_id,
                conflicting,
            },
            StoreError::HoldExpired(booking_id) => AppError::Expired { booking_id },
            StoreError::BookingFinal { id, status } => AppError::AlreadyFinal {
                booking_id: id,
                status,
            },
        }
    }
}
