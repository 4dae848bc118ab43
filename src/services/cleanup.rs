use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use crate::AppState;

/// Background sweep over stale seat holds. The engine already treats
/// expired holds as free on reads; this service physically releases them
/// and cancels the abandoned bookings so they do not pile up.
pub struct CleanupService {
    state: Arc<AppState>,
}

impl CleanupService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn run_sweep(&self) -> CleanupStats {
        match self.state.booking.expire_stale_holds(Utc::now()).await {
            Ok(outcome) => {
                let stats = CleanupStats {
                    holds_released: outcome.holds_released,
                    bookings_cancelled: outcome.bookings_cancelled,
                };
                if stats.total_items() > 0 {
                    info!(
                        "🧹 Sweep released {} holds, cancelled {} bookings",
                        stats.holds_released, stats.bookings_cancelled
                    );
                }
                stats
            }
            Err(e) => {
                error!("hold sweep failed: {e}");
                CleanupStats::default()
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct CleanupStats {
    pub holds_released: u64,
    pub bookings_cancelled: u64,
}

impl CleanupStats {
    pub fn total_items(&self) -> u64 {
        self.holds_released + self.bookings_cancelled
    }
}
