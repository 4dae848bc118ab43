use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{Amount, SeatId, ShowId};
use crate::services::catalog::Catalog;
use crate::services::scheduler::ShowScheduler;

/// Applies a seat-kind premium to a base price in minor currency units:
/// `base * (1 + pct/100)`, rounded half-up to the nearest minor unit.
/// Deterministic integer arithmetic; `base >= 0` and `pct >= -100` are
/// enforced where shows and premiums are created.
pub fn apply_premium(base: Amount, premium_percentage: i64) -> Amount {
    let scaled = base as i128 * (100 + premium_percentage) as i128;
    ((scaled + 50) / 100) as Amount
}

/// Stateless pricing over catalog and schedule lookups.
pub struct PricingEngine {
    catalog: Arc<Catalog>,
    scheduler: Arc<ShowScheduler>,
}

impl PricingEngine {
    pub fn new(catalog: Arc<Catalog>, scheduler: Arc<ShowScheduler>) -> Self {
        Self { catalog, scheduler }
    }

    /// Price of one seat for one show, with the seat kind's current premium.
    pub fn price_of(&self, show_id: ShowId, seat_id: SeatId) -> AppResult<Amount> {
        let show = self.scheduler.show(show_id)?;
        let seat = self.catalog.seat(seat_id)?;
        if seat.show_room_id != show.show_room_id {
            return Err(AppError::InvalidRequest(format!(
                "seat {seat_id} is not in room {} of show {show_id}",
                show.show_room_id
            )));
        }
        let premium = self.catalog.seat_kind_premium(seat.seat_kind_id)?;
        Ok(apply_premium(show.per_seat_price, premium))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn premium_examples() {
        assert_eq!(apply_premium(100, 50), 150);
        assert_eq!(apply_premium(100, 0), 100);
        assert_eq!(apply_premium(1500, 25), 1875);
    }

    #[test]
    fn rounds_half_up() {
        // 5 * 1.5 = 7.5 -> 8; 3 * 1.5 = 4.5 -> 5; 3 * 1.4 = 4.2 -> 4
        assert_eq!(apply_premium(5, 50), 8);
        assert_eq!(apply_premium(3, 50), 5);
        assert_eq!(apply_premium(3, 40), 4);
    }

    #[test]
    fn full_discount_prices_at_zero() {
        assert_eq!(apply_premium(999, -100), 0);
    }

    proptest! {
        #[test]
        fn zero_premium_is_identity(base in 0i64..1_000_000_000) {
            prop_assert_eq!(apply_premium(base, 0), base);
        }

        #[test]
        fn matches_reference_rounding(base in 0i64..1_000_000_000, pct in -100i64..1_000) {
            // Reference: exact rational base*(100+pct)/100, half-up.
            let num = base as i128 * (100 + pct) as i128;
            let (q, r) = (num / 100, num % 100);
            let expected = if r >= 50 { q + 1 } else { q };
            prop_assert_eq!(apply_premium(base, pct) as i128, expected);
        }

        #[test]
        fn monotonic_in_premium(base in 0i64..1_000_000, pct in -100i64..1_000) {
            prop_assert!(apply_premium(base, pct) <= apply_premium(base, pct + 1));
        }
    }
}
