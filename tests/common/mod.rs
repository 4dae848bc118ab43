// Not every test binary touches every fixture field.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};

use cinema_booking::models::{SeatId, SeatKindId, Show};
use cinema_booking::{AppState, Config};

pub struct TestCinema {
    pub state: Arc<AppState>,
    pub show: Show,
    /// Standard seats in layout order (labels S1..S5).
    pub seats: Vec<SeatId>,
    pub vip_seat: SeatId,
    pub standard_kind: SeatKindId,
    pub vip_kind: SeatKindId,
}

/// One film, one room with five standard seats and one vip seat (50%
/// premium), one show two hours from now at a base price of 100.
pub async fn setup() -> TestCinema {
    let state = AppState::new(Config::from_env());

    let standard = state.catalog.add_seat_kind("standard");
    let vip = state.catalog.add_seat_kind("vip");
    state
        .catalog
        .set_seat_kind_premium(vip.id, 50)
        .expect("vip premium");

    let film = state.catalog.add_film("Arrival", 116).expect("film");

    let mut layout: Vec<(String, SeatKindId)> = (1..=5)
        .map(|n| (format!("S{n}"), standard.id))
        .collect();
    layout.push(("V1".to_string(), vip.id));
    let room = state
        .catalog
        .add_show_room("Screen 1", &layout)
        .expect("room");

    let show = state
        .scheduler
        .create_show(film.id, room.id, Utc::now() + Duration::hours(2), 100)
        .await
        .expect("show");

    let seats = room.seat_ids[..5].to_vec();
    let vip_seat = room.seat_ids[5];

    TestCinema {
        state,
        show,
        seats,
        vip_seat,
        standard_kind: standard.id,
        vip_kind: vip.id,
    }
}
