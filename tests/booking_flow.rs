mod common;

use chrono::{Duration, Utc};
use futures::future::join_all;

use cinema_booking::models::{BookingStatus, SeatState};
use cinema_booking::AppError;

#[tokio::test]
async fn disjoint_seat_sets_book_concurrently() {
    let c = common::setup().await;

    let (first, second) = tokio::join!(
        c.state.booking.start_booking(c.show.id, &c.seats[0..2], None),
        c.state.booking.start_booking(c.show.id, &c.seats[2..4], None),
    );

    assert!(first.is_ok(), "first booking failed: {first:?}");
    assert!(second.is_ok(), "second booking failed: {second:?}");
}

#[tokio::test]
async fn contested_seat_goes_to_exactly_one_booker() {
    let c = common::setup().await;
    let contested = c.seats[0];

    let mut handles = Vec::new();
    for _ in 0..4 {
        let state = c.state.clone();
        let show_id = c.show.id;
        handles.push(tokio::spawn(async move {
            state.booking.start_booking(show_id, &[contested], None).await
        }));
    }
    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one racer may hold the seat");
    for result in results {
        if let Err(err) = result {
            match err {
                AppError::SeatsUnavailable { conflicting, .. } => {
                    assert!(conflicting.contains(&contested));
                }
                other => panic!("expected SeatsUnavailable, got {other}"),
            }
        }
    }
}

#[tokio::test]
async fn held_seats_are_not_available() {
    let c = common::setup().await;

    let booking = c
        .state
        .booking
        .start_booking(c.show.id, &c.seats[0..2], None)
        .await
        .unwrap();

    let free = c.state.availability.available_seats(c.show.id).await.unwrap();
    assert!(!free.contains(&c.seats[0]));
    assert!(!free.contains(&c.seats[1]));
    assert!(free.contains(&c.seats[2]));

    let status = c
        .state
        .availability
        .seat_status(c.show.id, c.seats[0])
        .await
        .unwrap();
    assert!(matches!(status, SeatState::Held { booking_id, .. } if booking_id == booking.id));
}

#[tokio::test]
async fn cancel_returns_seats_and_allows_rebooking() {
    let c = common::setup().await;

    let booking = c
        .state
        .booking
        .start_booking(c.show.id, &c.seats[0..3], None)
        .await
        .unwrap();
    let cancelled = c.state.booking.cancel_booking(booking.id).await.unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    let free = c.state.availability.available_seats(c.show.id).await.unwrap();
    for seat in &c.seats[0..3] {
        assert!(free.contains(seat));
    }

    c.state
        .booking
        .start_booking(c.show.id, &c.seats[0..3], None)
        .await
        .expect("seats must be bookable again after cancel");
}

#[tokio::test]
async fn confirm_finalizes_booking_and_seats() {
    let c = common::setup().await;

    let booking = c
        .state
        .booking
        .start_booking(c.show.id, &[c.seats[0]], None)
        .await
        .unwrap();
    let confirmed = c.state.booking.confirm_booking(booking.id).await.unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);

    let status = c
        .state
        .availability
        .seat_status(c.show.id, c.seats[0])
        .await
        .unwrap();
    assert!(matches!(status, SeatState::Booked { booking_id } if booking_id == booking.id));

    // A booked seat is a conflict for the next request.
    let err = c
        .state
        .booking
        .start_booking(c.show.id, &[c.seats[0]], None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SeatsUnavailable { .. }));
}

#[tokio::test]
async fn confirm_after_expiry_cancels_booking() {
    let c = common::setup().await;

    // Zero-second hold: expired the moment it is taken.
    let booking = c
        .state
        .booking
        .start_booking(c.show.id, &c.seats[0..2], Some(0))
        .await
        .unwrap();

    let err = c.state.booking.confirm_booking(booking.id).await.unwrap_err();
    assert!(matches!(err, AppError::Expired { booking_id } if booking_id == booking.id));

    let after = c.state.booking.booking(booking.id).await.unwrap();
    assert_eq!(after.status, BookingStatus::Cancelled);

    let free = c.state.availability.available_seats(c.show.id).await.unwrap();
    assert!(free.contains(&c.seats[0]));
    assert!(free.contains(&c.seats[1]));
}

#[tokio::test]
async fn expired_hold_reads_as_free_before_sweep() {
    let c = common::setup().await;

    c.state
        .booking
        .start_booking(c.show.id, &[c.seats[0]], Some(0))
        .await
        .unwrap();

    // No sweep has run, but the lapsed hold must not block reads or takers.
    let free = c.state.availability.available_seats(c.show.id).await.unwrap();
    assert!(free.contains(&c.seats[0]));
    let status = c
        .state
        .availability
        .seat_status(c.show.id, c.seats[0])
        .await
        .unwrap();
    assert_eq!(status, SeatState::Free);

    c.state
        .booking
        .start_booking(c.show.id, &[c.seats[0]], None)
        .await
        .expect("expired hold must be re-takeable");
}

#[tokio::test]
async fn sweep_releases_stale_holds_and_cancels_owner() {
    let c = common::setup().await;

    let stale = c
        .state
        .booking
        .start_booking(c.show.id, &c.seats[0..2], Some(0))
        .await
        .unwrap();
    let live = c
        .state
        .booking
        .start_booking(c.show.id, &[c.seats[2]], Some(3600))
        .await
        .unwrap();

    let outcome = c
        .state
        .booking
        .expire_stale_holds(Utc::now())
        .await
        .unwrap();
    assert_eq!(outcome.holds_released, 2);
    assert_eq!(outcome.bookings_cancelled, 1);

    assert_eq!(
        c.state.booking.booking(stale.id).await.unwrap().status,
        BookingStatus::Cancelled
    );
    // The live hold is untouched.
    assert_eq!(
        c.state.booking.booking(live.id).await.unwrap().status,
        BookingStatus::Pending
    );
}

#[tokio::test]
async fn second_cancel_is_already_final_and_releases_nothing() {
    let c = common::setup().await;

    let first = c
        .state
        .booking
        .start_booking(c.show.id, &[c.seats[0]], None)
        .await
        .unwrap();
    c.state.booking.cancel_booking(first.id).await.unwrap();

    // Someone else takes the seat, then the stale cancel is retried.
    let second = c
        .state
        .booking
        .start_booking(c.show.id, &[c.seats[0]], None)
        .await
        .unwrap();
    let err = c.state.booking.cancel_booking(first.id).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::AlreadyFinal {
            status: BookingStatus::Cancelled,
            ..
        }
    ));

    // The retried cancel must not have freed the new owner's hold.
    let status = c
        .state
        .availability
        .seat_status(c.show.id, c.seats[0])
        .await
        .unwrap();
    assert!(matches!(status, SeatState::Held { booking_id, .. } if booking_id == second.id));
}

#[tokio::test]
async fn cancelling_a_confirmed_booking_frees_its_seats() {
    let c = common::setup().await;

    let booking = c
        .state
        .booking
        .start_booking(c.show.id, &c.seats[0..2], None)
        .await
        .unwrap();
    c.state.booking.confirm_booking(booking.id).await.unwrap();
    c.state.booking.cancel_booking(booking.id).await.unwrap();

    let free = c.state.availability.available_seats(c.show.id).await.unwrap();
    assert!(free.contains(&c.seats[0]));
    assert!(free.contains(&c.seats[1]));
}

#[tokio::test]
async fn invalid_requests_are_rejected() {
    let c = common::setup().await;

    let err = c
        .state
        .booking
        .start_booking(c.show.id, &[], None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidRequest(_)));

    let err = c
        .state
        .booking
        .start_booking(9999, &[c.seats[0]], None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { resource: "show", .. }));

    // A seat from another room is invalid for this show.
    let other_room = c
        .state
        .catalog
        .add_show_room("Screen 2", &[("X1".to_string(), c.standard_kind)])
        .unwrap();
    let err = c
        .state
        .booking
        .start_booking(c.show.id, &[other_room.seat_ids[0]], None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidRequest(_)));
}

#[tokio::test]
async fn show_is_booked_out_once_every_seat_is_taken() {
    let c = common::setup().await;
    assert!(c.state.availability.has_free_seats(c.show.id).await.unwrap());

    let mut all = c.seats.clone();
    all.push(c.vip_seat);
    c.state
        .booking
        .start_booking(c.show.id, &all, None)
        .await
        .unwrap();

    assert!(!c.state.availability.has_free_seats(c.show.id).await.unwrap());
}

#[tokio::test]
async fn ticket_lists_seat_labels() {
    let c = common::setup().await;

    let booking = c
        .state
        .booking
        .start_booking(c.show.id, &[c.seats[0], c.vip_seat], None)
        .await
        .unwrap();
    let seats = c.state.booking.booking_seats(booking.id).await.unwrap();
    let labels: Vec<&str> = seats.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(labels, vec!["S1", "V1"]);
}

#[tokio::test]
async fn pricing_uses_base_price_and_latest_premium() {
    let c = common::setup().await;

    // Base 100: standard stays at 100, vip (50%) comes to 150.
    assert_eq!(c.state.pricing.price_of(c.show.id, c.seats[0]).unwrap(), 100);
    assert_eq!(c.state.pricing.price_of(c.show.id, c.vip_seat).unwrap(), 150);

    // A newer premium record wins over the old one.
    c.state.catalog.set_seat_kind_premium(c.vip_kind, 25).unwrap();
    assert_eq!(c.state.pricing.price_of(c.show.id, c.vip_seat).unwrap(), 125);

    // Pricing a seat of another room against this show is invalid.
    let other_room = c
        .state
        .catalog
        .add_show_room("Screen 2", &[("X1".to_string(), c.standard_kind)])
        .unwrap();
    let err = c
        .state
        .pricing
        .price_of(c.show.id, other_room.seat_ids[0])
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidRequest(_)));
}

#[tokio::test]
async fn custom_hold_duration_is_respected() {
    let c = common::setup().await;

    let booking = c
        .state
        .booking
        .start_booking(c.show.id, &[c.seats[0]], Some(7200))
        .await
        .unwrap();
    let remaining = booking.hold_expires_at - Utc::now();
    assert!(remaining > Duration::seconds(7000));

    // Nothing to sweep: the hold is far from expiry.
    let outcome = c
        .state
        .booking
        .expire_stale_holds(Utc::now())
        .await
        .unwrap();
    assert_eq!(outcome.holds_released, 0);
}
