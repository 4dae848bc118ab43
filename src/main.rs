use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinema_booking::config::Config;
use cinema_booking::models::SeatKindId;
use cinema_booking::services::cleanup::CleanupService;
use cinema_booking::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting booking engine for {}", config.cinema.name);

    let state = AppState::new(config);
    seed_demo_schedule(&state).await?;

    // --- Start background tasks ---

    // Task to release stale seat holds on the configured interval
    let cleanup = CleanupService::new(state.clone());
    let interval = Duration::from_secs(state.config.booking.sweep_interval_seconds);
    task::spawn(async move {
        loop {
            cleanup.run_sweep().await;
            tokio::time::sleep(interval).await;
        }
    });

    info!("Engine ready, press ctrl-c to stop");
    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    Ok(())
}

/// A small schedule so a fresh instance has something to serve.
async fn seed_demo_schedule(state: &Arc<AppState>) -> anyhow::Result<()> {
    let standard = state.catalog.add_seat_kind("standard");
    let vip = state.catalog.add_seat_kind("vip");
    state.catalog.set_seat_kind_premium(vip.id, 50)?;

    let film = state.catalog.add_film("Interstellar", 169)?;

    // Rows A-C, eight seats each; the back row is vip.
    let mut layout: Vec<(String, SeatKindId)> = Vec::new();
    for row in ["A", "B", "C"] {
        let kind = if row == "C" { vip.id } else { standard.id };
        for number in 1..=8 {
            layout.push((format!("{row}{number}"), kind));
        }
    }
    let room = state.catalog.add_show_room("Screen 1", &layout)?;

    let start = Utc::now() + chrono::Duration::hours(2);
    let show = state
        .scheduler
        .create_show(film.id, room.id, start, 1500)
        .await?;

    let free = state.availability.available_seats(show.id).await?;
    info!(
        show_id = show.id,
        free_seats = free.len(),
        "demo show scheduled"
    );
    Ok(())
}
