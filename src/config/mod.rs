use serde::Deserialize;
use std::env;

// Top-level configuration container.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub cinema: CinemaConfig,
    pub booking: BookingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub rust_log: String,
}

// One cinema in scope; its name is configuration, not data entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CinemaConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    /// Hold duration applied when a booking request does not supply one.
    pub default_hold_seconds: u64,
    /// How often the background sweep releases stale holds.
    pub sweep_interval_seconds: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "cinema_booking=debug".to_string()),
            },
            cinema: CinemaConfig {
                name: env::var("CINEMA_NAME").unwrap_or_else(|_| "Main Street Cinema".to_string()),
            },
            booking: BookingConfig {
                default_hold_seconds: env::var("BOOKING_HOLD_SECONDS")
                    .unwrap_or_else(|_| "300".to_string())
                    .parse()
                    .expect("BOOKING_HOLD_SECONDS must be a valid number"),
                sweep_interval_seconds: env::var("HOLD_SWEEP_INTERVAL_SECONDS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()
                    .expect("HOLD_SWEEP_INTERVAL_SECONDS must be a valid number"),
            },
        }
    }
}
