pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

use std::sync::Arc;

pub use config::Config;
pub use error::{AppError, AppResult};

use services::availability::AvailabilityIndex;
use services::booking::BookingEngine;
use services::catalog::Catalog;
use services::pricing::PricingEngine;
use services::scheduler::ShowScheduler;
use store::{BookingStore, MemoryStore};

// Shared state wiring all the engine services together.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn BookingStore>,
    pub catalog: Arc<Catalog>,
    pub scheduler: Arc<ShowScheduler>,
    pub pricing: PricingEngine,
    pub availability: AvailabilityIndex,
    pub booking: BookingEngine,
}

impl AppState {
    /// Engine backed by the in-memory store.
    pub fn new(config: Config) -> Arc<Self> {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// Engine over an injected seat/booking store.
    pub fn with_store(config: Config, store: Arc<dyn BookingStore>) -> Arc<Self> {
        let catalog = Arc::new(Catalog::new(&config.cinema.name));
        let scheduler = Arc::new(ShowScheduler::new(catalog.clone(), store.clone()));
        let pricing = PricingEngine::new(catalog.clone(), scheduler.clone());
        let availability = AvailabilityIndex::new(store.clone());
        let booking = BookingEngine::new(
            catalog.clone(),
            scheduler.clone(),
            store.clone(),
            config.booking.default_hold_seconds,
        );
        Arc::new(Self {
            config,
            store,
            catalog,
            scheduler,
            pricing,
            availability,
            booking,
        })
    }
}
