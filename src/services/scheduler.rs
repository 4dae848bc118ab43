use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::{Mutex, RwLock};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{Amount, FilmId, Show, ShowId, ShowRoomId};
use crate::services::catalog::Catalog;
use crate::store::BookingStore;

/// Schedules shows and guards the one scheduling invariant: no two shows
/// may overlap in time within the same room. The conflict check and the
/// insert run under a per-room lock so concurrent `create_show` calls for
/// one room cannot both pass the check.
pub struct ShowScheduler {
    catalog: Arc<Catalog>,
    store: Arc<dyn BookingStore>,
    shows: RwLock<HashMap<ShowId, Show>>,
    room_locks: Mutex<HashMap<ShowRoomId, Arc<Mutex<()>>>>,
    next_id: AtomicI64,
}

impl ShowScheduler {
    pub fn new(catalog: Arc<Catalog>, store: Arc<dyn BookingStore>) -> Self {
        Self {
            catalog,
            store,
            shows: RwLock::new(HashMap::new()),
            room_locks: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn room_lock(&self, room_id: ShowRoomId) -> Arc<Mutex<()>> {
        self.room_locks
            .lock()
            .entry(room_id)
            .or_default()
            .clone()
    }

    pub async fn create_show(
        &self,
        film_id: FilmId,
        room_id: ShowRoomId,
        start: DateTime<Utc>,
        per_seat_price: Amount,
    ) -> AppResult<Show> {
        if per_seat_price < 0 {
            return Err(AppError::InvalidRequest(format!(
                "per-seat price must not be negative, got {per_seat_price}"
            )));
        }
        // Both references are mandatory; a show is a film in a room.
        let film = self.catalog.film(film_id)?;
        let room = self.catalog.show_room(room_id)?;
        let end = start + Duration::minutes(film.duration_minutes);

        let show = {
            let lock = self.room_lock(room_id);
            let _room_guard = lock.lock();

            let mut shows = self.shows.write();
            if let Some(existing) = shows
                .values()
                .find(|s| s.show_room_id == room_id && s.overlaps(start, end))
            {
                return Err(AppError::ScheduleConflict {
                    room_id,
                    existing_show_id: existing.id,
                    start: existing.start,
                    end: existing.end,
                });
            }

            let now = Utc::now();
            let show = Show {
                id: self.next_id.fetch_add(1, Ordering::Relaxed),
                film_id,
                show_room_id: room_id,
                start,
                end,
                per_seat_price,
                created_at: now,
                updated_at: now,
            };
            shows.insert(show.id, show.clone());
            show
        };

        // The id has not been handed out yet, so no booking can race this.
        self.store.init_show(show.id, &room.seat_ids).await?;
        info!(
            show_id = show.id,
            film_id, room_id, "show scheduled from {} to {}", show.start, show.end
        );
        Ok(show)
    }

    pub fn show(&self, show_id: ShowId) -> AppResult<Show> {
        self.shows
            .read()
            .get(&show_id)
            .cloned()
            .ok_or(AppError::NotFound {
                resource: "show",
                id: show_id,
            })
    }

    /// Shows ordered by start time, optionally narrowed to one film and/or
    /// a time range (range overlap is half-open, like show intervals).
    pub fn list_shows(
        &self,
        film_id: Option<FilmId>,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Vec<Show> {
        let shows = self.shows.read();
        let mut result: Vec<Show> = shows
            .values()
            .filter(|s| film_id.map_or(true, |f| s.film_id == f))
            .filter(|s| range.map_or(true, |(from, to)| s.overlaps(from, to)))
            .cloned()
            .collect();
        result.sort_by_key(|s| s.start);
        result
    }

    /// Deletes a film and cascades: dependent shows are removed and their
    /// bookings cancelled, mirroring the schema's on-delete-cascade rule.
    pub async fn delete_film(&self, film_id: FilmId) -> AppResult<Vec<ShowId>> {
        self.catalog.remove_film(film_id)?;
        let removed = self.remove_shows_where(|s| s.film_id == film_id);
        self.drop_show_state(&removed).await;
        info!(film_id, shows = removed.len(), "film deleted with cascade");
        Ok(removed)
    }

    /// Deletes a show room and cascades like `delete_film`.
    pub async fn delete_show_room(&self, room_id: ShowRoomId) -> AppResult<Vec<ShowId>> {
        self.catalog.remove_show_room(room_id)?;
        let removed = self.remove_shows_where(|s| s.show_room_id == room_id);
        self.drop_show_state(&removed).await;
        info!(room_id, shows = removed.len(), "show room deleted with cascade");
        Ok(removed)
    }

    fn remove_shows_where(&self, pred: impl Fn(&Show) -> bool) -> Vec<ShowId> {
        let mut shows = self.shows.write();
        let ids: Vec<ShowId> = shows
            .values()
            .filter(|&s| pred(s))
            .map(|s| s.id)
            .collect();
        for id in &ids {
            shows.remove(id);
        }
        ids
    }

    async fn drop_show_state(&self, show_ids: &[ShowId]) {
        let now = Utc::now();
        for &show_id in show_ids {
            match self.store.drop_show(show_id, now).await {
                Ok(cancelled) if !cancelled.is_empty() => {
                    info!(show_id, bookings = cancelled.len(), "cancelled bookings of removed show");
                }
                Ok(_) => {}
                Err(err) => {
                    // Seat state already gone; nothing left to release.
                    tracing::warn!(show_id, "no seat state to drop: {err}");
                }
            }
        }
    }
}
