use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use parking_lot::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::{
    Cinema, Film, FilmId, Seat, SeatId, SeatKind, SeatKindId, SeatKindPremium, ShowRoom,
    ShowRoomId,
};

/// Reference data for the single cinema: films, rooms with their fixed seat
/// layouts, seat kinds and the append-only premium history. Read-mostly;
/// writes happen through administrative operations.
pub struct Catalog {
    cinema: Cinema,
    films: RwLock<HashMap<FilmId, Film>>,
    rooms: RwLock<HashMap<ShowRoomId, ShowRoom>>,
    seats: RwLock<HashMap<SeatId, Seat>>,
    seat_kinds: RwLock<HashMap<SeatKindId, SeatKind>>,
    // Premiums are never overwritten; the newest entry per kind wins.
    premiums: RwLock<Vec<SeatKindPremium>>,
    next_id: AtomicI64,
}

impl Catalog {
    pub fn new(cinema_name: &str) -> Self {
        let now = Utc::now();
        Self {
            cinema: Cinema {
                id: 1,
                name: cinema_name.to_string(),
                created_at: now,
                updated_at: now,
            },
            films: RwLock::new(HashMap::new()),
            rooms: RwLock::new(HashMap::new()),
            seats: RwLock::new(HashMap::new()),
            seat_kinds: RwLock::new(HashMap::new()),
            premiums: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    pub fn cinema(&self) -> Cinema {
        self.cinema.clone()
    }

    // === Films ===

    pub fn add_film(&self, name: &str, duration_minutes: i64) -> AppResult<Film> {
        if duration_minutes <= 0 {
            return Err(AppError::InvalidRequest(format!(
                "film duration must be positive, got {duration_minutes}"
            )));
        }
        let now = Utc::now();
        let film = Film {
            id: self.next_id(),
            name: name.to_string(),
            duration_minutes,
            created_at: now,
            updated_at: now,
        };
        self.films.write().insert(film.id, film.clone());
        Ok(film)
    }

    pub fn film(&self, film_id: FilmId) -> AppResult<Film> {
        self.films
            .read()
            .get(&film_id)
            .cloned()
            .ok_or(AppError::NotFound {
                resource: "film",
                id: film_id,
            })
    }

    pub(crate) fn remove_film(&self, film_id: FilmId) -> AppResult<Film> {
        self.films
            .write()
            .remove(&film_id)
            .ok_or(AppError::NotFound {
                resource: "film",
                id: film_id,
            })
    }

    // === Seat kinds & premiums ===

    pub fn add_seat_kind(&self, title: &str) -> SeatKind {
        let now = Utc::now();
        let kind = SeatKind {
            id: self.next_id(),
            title: title.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.seat_kinds.write().insert(kind.id, kind.clone());
        kind
    }

    pub fn seat_kind(&self, kind_id: SeatKindId) -> AppResult<SeatKind> {
        self.seat_kinds
            .read()
            .get(&kind_id)
            .cloned()
            .ok_or(AppError::NotFound {
                resource: "seat kind",
                id: kind_id,
            })
    }

    /// Records a new premium for a kind. History is kept; pricing uses the
    /// latest entry.
    pub fn set_seat_kind_premium(
        &self,
        kind_id: SeatKindId,
        premium_percentage: i64,
    ) -> AppResult<SeatKindPremium> {
        self.seat_kind(kind_id)?;
        if premium_percentage < -100 {
            return Err(AppError::InvalidRequest(format!(
                "premium percentage must not go below -100, got {premium_percentage}"
            )));
        }
        let now = Utc::now();
        let premium = SeatKindPremium {
            id: self.next_id(),
            seat_kind_id: kind_id,
            premium_percentage,
            created_at: now,
            updated_at: now,
        };
        self.premiums.write().push(premium.clone());
        Ok(premium)
    }

    /// Effective premium percentage as of now: latest recorded entry, or 0
    /// for a kind without premium records.
    pub fn seat_kind_premium(&self, kind_id: SeatKindId) -> AppResult<i64> {
        self.seat_kind(kind_id)?;
        let premiums = self.premiums.read();
        Ok(premiums
            .iter()
            .rev()
            .find(|p| p.seat_kind_id == kind_id)
            .map(|p| p.premium_percentage)
            .unwrap_or(0))
    }

    // === Rooms & seats ===

    /// Creates a room with its seat layout in one step. `layout` lists
    /// (seat label, seat kind) pairs in seating order.
    pub fn add_show_room(&self, name: &str, layout: &[(String, SeatKindId)]) -> AppResult<ShowRoom> {
        if layout.is_empty() {
            return Err(AppError::InvalidRequest(
                "a show room needs at least one seat".to_string(),
            ));
        }
        for (_, kind_id) in layout {
            self.seat_kind(*kind_id)?;
        }

        let now = Utc::now();
        let room_id = self.next_id();
        let mut seat_ids = Vec::with_capacity(layout.len());
        {
            let mut seats = self.seats.write();
            for (label, kind_id) in layout {
                let seat = Seat {
                    id: self.next_id(),
                    show_room_id: room_id,
                    seat_kind_id: *kind_id,
                    name: label.clone(),
                    created_at: now,
                    updated_at: now,
                };
                seat_ids.push(seat.id);
                seats.insert(seat.id, seat);
            }
        }

        let room = ShowRoom {
            id: room_id,
            name: name.to_string(),
            seat_ids,
            created_at: now,
            updated_at: now,
        };
        self.rooms.write().insert(room.id, room.clone());
        Ok(room)
    }

    pub fn show_room(&self, room_id: ShowRoomId) -> AppResult<ShowRoom> {
        self.rooms
            .read()
            .get(&room_id)
            .cloned()
            .ok_or(AppError::NotFound {
                resource: "show room",
                id: room_id,
            })
    }

    pub(crate) fn remove_show_room(&self, room_id: ShowRoomId) -> AppResult<ShowRoom> {
        let room = self
            .rooms
            .write()
            .remove(&room_id)
            .ok_or(AppError::NotFound {
                resource: "show room",
                id: room_id,
            })?;
        let mut seats = self.seats.write();
        for seat_id in &room.seat_ids {
            seats.remove(seat_id);
        }
        Ok(room)
    }

    /// The room's seats in layout order.
    pub fn seat_layout(&self, room_id: ShowRoomId) -> AppResult<Vec<Seat>> {
        let room = self.show_room(room_id)?;
        let seats = self.seats.read();
        Ok(room
            .seat_ids
            .iter()
            .filter_map(|id| seats.get(id).cloned())
            .collect())
    }

    pub fn seat(&self, seat_id: SeatId) -> AppResult<Seat> {
        self.seats
            .read()
            .get(&seat_id)
            .cloned()
            .ok_or(AppError::NotFound {
                resource: "seat",
                id: seat_id,
            })
    }
}
