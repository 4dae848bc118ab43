use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FilmId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Film {
    pub id: FilmId,
    pub name: String,
    pub duration_minutes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
