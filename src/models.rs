use jiff::civil::Date;
use serde::Serialize;

use crate::entities::movie_log;

/// A movie-watch entry as exchanged with HTTP clients.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieLogEntry {
    pub movie_id: i32,
    pub movie_name: String,
    /// Rendered as `YYYY-MM-DD`; `null` if the stored value is missing or unreadable.
    pub watch_date: Option<Date>,
    pub rating: i32,
    pub review: Option<String>,
}

impl From<movie_log::Model> for MovieLogEntry {
    fn from(row: movie_log::Model) -> Self {
        let watch_date = match row.watch_date.trim() {
            "" => None,
            raw => match raw.parse::<Date>() {
                Ok(date) => Some(date),
                Err(err) => {
                    tracing::warn!(movie_id = row.movie_id, raw = %raw, error = %err, "unreadable stored watch_date");
                    None
                },
            },
        };

        Self {
            movie_id: row.movie_id,
            movie_name: row.movie_name,
            watch_date,
            rating: row.rating,
            review: row.review,
        }
    }
}

/// A validated create payload, ready to be stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMovie {
    pub movie_name: String,
    pub watch_date: Date,
    pub rating: i32,
    pub review: Option<String>,
}

/// Store representation of a date: SQLite keeps dates as ISO-8601 text.
pub fn date_to_store(date: Date) -> String {
    date.strftime("%Y-%m-%d").to_string()
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub movie_id: i32,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DbVersionResponse {
    pub message: &'static str,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct TablesResponse {
    pub tables: Vec<String>,
}
