use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow, Row};
use std::fmt;

/// Column order every `trips` SELECT must follow for [`Trip`]'s row mapping.
///
/// The date columns have NUMERIC affinity, so digit-only input is stored as a
/// number; casting reads every row back as text.
pub const TRIP_COLUMNS: &str = "id, user_id, city, state, country, \
     CAST(start_date AS TEXT), CAST(end_date AS TEXT), type, created_at";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: i64,
    pub user_id: i64,
    pub city: String,
    pub state: String,
    pub country: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(rename = "type")]
    pub trip_type: String,
    pub created_at: NaiveDateTime,
}

impl Trip {
    /// Always zero: the dates are opaque text and no day arithmetic is done yet.
    pub fn duration_days(&self) -> i64 {
        0
    }
}

impl PartialEq for Trip {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Trip {}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trip to {}, {}, {} ({} to {})",
            self.city, self.state, self.country, self.start_date, self.end_date
        )
    }
}

impl<'r> FromRow<'r, SqliteRow> for Trip {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get(0)?,
            user_id: row.try_get(1)?,
            city: row.try_get(2)?,
            state: row.try_get(3)?,
            country: row.try_get(4)?,
            start_date: row.try_get(5)?,
            end_date: row.try_get(6)?,
            trip_type: row.try_get(7)?,
            created_at: row.try_get(8)?,
        })
    }
}

/// The six descriptive fields of a trip that has not been stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTrip {
    pub city: String,
    pub state: String,
    pub country: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(rename = "type")]
    pub trip_type: String,
}

impl NewTrip {
    pub fn new(
        city: impl Into<String>,
        state: impl Into<String>,
        country: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        trip_type: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            state: state.into(),
            country: country.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            trip_type: trip_type.into(),
        }
    }
}

impl fmt::Display for NewTrip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trip to {}, {}, {} ({} to {})",
            self.city, self.state, self.country, self.start_date, self.end_date
        )
    }
}

/// Partial update for a trip row. `None` and empty strings leave the column untouched.
#[derive(Debug, Clone, Default)]
pub struct TripChanges {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub trip_type: Option<String>,
}

impl TripChanges {
    pub(crate) fn assignments(&self) -> Vec<(&'static str, &str)> {
        [
            ("city", &self.city),
            ("state", &self.state),
            ("country", &self.country),
            ("start_date", &self.start_date),
            ("end_date", &self.end_date),
            ("type", &self.trip_type),
        ]
        .into_iter()
        .filter_map(|(column, value)| super::present(value).map(|v| (column, v)))
        .collect()
    }
}

impl From<NewTrip> for TripChanges {
    fn from(trip: NewTrip) -> Self {
        Self {
            city: Some(trip.city),
            state: Some(trip.state),
            country: Some(trip.country),
            start_date: Some(trip.start_date),
            end_date: Some(trip.end_date),
            trip_type: Some(trip.trip_type),
        }
    }
}
