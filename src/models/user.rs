use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow, Row};
use std::fmt;

use super::trip::NewTrip;

/// Column order every `users` SELECT must follow for [`User`]'s row mapping.
pub const USER_COLUMNS: &str = "id, name, email, password, created_at";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Stored and compared as plain text. Hash before exposing this to real users.
    pub password: String,
    pub created_at: NaiveDateTime,
    /// Drafts appended locally. Never written to or loaded from the store.
    #[serde(skip)]
    trips: Vec<NewTrip>,
}

impl User {
    pub fn add_trip(&mut self, trip: NewTrip) {
        self.trips.push(trip);
    }

    /// Removes the first draft equal to `trip`, returning whether one was found.
    pub fn remove_trip(&mut self, trip: &NewTrip) -> bool {
        match self.trips.iter().position(|t| t == trip) {
            Some(index) => {
                self.trips.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn trips(&self) -> &[NewTrip] {
        &self.trips
    }

    pub fn trip(&self, index: usize) -> Option<&NewTrip> {
        self.trips.get(index)
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User(name='{}', email='{}')", self.name, self.email)
    }
}

impl<'r> FromRow<'r, SqliteRow> for User {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get(0)?,
            name: row.try_get(1)?,
            email: row.try_get(2)?,
            password: row.try_get(3)?,
            created_at: row.try_get(4)?,
            trips: Vec::new(),
        })
    }
}

/// Partial update for a user row. `None` and empty strings leave the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UserChanges {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub(crate) fn assignments(&self) -> Vec<(&'static str, &str)> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("password", &self.password),
        ]
        .into_iter()
        .filter_map(|(column, value)| super::present(value).map(|v| (column, v)))
        .collect()
    }
}
