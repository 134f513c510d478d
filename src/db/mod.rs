//! SQLite persistence for users and their trips.
//!
//! [`Database`] holds connection options only. Every operation opens its own
//! connection, runs its statements (writes inside a committed transaction) and
//! closes the connection before returning.

mod trips;
mod users;

use std::{path::Path, str::FromStr};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteConnection},
    ConnectOptions, Connection,
};
use tracing::debug;

use crate::error::AppError;

const SCHEMA: [&str; 4] = [
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT UNIQUE NOT NULL,
        password TEXT NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS trips (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        city TEXT NOT NULL,
        state TEXT NOT NULL,
        country TEXT NOT NULL,
        start_date DATE NOT NULL,
        end_date DATE NOT NULL,
        type TEXT NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
    )",
    "CREATE INDEX IF NOT EXISTS idx_trips_user_id ON trips(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)",
];

#[derive(Debug, Clone)]
pub struct Database {
    options: SqliteConnectOptions,
}

impl Database {
    /// Opens the store behind a `sqlite://` URL, creating the file and schema if needed.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)?;
        Self::with_options(options).await
    }

    pub async fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::new().filename(path);
        Self::with_options(options).await
    }

    async fn with_options(options: SqliteConnectOptions) -> Result<Self, AppError> {
        let db = Self {
            options: options.create_if_missing(true).foreign_keys(true),
        };
        db.init_schema().await?;
        Ok(db)
    }

    /// Creates both tables and their indexes. Safe to run against a populated store.
    pub async fn init_schema(&self) -> Result<(), AppError> {
        let mut conn = self.connection().await?;
        let mut tx = conn.begin().await?;
        for statement in SCHEMA {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        conn.close().await?;
        debug!("schema ready");
        Ok(())
    }

    async fn connection(&self) -> Result<SqliteConnection, AppError> {
        Ok(self.options.connect().await?)
    }
}

/// Which store constraint, if any, rejected a write.
fn constraint_violation(err: &sqlx::Error) -> Option<Constraint> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => Some(Constraint::Unique),
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            Some(Constraint::ForeignKey)
        }
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Constraint {
    Unique,
    ForeignKey,
}
