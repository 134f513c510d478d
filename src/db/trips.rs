use sqlx::{Connection, QueryBuilder, Sqlite};
use tracing::{debug, info, warn};

use super::{constraint_violation, Constraint, Database};
use crate::{
    error::AppError,
    models::trip::{NewTrip, Trip, TripChanges, TRIP_COLUMNS},
};

impl Database {
    /// Stores a trip for `user_id`. A user id with no row fails with [`AppError::UnknownUser`].
    pub async fn create_trip(&self, user_id: i64, trip: &NewTrip) -> Result<i64, AppError> {
        let mut conn = self.connection().await?;
        let mut tx = conn.begin().await?;
        let inserted = sqlx::query(
            "INSERT INTO trips (user_id, city, state, country, start_date, end_date, type)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(trip.city.as_str())
        .bind(trip.state.as_str())
        .bind(trip.country.as_str())
        .bind(trip.start_date.as_str())
        .bind(trip.end_date.as_str())
        .bind(trip.trip_type.as_str())
        .execute(&mut *tx)
        .await;

        let id = match inserted {
            Ok(done) => done.last_insert_rowid(),
            Err(err) if constraint_violation(&err) == Some(Constraint::ForeignKey) => {
                warn!(user_id, "trip rejected: owner does not exist");
                return Err(AppError::UnknownUser(user_id));
            }
            Err(err) => return Err(err.into()),
        };
        tx.commit().await?;
        conn.close().await?;

        info!(user_id, trip_id = id, "trip created");
        Ok(id)
    }

    /// All trips owned by `user_id`, most recently created first.
    pub async fn get_user_trips(&self, user_id: i64) -> Result<Vec<Trip>, AppError> {
        let mut conn = self.connection().await?;
        // created_at only has second resolution; id keeps same-second inserts in order.
        let trips = sqlx::query_as::<_, Trip>(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips WHERE user_id = ? ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&mut conn)
        .await?;
        conn.close().await?;
        Ok(trips)
    }

    pub async fn get_trip_by_id(&self, trip_id: i64) -> Result<Option<Trip>, AppError> {
        let mut conn = self.connection().await?;
        let trip = sqlx::query_as::<_, Trip>(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips WHERE id = ?"
        ))
        .bind(trip_id)
        .fetch_optional(&mut conn)
        .await?;
        conn.close().await?;
        Ok(trip)
    }

    /// Writes the non-empty fields of `changes`. Nothing supplied means nothing runs.
    pub async fn update_trip(&self, trip_id: i64, changes: &TripChanges) -> Result<(), AppError> {
        let assignments = changes.assignments();
        if assignments.is_empty() {
            debug!(trip_id, "trip update skipped: no fields supplied");
            return Ok(());
        }

        let mut query = QueryBuilder::<Sqlite>::new("UPDATE trips SET ");
        let mut set = query.separated(", ");
        for (column, value) in assignments {
            set.push(format!("{column} = "));
            set.push_bind_unseparated(value.to_owned());
        }
        query.push(" WHERE id = ").push_bind(trip_id);

        let mut conn = self.connection().await?;
        let mut tx = conn.begin().await?;
        query.build().execute(&mut *tx).await?;
        tx.commit().await?;
        conn.close().await?;

        debug!(trip_id, "trip updated");
        Ok(())
    }

    pub async fn delete_trip(&self, trip_id: i64) -> Result<(), AppError> {
        let mut conn = self.connection().await?;
        let mut tx = conn.begin().await?;
        sqlx::query("DELETE FROM trips WHERE id = ?")
            .bind(trip_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        conn.close().await?;

        info!(trip_id, "trip deleted");
        Ok(())
    }
}
