use sqlx::{Connection, QueryBuilder, Sqlite};
use tracing::{debug, info, warn};

use super::{constraint_violation, Constraint, Database};
use crate::{
    error::AppError,
    models::user::{User, UserChanges, USER_COLUMNS},
};

impl Database {
    /// Inserts a user and returns its id, or `None` when the email is already registered.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<i64>, AppError> {
        let mut conn = self.connection().await?;
        let mut tx = conn.begin().await?;
        let inserted = sqlx::query("INSERT INTO users (name, email, password) VALUES (?, ?, ?)")
            .bind(name)
            .bind(email)
            .bind(password)
            .execute(&mut *tx)
            .await;

        let id = match inserted {
            Ok(done) => done.last_insert_rowid(),
            Err(err) if constraint_violation(&err) == Some(Constraint::Unique) => {
                warn!(email, "sign-up rejected: email already registered");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };
        tx.commit().await?;
        conn.close().await?;

        info!(user_id = id, "user created");
        Ok(Some(id))
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let mut conn = self.connection().await?;
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&mut conn)
        .await?;
        conn.close().await?;
        Ok(user)
    }

    pub async fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>, AppError> {
        let mut conn = self.connection().await?;
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(user_id)
        .fetch_optional(&mut conn)
        .await?;
        conn.close().await?;
        Ok(user)
    }

    pub async fn get_user_id_by_email(&self, email: &str) -> Result<Option<i64>, AppError> {
        let mut conn = self.connection().await?;
        let id = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&mut conn)
            .await?;
        conn.close().await?;
        Ok(id)
    }

    /// Writes the non-empty fields of `changes`. Nothing supplied means nothing runs.
    ///
    /// Moving a user onto an email another row already holds fails with
    /// [`AppError::EmailTaken`] and leaves the row untouched.
    pub async fn update_user(&self, user_id: i64, changes: &UserChanges) -> Result<(), AppError> {
        let assignments = changes.assignments();
        if assignments.is_empty() {
            debug!(user_id, "user update skipped: no fields supplied");
            return Ok(());
        }

        let mut query = QueryBuilder::<Sqlite>::new("UPDATE users SET ");
        let mut set = query.separated(", ");
        for (column, value) in assignments {
            set.push(format!("{column} = "));
            set.push_bind_unseparated(value.to_owned());
        }
        query.push(" WHERE id = ").push_bind(user_id);

        let mut conn = self.connection().await?;
        let mut tx = conn.begin().await?;
        match query.build().execute(&mut *tx).await {
            Ok(_) => {}
            // email is the only UNIQUE column on users besides the primary key.
            Err(err) if constraint_violation(&err) == Some(Constraint::Unique) => {
                return Err(AppError::EmailTaken);
            }
            Err(err) => return Err(err.into()),
        }
        tx.commit().await?;
        conn.close().await?;

        debug!(user_id, "user updated");
        Ok(())
    }

    /// Removes the user. The store cascades the delete to every trip they own.
    pub async fn delete_user(&self, user_id: i64) -> Result<(), AppError> {
        let mut conn = self.connection().await?;
        let mut tx = conn.begin().await?;
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        conn.close().await?;

        info!(user_id, "user deleted");
        Ok(())
    }
}
