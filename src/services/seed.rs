use tracing::info;

use crate::{db::Database, error::AppError, models::trip::NewTrip};

/// Adds the demo accounts and their trips.
///
/// Trips are only created for accounts inserted by this call, so running it
/// against an already seeded store changes nothing.
pub async fn populate_sample_data(db: &Database) -> Result<(), AppError> {
    let will = db
        .create_user("Will Cox", "will@gmail.com", "password")
        .await?;
    let admin = db
        .create_user("Admin User", "admin@example.com", "admin123")
        .await?;

    if let Some(will) = will {
        db.create_trip(
            will,
            &NewTrip::new("Dallas", "Texas", "USA", "2024-06-01", "2024-06-07", "business"),
        )
        .await?;
        db.create_trip(
            will,
            &NewTrip::new(
                "Paris",
                "Île-de-France",
                "France",
                "2024-07-15",
                "2024-07-22",
                "leisure",
            ),
        )
        .await?;
    }

    if let Some(admin) = admin {
        db.create_trip(
            admin,
            &NewTrip::new(
                "New York",
                "New York",
                "USA",
                "2024-05-20",
                "2024-05-25",
                "business",
            ),
        )
        .await?;
    }

    if will.is_some() || admin.is_some() {
        info!("sample data loaded");
    }
    Ok(())
}
