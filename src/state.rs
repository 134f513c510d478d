use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};

use crate::{config::AppConfig, db::Database};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub cookie_key: Key,
}

impl AppState {
    pub fn new(config: &AppConfig, db: Database) -> Self {
        let digest = Sha512::digest(config.cookie_secret.as_bytes());
        let cookie_key = Key::from(&digest[..]);
        Self {
            db,
            cookie_key,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
