use std::{env, net::SocketAddr};

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub cookie_secret: String,
    pub seed_sample_data: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://tourley.db".to_string());
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:5001".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let cookie_secret = env::var("COOKIE_SECRET")
            .unwrap_or_else(|_| "change-me-tourley-development-cookie-secret".to_string());

        let seed_sample_data = match env::var("SEED_SAMPLE_DATA") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|err| AppError::Config(format!("invalid SEED_SAMPLE_DATA: {err}")))?,
            Err(_) => true,
        };

        Ok(Self {
            database_url,
            listen_addr,
            cookie_secret,
            seed_sample_data,
        })
    }
}
