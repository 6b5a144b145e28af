use std::{env, path::PathBuf};

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub root: PathBuf,
    pub assets_dir: PathBuf,
    pub log_dir: PathBuf,
    pub username: String,
    pub password: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid SERVER_PORT: {err}")))?;

        // Every request path resolves under this root.
        let root = PathBuf::from(env::var("MIST_ROOT").unwrap_or_else(|_| "/".into()));

        let assets_dir =
            PathBuf::from(env::var("MIST_ASSETS_DIR").unwrap_or_else(|_| "assets".into()));

        let log_dir = PathBuf::from(env::var("MIST_LOG_DIR").unwrap_or_else(|_| "./log".into()));

        let username = env::var("MIST_USER").unwrap_or_else(|_| "admin".into());
        let password = env::var("MIST_PASSWORD").unwrap_or_else(|_| "admin".into());

        Ok(Self {
            host,
            port,
            root,
            assets_dir,
            log_dir,
            username,
            password,
        })
    }
}
