use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

/// Runtime configuration, read from the environment. A `.env` file is
/// honored when present (loaded by the binary before this runs).
#[derive(Debug, Clone)]
pub struct Settings {
    pub backend_url: String,
    pub backend_api_key: String,
    pub email: Option<String>,
    pub password: Option<String>,
    pub data_dir: PathBuf,
    pub allow_anonymous: bool,
    pub sync_quiet_ms: u64,
    pub controls_hide_ms: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let backend_url =
            env::var("READER_BACKEND_URL").context("READER_BACKEND_URL is not set")?;
        let backend_api_key =
            env::var("READER_BACKEND_API_KEY").context("READER_BACKEND_API_KEY is not set")?;

        let data_dir = match env::var("READER_DATA_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => dirs::data_dir()
                .ok_or_else(|| anyhow!("No data dir"))?
                .join("manga-reader"),
        };

        Ok(Self {
            backend_url,
            backend_api_key,
            email: env::var("READER_EMAIL").ok(),
            password: env::var("READER_PASSWORD").ok(),
            data_dir,
            allow_anonymous: env_flag("READER_ALLOW_ANONYMOUS"),
            sync_quiet_ms: env_u64("READER_SYNC_QUIET_MS", 2000),
            controls_hide_ms: env_u64("READER_CONTROLS_HIDE_MS", 3000),
        })
    }

    pub fn db_url(&self) -> String {
        format!("sqlite:{}", self.data_dir.join("reader.db").display())
    }
}

/// Get an env value as u64, returning the default if not set or invalid
fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str) -> bool {
    matches!(env::var(key).as_deref(), Ok("1") | Ok("true"))
}
