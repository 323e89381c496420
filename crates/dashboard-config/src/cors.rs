//! Browser origins allowed to call the API.
//!
//! - `CORS_ALLOWED_ORIGINS`: comma-separated origins (default
//!   `http://localhost:3000`). Blank entries are ignored; a trailing `/` is
//!   dropped since browsers never send one in `Origin`.

use std::env;

pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: parse_origins(DEFAULT_ALLOWED_ORIGINS),
        }
    }
}

impl CorsConfig {
    pub fn from_env() -> Self {
        match env::var("CORS_ALLOWED_ORIGINS") {
            Ok(raw) => Self {
                allowed_origins: parse_origins(&raw),
            },
            Err(_) => Self::default(),
        }
    }
}

pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
