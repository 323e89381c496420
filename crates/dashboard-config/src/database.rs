//! Database connection settings.
//!
//! `DATABASE_URL` wins when set. Otherwise the URL is assembled from the
//! discrete `SERVICE_DASHBOARD_DB_*` variables, which requires at least
//! `SERVICE_DASHBOARD_DB_HOST`. With neither, no database is configured and
//! the server runs on the in-memory store.

use std::env;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        let url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .or_else(|| {
                let host = env::var("SERVICE_DASHBOARD_DB_HOST").ok()?;
                Some(assemble_url(
                    &host,
                    &env::var("SERVICE_DASHBOARD_DB_PORT").unwrap_or_else(|_| "5432".to_string()),
                    &env::var("SERVICE_DASHBOARD_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
                    &env::var("SERVICE_DASHBOARD_DB_PASSWORD").unwrap_or_default(),
                    &env::var("SERVICE_DASHBOARD_DB_NAME").unwrap_or_else(|_| "postgres".to_string()),
                ))
            });

        Self {
            url,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
        }
    }
}

fn assemble_url(host: &str, port: &str, user: &str, password: &str, name: &str) -> String {
    if password.is_empty() {
        format!("postgres://{user}@{host}:{port}/{name}")
    } else {
        format!("postgres://{user}:{password}@{host}:{port}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_url_with_password() {
        assert_eq!(
            assemble_url("db", "5432", "postgres", "secret", "dashboard"),
            "postgres://postgres:secret@db:5432/dashboard"
        );
    }

    #[test]
    fn test_assemble_url_without_password() {
        assert_eq!(
            assemble_url("localhost", "6543", "app", "", "postgres"),
            "postgres://app@localhost:6543/postgres"
        );
    }
}
