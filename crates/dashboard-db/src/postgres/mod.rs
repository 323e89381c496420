//! Postgres-backed store.
//!
//! Listing SQL is assembled with [`QueryBuilder`]: values are always bound,
//! and the only interpolated identifiers come from the closed sort-field enums.

mod services;
mod users;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};

use dashboard_auth::{Credential, CredentialStore};
use dashboard_config::DatabaseConfig;
use dashboard_core::{Sort, SortField};

use crate::error::StoreResult;
use crate::store::Filter;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects with the configured pool size and applies pending migrations.
    pub async fn connect(url: &str, config: &DatabaseConfig) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(url)
            .await?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| anyhow::Error::new(e).context("Failed to run migrations"))?;
        info!("Database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "users"))]
    async fn find_credential(&self, username: &str) -> anyhow::Result<Option<Credential>> {
        let row = sqlx::query_as::<_, (String, String, String)>(
            "SELECT username, password_hash, role FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(username, password_hash, role)| Credential {
            username,
            password_hash,
            role,
        }))
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, column: &'static str, filter: &Filter) {
    if let Filter::NameContains(term) = filter {
        qb.push(format!(" WHERE {column} LIKE "))
            .push_bind(like_pattern(term))
            .push(" ESCAPE '\\'");
    }
}

/// Orders by the requested field, then by id so pages never overlap.
fn push_order<F: SortField>(qb: &mut QueryBuilder<'_, Postgres>, sort: Sort<F>) {
    qb.push(format!(
        " ORDER BY {} {}",
        sort.field.column(),
        sort.order.as_sql()
    ));
    if sort.field.column() != "id" {
        qb.push(", id ASC");
    }
}

/// Wraps `term` for a literal substring `LIKE` match.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
