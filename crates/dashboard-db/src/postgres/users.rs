use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use tracing::{debug, instrument};

use dashboard_core::{Sort, Window};
use dashboard_models::{NewUser, User, UserChanges, UserProfile, UserProfileDto, UserSortField};

use super::{PgStore, push_filter, push_order};
use crate::error::{StoreError, StoreResult, is_unique_violation};
use crate::store::{Filter, ResourceStore, UserRepository};

const SELECT_USER: &str = "SELECT id, username, role, created_at, updated_at FROM users";
const USER_RETURNING: &str = " RETURNING id, username, role, created_at, updated_at";
const PROFILE_COLUMNS: &str = "id, user_id, first_name, last_name, email, created_at, updated_at";

const USER_EXISTS: &str = "User with this username already exists";

impl PgStore {
    async fn attach_profiles(&self, users: &mut [User]) -> StoreResult<()> {
        if users.is_empty() {
            return Ok(());
        }

        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        let profiles = sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE user_id = ANY($1)"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_user: HashMap<i64, UserProfile> =
            profiles.into_iter().map(|p| (p.user_id, p)).collect();
        for user in users.iter_mut() {
            user.user_profile = by_user.remove(&user.id);
        }
        Ok(())
    }

    async fn finish_user(&self, user: Option<User>, preload: bool) -> StoreResult<User> {
        let mut user = user.ok_or_else(|| StoreError::NotFound("User".into()))?;
        if preload {
            self.attach_profiles(std::slice::from_mut(&mut user)).await?;
        }
        Ok(user)
    }
}

async fn upsert_profile(
    conn: &mut PgConnection,
    user_id: i64,
    profile: &UserProfileDto,
) -> StoreResult<UserProfile> {
    let profile = sqlx::query_as::<_, UserProfile>(&format!(
        "INSERT INTO user_profiles (user_id, first_name, last_name, email) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (user_id) DO UPDATE SET first_name = EXCLUDED.first_name, \
         last_name = EXCLUDED.last_name, email = EXCLUDED.email, updated_at = NOW() \
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(user_id)
    .bind(&profile.first_name)
    .bind(&profile.last_name)
    .bind(&profile.email)
    .fetch_one(conn)
    .await?;
    Ok(profile)
}

fn map_user_write(err: sqlx::Error) -> StoreError {
    if is_unique_violation(&err) {
        StoreError::Conflict(USER_EXISTS.into())
    } else {
        err.into()
    }
}

#[async_trait]
impl ResourceStore<User> for PgStore {
    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "users"))]
    async fn find_by_id(&self, id: i64, preload: bool) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        self.finish_user(user, preload).await
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "users"))]
    async fn find_by_unique_field(&self, value: &str, preload: bool) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE username = $1"))
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        self.finish_user(user, preload).await
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "users"))]
    async fn find_many(
        &self,
        filter: &Filter,
        sort: Sort<UserSortField>,
        window: Window,
        preload: bool,
    ) -> StoreResult<Vec<User>> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_USER);
        push_filter(&mut qb, "username", filter);
        push_order(&mut qb, sort);
        qb.push(" LIMIT ")
            .push_bind(window.limit)
            .push(" OFFSET ")
            .push_bind(window.offset());

        let mut users = qb.build_query_as::<User>().fetch_all(&self.pool).await?;
        debug!(count = users.len(), "Fetched users");

        if preload {
            self.attach_profiles(&mut users).await?;
        }
        Ok(users)
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "users"))]
    async fn count(&self, filter: &Filter) -> StoreResult<i64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");
        push_filter(&mut qb, "username", filter);
        Ok(qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?)
    }
}

#[async_trait]
impl UserRepository for PgStore {
    #[instrument(skip(self, user), fields(db.operation = "INSERT", db.table = "users", username = %user.username))]
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tx = self.pool.begin().await?;

        let mut created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, password_hash, role) VALUES ($1, $2, $3){USER_RETURNING}"
        ))
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.role)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_user_write)?;

        if let Some(profile) = &user.profile {
            created.user_profile = Some(upsert_profile(&mut tx, created.id, profile).await?);
        }

        tx.commit().await?;
        Ok(created)
    }

    #[instrument(skip(self, changes), fields(db.operation = "UPDATE", db.table = "users"))]
    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<User> {
        let mut tx = self.pool.begin().await?;

        let mut updated = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET username = COALESCE($1, username), \
             password_hash = COALESCE($2, password_hash), role = COALESCE($3, role), \
             updated_at = NOW() WHERE id = $4{USER_RETURNING}"
        ))
        .bind(changes.username.as_deref())
        .bind(changes.password_hash.as_deref())
        .bind(changes.role.as_deref())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_user_write)?
        .ok_or_else(|| StoreError::NotFound("User".into()))?;

        if let Some(profile) = &changes.profile {
            updated.user_profile = Some(upsert_profile(&mut tx, id, profile).await?);
        }

        tx.commit().await?;
        Ok(updated)
    }

    #[instrument(skip(self), fields(db.operation = "DELETE", db.table = "users"))]
    async fn delete_user(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("User".into()));
        }
        Ok(())
    }
}
