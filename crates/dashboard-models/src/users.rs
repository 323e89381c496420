//! User directory models and DTOs.
//!
//! The password hash is stored alongside the user but never part of
//! [`User`], so it cannot end up in a response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use dashboard_core::{Listable, SortField};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Present only when requested with `load_profile=true`
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_profile: Option<UserProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserProfile {
    pub id: i64,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserSortField {
    #[default]
    Id,
    Username,
    CreatedAt,
}

impl SortField for UserSortField {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "id" => Some(Self::Id),
            "username" => Some(Self::Username),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Username => "username",
            Self::CreatedAt => "created_at",
        }
    }
}

impl Listable for User {
    type SortField = UserSortField;
    const LOOKUP_PARAM: &'static str = "username";
    const INCLUDE_PARAM: &'static str = "load_profile";
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate, ToSchema)]
pub struct UserProfileDto {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[validate(email)]
    #[schema(example = "jane@example.com")]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "user3")]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(min = 1, max = 50))]
    #[schema(example = "user")]
    pub role: String,
    #[validate(nested)]
    pub user_profile: Option<UserProfileDto>,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 255))]
    pub username: Option<String>,
    #[validate(length(min = 1))]
    pub password: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub role: Option<String>,
    #[validate(nested)]
    pub user_profile: Option<UserProfileDto>,
}

/// A user ready to be stored, password already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub profile: Option<UserProfileDto>,
}

/// Changes to an existing user, password already hashed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<String>,
    pub profile: Option<UserProfileDto>,
}
