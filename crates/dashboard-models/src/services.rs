//! Service catalog models and DTOs.
//!
//! A service owns any number of versions. Version names are unique per
//! service, and versions are deleted together with their service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use dashboard_core::{Listable, SortField};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Service {
    pub id: i64,
    pub service_name: String,
    pub service_description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Present only when requested with `load_version=true`
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_versions: Option<Vec<ServiceVersion>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ServiceVersion {
    pub id: i64,
    pub service_id: i64,
    pub service_version_name: String,
    pub service_version_url: String,
    pub service_version_description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ServiceSortField {
    #[default]
    Id,
    ServiceName,
    CreatedAt,
}

impl SortField for ServiceSortField {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "id" => Some(Self::Id),
            "service_name" => Some(Self::ServiceName),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::ServiceName => "service_name",
            Self::CreatedAt => "created_at",
        }
    }
}

impl Listable for Service {
    type SortField = ServiceSortField;
    const LOOKUP_PARAM: &'static str = "name";
    const INCLUDE_PARAM: &'static str = "load_version";
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateServiceDto {
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "Billing API")]
    pub service_name: String,
    #[serde(default)]
    pub service_description: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateServiceDto {
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 255))]
    pub service_name: String,
    #[serde(default)]
    pub service_description: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateServiceVersionDto {
    pub service_id: Option<i64>,
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "v1.0.0")]
    pub service_version_name: String,
    #[serde(default)]
    pub service_version_url: String,
    #[serde(default)]
    pub service_version_description: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateServiceVersionDto {
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 255))]
    pub service_version_name: String,
    #[serde(default)]
    pub service_version_url: String,
    #[serde(default)]
    pub service_version_description: String,
}
