use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use tracing::{debug, instrument};

use dashboard_core::{Sort, Window};
use dashboard_models::{
    CreateServiceDto, CreateServiceVersionDto, Service, ServiceSortField, ServiceVersion,
    UpdateServiceDto, UpdateServiceVersionDto,
};

use super::{PgStore, push_filter, push_order};
use crate::error::{StoreError, StoreResult, is_foreign_key_violation, is_unique_violation};
use crate::store::{Filter, ResourceStore, ServiceRepository};

const SELECT_SERVICE: &str =
    "SELECT id, service_name, service_description, created_at, updated_at FROM services";
const SERVICE_RETURNING: &str =
    " RETURNING id, service_name, service_description, created_at, updated_at";
const VERSION_COLUMNS: &str = "id, service_id, service_version_name, service_version_url, \
     service_version_description, created_at, updated_at";

const SERVICE_EXISTS: &str = "Service with this name already exists";
const VERSION_EXISTS: &str = "Service version with this name already exists for the service";

impl PgStore {
    async fn attach_versions(&self, services: &mut [Service]) -> StoreResult<()> {
        if services.is_empty() {
            return Ok(());
        }

        let ids: Vec<i64> = services.iter().map(|s| s.id).collect();
        let versions = sqlx::query_as::<_, ServiceVersion>(&format!(
            "SELECT {VERSION_COLUMNS} FROM service_versions WHERE service_id = ANY($1) ORDER BY id"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_service: HashMap<i64, Vec<ServiceVersion>> = HashMap::new();
        for version in versions {
            by_service.entry(version.service_id).or_default().push(version);
        }
        for service in services.iter_mut() {
            service.service_versions = Some(by_service.remove(&service.id).unwrap_or_default());
        }
        Ok(())
    }

    async fn finish_service(
        &self,
        service: Option<Service>,
        preload: bool,
    ) -> StoreResult<Service> {
        let mut service = service.ok_or_else(|| StoreError::NotFound("Service".into()))?;
        if preload {
            self.attach_versions(std::slice::from_mut(&mut service))
                .await?;
        }
        Ok(service)
    }
}

#[async_trait]
impl ResourceStore<Service> for PgStore {
    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "services"))]
    async fn find_by_id(&self, id: i64, preload: bool) -> StoreResult<Service> {
        let service = sqlx::query_as::<_, Service>(&format!("{SELECT_SERVICE} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        self.finish_service(service, preload).await
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "services"))]
    async fn find_by_unique_field(&self, value: &str, preload: bool) -> StoreResult<Service> {
        let service =
            sqlx::query_as::<_, Service>(&format!("{SELECT_SERVICE} WHERE service_name = $1"))
                .bind(value)
                .fetch_optional(&self.pool)
                .await?;
        self.finish_service(service, preload).await
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "services"))]
    async fn find_many(
        &self,
        filter: &Filter,
        sort: Sort<ServiceSortField>,
        window: Window,
        preload: bool,
    ) -> StoreResult<Vec<Service>> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_SERVICE);
        push_filter(&mut qb, "service_name", filter);
        push_order(&mut qb, sort);
        qb.push(" LIMIT ")
            .push_bind(window.limit)
            .push(" OFFSET ")
            .push_bind(window.offset());

        let mut services = qb
            .build_query_as::<Service>()
            .fetch_all(&self.pool)
            .await?;
        debug!(count = services.len(), "Fetched services");

        if preload {
            self.attach_versions(&mut services).await?;
        }
        Ok(services)
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "services"))]
    async fn count(&self, filter: &Filter) -> StoreResult<i64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM services");
        push_filter(&mut qb, "service_name", filter);
        Ok(qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?)
    }
}

#[async_trait]
impl ServiceRepository for PgStore {
    #[instrument(skip(self, dto), fields(db.operation = "INSERT", db.table = "services"))]
    async fn create_service(&self, dto: &CreateServiceDto) -> StoreResult<Service> {
        sqlx::query_as::<_, Service>(&format!(
            "INSERT INTO services (service_name, service_description) VALUES ($1, $2){SERVICE_RETURNING}"
        ))
        .bind(&dto.service_name)
        .bind(&dto.service_description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            e if is_unique_violation(&e) => StoreError::Conflict(SERVICE_EXISTS.into()),
            e => e.into(),
        })
    }

    #[instrument(skip(self, dto), fields(db.operation = "UPDATE", db.table = "services"))]
    async fn update_service(&self, id: i64, dto: &UpdateServiceDto) -> StoreResult<Service> {
        sqlx::query_as::<_, Service>(&format!(
            "UPDATE services SET service_name = $1, service_description = $2, updated_at = NOW() \
             WHERE id = $3{SERVICE_RETURNING}"
        ))
        .bind(&dto.service_name)
        .bind(&dto.service_description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            e if is_unique_violation(&e) => StoreError::Conflict(SERVICE_EXISTS.into()),
            e => e.into(),
        })?
        .ok_or_else(|| StoreError::NotFound("Service".into()))
    }

    #[instrument(skip(self), fields(db.operation = "DELETE", db.table = "services"))]
    async fn delete_service(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Service".into()));
        }
        Ok(())
    }

    #[instrument(skip(self, dto), fields(db.operation = "INSERT", db.table = "service_versions"))]
    async fn create_version(
        &self,
        service_id: i64,
        dto: &CreateServiceVersionDto,
    ) -> StoreResult<ServiceVersion> {
        sqlx::query_as::<_, ServiceVersion>(&format!(
            "INSERT INTO service_versions \
             (service_id, service_version_name, service_version_url, service_version_description) \
             VALUES ($1, $2, $3, $4) RETURNING {VERSION_COLUMNS}"
        ))
        .bind(service_id)
        .bind(&dto.service_version_name)
        .bind(&dto.service_version_url)
        .bind(&dto.service_version_description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            e if is_unique_violation(&e) => StoreError::Conflict(VERSION_EXISTS.into()),
            e if is_foreign_key_violation(&e) => StoreError::NotFound("Service".into()),
            e => e.into(),
        })
    }

    #[instrument(skip(self, dto), fields(db.operation = "UPDATE", db.table = "service_versions"))]
    async fn update_version(
        &self,
        id: i64,
        dto: &UpdateServiceVersionDto,
    ) -> StoreResult<ServiceVersion> {
        sqlx::query_as::<_, ServiceVersion>(&format!(
            "UPDATE service_versions SET service_version_name = $1, service_version_url = $2, \
             service_version_description = $3, updated_at = NOW() \
             WHERE id = $4 RETURNING {VERSION_COLUMNS}"
        ))
        .bind(&dto.service_version_name)
        .bind(&dto.service_version_url)
        .bind(&dto.service_version_description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            e if is_unique_violation(&e) => StoreError::Conflict(VERSION_EXISTS.into()),
            e => e.into(),
        })?
        .ok_or_else(|| StoreError::NotFound("Service version".into()))
    }

    #[instrument(skip(self), fields(db.operation = "DELETE", db.table = "service_versions"))]
    async fn delete_version(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM service_versions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Service version".into()));
        }
        Ok(())
    }
}
