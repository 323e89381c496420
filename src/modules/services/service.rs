use std::collections::HashMap;

use tracing::{info, instrument};

use dashboard_core::{AppError, plan};
use dashboard_db::{Fetched, ResourceStore, ServiceRepository, execute};
use dashboard_models::{
    CreateServiceDto, CreateServiceVersionDto, Service, ServiceVersion, UpdateServiceDto,
    UpdateServiceVersionDto,
};

use crate::modules::lookup::{Target, delete_target, id_param, required_id};

pub struct CatalogService;

impl CatalogService {
    #[instrument(skip(store))]
    pub async fn get_services(
        store: &dyn ServiceRepository,
        params: &HashMap<String, String>,
    ) -> Result<Fetched<Service>, AppError> {
        let fetch = plan::<Service>(params)?;
        Ok(execute::<Service, _>(store, fetch).await?)
    }

    #[instrument(skip(store, dto), fields(service_name = %dto.service_name))]
    pub async fn create_service(
        store: &dyn ServiceRepository,
        dto: CreateServiceDto,
    ) -> Result<Service, AppError> {
        let service = store.create_service(&dto).await?;
        info!(service_id = service.id, "Service created");
        Ok(service)
    }

    #[instrument(skip(store, dto), fields(service_id = ?dto.id))]
    pub async fn update_service(
        store: &dyn ServiceRepository,
        dto: UpdateServiceDto,
    ) -> Result<Service, AppError> {
        let id = required_id(dto.id)?;
        Ok(store.update_service(id, &dto).await?)
    }

    #[instrument(skip(store))]
    pub async fn delete_service(
        store: &dyn ServiceRepository,
        params: &HashMap<String, String>,
    ) -> Result<(), AppError> {
        let id = match delete_target(params, "name")? {
            Target::Id(id) => id,
            Target::Name(name) => {
                ResourceStore::<Service>::find_by_unique_field(store, &name, false)
                    .await?
                    .id
            }
        };
        store.delete_service(id).await?;
        info!(service_id = id, "Service deleted");
        Ok(())
    }

    #[instrument(skip(store, dto), fields(service_id = ?dto.service_id))]
    pub async fn create_version(
        store: &dyn ServiceRepository,
        dto: CreateServiceVersionDto,
    ) -> Result<ServiceVersion, AppError> {
        let service_id = dto
            .service_id
            .filter(|id| *id >= 1)
            .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("service_id is required")))?;
        let version = store.create_version(service_id, &dto).await?;
        info!(version_id = version.id, "Service version created");
        Ok(version)
    }

    #[instrument(skip(store, dto), fields(version_id = ?dto.id))]
    pub async fn update_version(
        store: &dyn ServiceRepository,
        dto: UpdateServiceVersionDto,
    ) -> Result<ServiceVersion, AppError> {
        let id = required_id(dto.id)?;
        Ok(store.update_version(id, &dto).await?)
    }

    #[instrument(skip(store))]
    pub async fn delete_version(
        store: &dyn ServiceRepository,
        params: &HashMap<String, String>,
    ) -> Result<(), AppError> {
        let id = id_param(params)?;
        store.delete_version(id).await?;
        info!(version_id = id, "Service version deleted");
        Ok(())
    }
}
