//! Data store interface.
//!
//! [`ResourceStore`] is the read side the query engine plans against. The
//! repository traits add the mutations each resource supports. Both the
//! Postgres and the in-memory store implement all of them.

use async_trait::async_trait;

use dashboard_auth::CredentialStore;
use dashboard_core::{Listable, Sort, Window};
use dashboard_models::{
    CreateServiceDto, CreateServiceVersionDto, NewUser, Service, ServiceVersion, UpdateServiceDto,
    UpdateServiceVersionDto, User, UserChanges,
};

use crate::error::StoreResult;

/// Row filter shared by `find_many` and `count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    /// Case-sensitive substring match on the resource's name field.
    NameContains(String),
}

impl Filter {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::NameContains(term) => name.contains(term.as_str()),
        }
    }
}

#[async_trait]
pub trait ResourceStore<R>: Send + Sync
where
    R: Listable + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i64, preload: bool) -> StoreResult<R>;

    /// Lookup by the resource's unique name field.
    async fn find_by_unique_field(&self, value: &str, preload: bool) -> StoreResult<R>;

    async fn find_many(
        &self,
        filter: &Filter,
        sort: Sort<R::SortField>,
        window: Window,
        preload: bool,
    ) -> StoreResult<Vec<R>>;

    async fn count(&self, filter: &Filter) -> StoreResult<i64>;
}

#[async_trait]
pub trait ServiceRepository: ResourceStore<Service> {
    async fn create_service(&self, dto: &CreateServiceDto) -> StoreResult<Service>;
    async fn update_service(&self, id: i64, dto: &UpdateServiceDto) -> StoreResult<Service>;
    /// Removes the service and its versions.
    async fn delete_service(&self, id: i64) -> StoreResult<()>;

    async fn create_version(
        &self,
        service_id: i64,
        dto: &CreateServiceVersionDto,
    ) -> StoreResult<ServiceVersion>;
    async fn update_version(
        &self,
        id: i64,
        dto: &UpdateServiceVersionDto,
    ) -> StoreResult<ServiceVersion>;
    async fn delete_version(&self, id: i64) -> StoreResult<()>;
}

#[async_trait]
pub trait UserRepository: ResourceStore<User> + CredentialStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;
    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<User>;
    /// Removes the user and their profile.
    async fn delete_user(&self, id: i64) -> StoreResult<()>;
}
