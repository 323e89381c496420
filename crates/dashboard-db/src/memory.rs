//! In-memory store.
//!
//! Used when no database is configured and by the HTTP tests. State lives in
//! ordered maps behind a single `tokio::sync::RwLock`; reads share the lock
//! and every mutation takes it exclusively, so uniqueness checks and inserts
//! are atomic with respect to each other. Nothing survives a restart.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use dashboard_auth::{Credential, CredentialStore};
use dashboard_core::{Sort, SortOrder, Window};
use dashboard_models::{
    CreateServiceDto, CreateServiceVersionDto, NewUser, Service, ServiceSortField,
    ServiceVersion, UpdateServiceDto, UpdateServiceVersionDto, User, UserChanges, UserProfile,
    UserProfileDto, UserSortField,
};

use crate::error::{StoreError, StoreResult};
use crate::store::{Filter, ResourceStore, ServiceRepository, UserRepository};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

/// Per-table id counter, starting at 1 like a serial column.
#[derive(Debug, Default)]
struct Sequence(i64);

impl Sequence {
    fn next(&mut self) -> i64 {
        self.0 += 1;
        self.0
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    services: BTreeMap<i64, Service>,
    versions: BTreeMap<i64, ServiceVersion>,
    users: BTreeMap<i64, StoredUser>,
    profiles: BTreeMap<i64, UserProfile>,
    service_ids: Sequence,
    version_ids: Sequence,
    user_ids: Sequence,
    profile_ids: Sequence,
}

impl MemoryState {
    fn service_with(&self, service: &Service, preload: bool) -> Service {
        let mut service = service.clone();
        if preload {
            service.service_versions = Some(
                self.versions
                    .values()
                    .filter(|v| v.service_id == service.id)
                    .cloned()
                    .collect(),
            );
        }
        service
    }

    fn user_with(&self, stored: &StoredUser, preload: bool) -> User {
        let mut user = stored.user.clone();
        if preload {
            user.user_profile = self
                .profiles
                .values()
                .find(|p| p.user_id == user.id)
                .cloned();
        }
        user
    }

    fn service_name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.services
            .values()
            .any(|s| s.service_name == name && Some(s.id) != except)
    }

    fn version_name_taken(&self, service_id: i64, name: &str, except: Option<i64>) -> bool {
        self.versions.values().any(|v| {
            v.service_id == service_id && v.service_version_name == name && Some(v.id) != except
        })
    }

    fn username_taken(&self, username: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.user.username == username && Some(u.user.id) != except)
    }

    fn upsert_profile(&mut self, user_id: i64, dto: &UserProfileDto) -> UserProfile {
        let now = Utc::now();
        let existing = self
            .profiles
            .values()
            .find(|p| p.user_id == user_id)
            .map(|p| (p.id, p.created_at));
        let (id, created_at) = match existing {
            Some(found) => found,
            None => (self.profile_ids.next(), now),
        };

        let profile = UserProfile {
            id,
            user_id,
            first_name: dto.first_name.clone(),
            last_name: dto.last_name.clone(),
            email: dto.email.clone(),
            created_at,
            updated_at: now,
        };
        self.profiles.insert(id, profile.clone());
        profile
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Orders by the requested field, then by id ascending.
fn ordered<T>(
    a: &T,
    b: &T,
    order: SortOrder,
    primary: impl Fn(&T, &T) -> Ordering,
    id: impl Fn(&T) -> i64,
) -> Ordering {
    let primary = match order {
        SortOrder::Asc => primary(a, b),
        SortOrder::Desc => primary(a, b).reverse(),
    };
    primary.then_with(|| id(a).cmp(&id(b)))
}

fn window_of<T>(items: Vec<T>, window: Window) -> Vec<T> {
    let offset = usize::try_from(window.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(window.limit).unwrap_or(0);
    items.into_iter().skip(offset).take(limit).collect()
}

#[async_trait]
impl ResourceStore<Service> for MemoryStore {
    async fn find_by_id(&self, id: i64, preload: bool) -> StoreResult<Service> {
        let state = self.state.read().await;
        state
            .services
            .get(&id)
            .map(|s| state.service_with(s, preload))
            .ok_or_else(|| StoreError::NotFound("Service".into()))
    }

    async fn find_by_unique_field(&self, value: &str, preload: bool) -> StoreResult<Service> {
        let state = self.state.read().await;
        state
            .services
            .values()
            .find(|s| s.service_name == value)
            .map(|s| state.service_with(s, preload))
            .ok_or_else(|| StoreError::NotFound("Service".into()))
    }

    async fn find_many(
        &self,
        filter: &Filter,
        sort: Sort<ServiceSortField>,
        window: Window,
        preload: bool,
    ) -> StoreResult<Vec<Service>> {
        let state = self.state.read().await;
        let mut matching: Vec<&Service> = state
            .services
            .values()
            .filter(|s| filter.matches(&s.service_name))
            .collect();

        matching.sort_by(|a, b| {
            ordered(
                *a,
                *b,
                sort.order,
                |x, y| match sort.field {
                    ServiceSortField::Id => x.id.cmp(&y.id),
                    ServiceSortField::ServiceName => x.service_name.cmp(&y.service_name),
                    ServiceSortField::CreatedAt => x.created_at.cmp(&y.created_at),
                },
                |s| s.id,
            )
        });

        Ok(window_of(matching, window)
            .into_iter()
            .map(|s| state.service_with(s, preload))
            .collect())
    }

    async fn count(&self, filter: &Filter) -> StoreResult<i64> {
        let state = self.state.read().await;
        Ok(state
            .services
            .values()
            .filter(|s| filter.matches(&s.service_name))
            .count() as i64)
    }
}

#[async_trait]
impl ServiceRepository for MemoryStore {
    async fn create_service(&self, dto: &CreateServiceDto) -> StoreResult<Service> {
        let mut state = self.state.write().await;
        if state.service_name_taken(&dto.service_name, None) {
            return Err(StoreError::Conflict(
                "Service with this name already exists".into(),
            ));
        }

        let now = Utc::now();
        let service = Service {
            id: state.service_ids.next(),
            service_name: dto.service_name.clone(),
            service_description: dto.service_description.clone(),
            created_at: now,
            updated_at: now,
            service_versions: None,
        };
        state.services.insert(service.id, service.clone());
        Ok(service)
    }

    async fn update_service(&self, id: i64, dto: &UpdateServiceDto) -> StoreResult<Service> {
        let mut state = self.state.write().await;
        if !state.services.contains_key(&id) {
            return Err(StoreError::NotFound("Service".into()));
        }
        if state.service_name_taken(&dto.service_name, Some(id)) {
            return Err(StoreError::Conflict(
                "Service with this name already exists".into(),
            ));
        }

        let service = state
            .services
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("Service".into()))?;
        service.service_name = dto.service_name.clone();
        service.service_description = dto.service_description.clone();
        service.updated_at = Utc::now();
        Ok(service.clone())
    }

    async fn delete_service(&self, id: i64) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state
            .services
            .remove(&id)
            .ok_or_else(|| StoreError::NotFound("Service".into()))?;
        state.versions.retain(|_, v| v.service_id != id);
        Ok(())
    }

    async fn create_version(
        &self,
        service_id: i64,
        dto: &CreateServiceVersionDto,
    ) -> StoreResult<ServiceVersion> {
        let mut state = self.state.write().await;
        if !state.services.contains_key(&service_id) {
            return Err(StoreError::NotFound("Service".into()));
        }
        if state.version_name_taken(service_id, &dto.service_version_name, None) {
            return Err(StoreError::Conflict(
                "Service version with this name already exists for the service".into(),
            ));
        }

        let now = Utc::now();
        let version = ServiceVersion {
            id: state.version_ids.next(),
            service_id,
            service_version_name: dto.service_version_name.clone(),
            service_version_url: dto.service_version_url.clone(),
            service_version_description: dto.service_version_description.clone(),
            created_at: now,
            updated_at: now,
        };
        state.versions.insert(version.id, version.clone());
        Ok(version)
    }

    async fn update_version(
        &self,
        id: i64,
        dto: &UpdateServiceVersionDto,
    ) -> StoreResult<ServiceVersion> {
        let mut state = self.state.write().await;
        let service_id = state
            .versions
            .get(&id)
            .map(|v| v.service_id)
            .ok_or_else(|| StoreError::NotFound("Service version".into()))?;
        if state.version_name_taken(service_id, &dto.service_version_name, Some(id)) {
            return Err(StoreError::Conflict(
                "Service version with this name already exists for the service".into(),
            ));
        }

        let version = state
            .versions
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("Service version".into()))?;
        version.service_version_name = dto.service_version_name.clone();
        version.service_version_url = dto.service_version_url.clone();
        version.service_version_description = dto.service_version_description.clone();
        version.updated_at = Utc::now();
        Ok(version.clone())
    }

    async fn delete_version(&self, id: i64) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state
            .versions
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound("Service version".into()))
    }
}

#[async_trait]
impl ResourceStore<User> for MemoryStore {
    async fn find_by_id(&self, id: i64, preload: bool) -> StoreResult<User> {
        let state = self.state.read().await;
        state
            .users
            .get(&id)
            .map(|u| state.user_with(u, preload))
            .ok_or_else(|| StoreError::NotFound("User".into()))
    }

    async fn find_by_unique_field(&self, value: &str, preload: bool) -> StoreResult<User> {
        let state = self.state.read().await;
        state
            .users
            .values()
            .find(|u| u.user.username == value)
            .map(|u| state.user_with(u, preload))
            .ok_or_else(|| StoreError::NotFound("User".into()))
    }

    async fn find_many(
        &self,
        filter: &Filter,
        sort: Sort<UserSortField>,
        window: Window,
        preload: bool,
    ) -> StoreResult<Vec<User>> {
        let state = self.state.read().await;
        let mut matching: Vec<&StoredUser> = state
            .users
            .values()
            .filter(|u| filter.matches(&u.user.username))
            .collect();

        matching.sort_by(|a, b| {
            ordered(
                *a,
                *b,
                sort.order,
                |x, y| match sort.field {
                    UserSortField::Id => x.user.id.cmp(&y.user.id),
                    UserSortField::Username => x.user.username.cmp(&y.user.username),
                    UserSortField::CreatedAt => x.user.created_at.cmp(&y.user.created_at),
                },
                |u| u.user.id,
            )
        });

        Ok(window_of(matching, window)
            .into_iter()
            .map(|u| state.user_with(u, preload))
            .collect())
    }

    async fn count(&self, filter: &Filter) -> StoreResult<i64> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .filter(|u| filter.matches(&u.user.username))
            .count() as i64)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut state = self.state.write().await;
        if state.username_taken(&user.username, None) {
            return Err(StoreError::Conflict(
                "User with this username already exists".into(),
            ));
        }

        let now = Utc::now();
        let mut created = User {
            id: state.user_ids.next(),
            username: user.username,
            role: user.role,
            created_at: now,
            updated_at: now,
            user_profile: None,
        };
        state.users.insert(
            created.id,
            StoredUser {
                user: created.clone(),
                password_hash: user.password_hash,
            },
        );
        if let Some(profile) = &user.profile {
            created.user_profile = Some(state.upsert_profile(created.id, profile));
        }
        Ok(created)
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<User> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&id) {
            return Err(StoreError::NotFound("User".into()));
        }
        if let Some(username) = &changes.username
            && state.username_taken(username, Some(id))
        {
            return Err(StoreError::Conflict(
                "User with this username already exists".into(),
            ));
        }

        let stored = state
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("User".into()))?;
        if let Some(username) = changes.username {
            stored.user.username = username;
        }
        if let Some(role) = changes.role {
            stored.user.role = role;
        }
        if let Some(password_hash) = changes.password_hash {
            stored.password_hash = password_hash;
        }
        stored.user.updated_at = Utc::now();

        let mut updated = stored.user.clone();
        if let Some(profile) = &changes.profile {
            updated.user_profile = Some(state.upsert_profile(id, profile));
        }
        Ok(updated)
    }

    async fn delete_user(&self, id: i64) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state
            .users
            .remove(&id)
            .ok_or_else(|| StoreError::NotFound("User".into()))?;
        state.profiles.retain(|_, p| p.user_id != id);
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_credential(&self, username: &str) -> anyhow::Result<Option<Credential>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.user.username == username)
            .map(|u| Credential {
                username: u.user.username.clone(),
                password_hash: u.password_hash.clone(),
                role: u.user.role.clone(),
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{Fetched, execute};
    use dashboard_core::plan;
    use std::collections::HashMap;

    fn service_dto(name: &str) -> CreateServiceDto {
        CreateServiceDto {
            service_name: name.to_string(),
            service_description: format!("{name} Description"),
        }
    }

    async fn store_with_services(names: &[&str]) -> MemoryStore {
        let store = MemoryStore::new();
        for name in names {
            store.create_service(&service_dto(name)).await.unwrap();
        }
        store
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    async fn page_names(store: &MemoryStore, pairs: &[(&str, &str)]) -> (Vec<String>, i64) {
        let fetch = plan::<Service>(&params(pairs)).unwrap();
        match execute::<Service, _>(store, fetch).await.unwrap() {
            Fetched::Many(page) => (
                page.data.into_iter().map(|s| s.service_name).collect(),
                page.meta.total,
            ),
            Fetched::One(service) => panic!("expected a page, got {service:?}"),
        }
    }

    #[tokio::test]
    async fn test_pages_are_disjoint_and_ordered() {
        let store = store_with_services(&["Service 1", "Service 2"]).await;

        let (first, _) = page_names(&store, &[("page", "1"), ("limit", "1")]).await;
        let (second, _) = page_names(&store, &[("page", "2"), ("limit", "1")]).await;

        assert_eq!(first, vec!["Service 1"]);
        assert_eq!(second, vec!["Service 2"]);
    }

    #[tokio::test]
    async fn test_search_is_paginated_and_counts_matches_only() {
        let store = store_with_services(&["alpha", "api-one", "api-two", "api-three", "beta"]).await;

        let (names, total) = page_names(
            &store,
            &[("search_mode", "true"), ("name", "api"), ("page", "2"), ("limit", "2")],
        )
        .await;

        assert_eq!(total, 3);
        assert_eq!(names, vec!["api-three"]);
    }

    #[tokio::test]
    async fn test_search_without_matches_is_empty_page() {
        let store = store_with_services(&["Service 1", "Service 2"]).await;
        let (names, total) = page_names(&store, &[("search_mode", "true"), ("name", "3")]).await;
        assert!(names.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_sort_by_name_desc() {
        let store = store_with_services(&["b", "c", "a"]).await;
        let (names, _) =
            page_names(&store, &[("sort_by", "service_name"), ("order", "desc")]).await;
        assert_eq!(names, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_single_lookup_miss_is_not_found() {
        let store = store_with_services(&["Service 1"]).await;
        let fetch = plan::<Service>(&params(&[("name", "Service 3")])).unwrap();
        let result = execute::<Service, _>(&store, fetch).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_versions_loaded_on_request_and_cascade_on_delete() {
        let store = store_with_services(&["Service 1"]).await;
        let service = ResourceStore::<Service>::find_by_unique_field(&store, "Service 1", false)
            .await
            .unwrap();
        store
            .create_version(
                service.id,
                &CreateServiceVersionDto {
                    service_id: Some(service.id),
                    service_version_name: "v1".into(),
                    service_version_url: "http://service1.com".into(),
                    service_version_description: String::new(),
                },
            )
            .await
            .unwrap();

        let plain = ResourceStore::<Service>::find_by_id(&store, service.id, false)
            .await
            .unwrap();
        assert!(plain.service_versions.is_none());

        let loaded = ResourceStore::<Service>::find_by_id(&store, service.id, true)
            .await
            .unwrap();
        assert_eq!(loaded.service_versions.unwrap().len(), 1);

        store.delete_service(service.id).await.unwrap();
        assert!(store.state.read().await.versions.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_names_conflict() {
        let store = store_with_services(&["Service 1"]).await;
        let result = store.create_service(&service_dto("Service 1")).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_version_for_unknown_service_is_not_found() {
        let store = MemoryStore::new();
        let result = store
            .create_version(
                99,
                &CreateServiceVersionDto {
                    service_id: Some(99),
                    service_version_name: "v1".into(),
                    service_version_url: String::new(),
                    service_version_description: String::new(),
                },
            )
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_user_update_is_partial_and_credentials_follow() {
        let store = MemoryStore::new();
        let user = store
            .create_user(NewUser {
                username: "user3".into(),
                password_hash: "hash-1".into(),
                role: "user".into(),
                profile: None,
            })
            .await
            .unwrap();

        let updated = store
            .update_user(
                user.id,
                UserChanges {
                    role: Some("admin".into()),
                    password_hash: Some("hash-2".into()),
                    ..UserChanges::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.username, "user3");
        assert_eq!(updated.role, "admin");

        let credential = store.find_credential("user3").await.unwrap().unwrap();
        assert_eq!(credential.password_hash, "hash-2");
        assert_eq!(credential.role, "admin");
    }
}
