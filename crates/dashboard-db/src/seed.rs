//! Baseline records loaded at startup.
//!
//! Seeding is idempotent: records that already exist by name are left alone.

use tracing::{debug, info, instrument};

use dashboard_models::{
    CreateServiceDto, CreateServiceVersionDto, NewUser, Service, User, UserProfileDto,
};

use crate::error::{StoreError, StoreResult};
use crate::store::{ResourceStore, ServiceRepository, UserRepository};

struct SeedService {
    name: &'static str,
    description: &'static str,
    versions: &'static [(&'static str, &'static str, &'static str)],
}

const SERVICES: &[SeedService] = &[
    SeedService {
        name: "Service 1",
        description: "Service 1 Description",
        versions: &[(
            "Service 1 Version 1",
            "http://service1.com",
            "Service 1 Version 1 Description",
        )],
    },
    SeedService {
        name: "Service 2",
        description: "Service 2 Description",
        versions: &[],
    },
];

/// Seeds two services and two users (`user1` admin, `user2` user).
///
/// Both users get `password_hash`, which callers derive from the baseline
/// password.
#[instrument(skip_all)]
pub async fn seed_baseline<S>(store: &S, password_hash: &str) -> StoreResult<()>
where
    S: ServiceRepository + UserRepository + ?Sized,
{
    for seed in SERVICES {
        seed_service(store, seed).await?;
    }

    seed_user(
        store,
        NewUser {
            username: "user1".into(),
            password_hash: password_hash.to_string(),
            role: "admin".into(),
            profile: Some(UserProfileDto {
                first_name: "User".into(),
                last_name: "One".into(),
                email: "abc@gmail.com".into(),
            }),
        },
    )
    .await?;
    seed_user(
        store,
        NewUser {
            username: "user2".into(),
            password_hash: password_hash.to_string(),
            role: "user".into(),
            profile: None,
        },
    )
    .await?;

    info!("Baseline data seeded");
    Ok(())
}

async fn seed_service<S>(store: &S, seed: &SeedService) -> StoreResult<()>
where
    S: ServiceRepository + ?Sized,
{
    match ResourceStore::<Service>::find_by_unique_field(store, seed.name, false).await {
        Ok(_) => {
            debug!(service = seed.name, "Service already present");
            return Ok(());
        }
        Err(StoreError::NotFound(_)) => {}
        Err(e) => return Err(e),
    }

    let service = store
        .create_service(&CreateServiceDto {
            service_name: seed.name.to_string(),
            service_description: seed.description.to_string(),
        })
        .await?;

    for (name, url, description) in seed.versions {
        store
            .create_version(
                service.id,
                &CreateServiceVersionDto {
                    service_id: Some(service.id),
                    service_version_name: name.to_string(),
                    service_version_url: url.to_string(),
                    service_version_description: description.to_string(),
                },
            )
            .await?;
    }
    Ok(())
}

async fn seed_user<S>(store: &S, user: NewUser) -> StoreResult<()>
where
    S: UserRepository + ?Sized,
{
    match ResourceStore::<User>::find_by_unique_field(store, &user.username, false).await {
        Ok(_) => {
            debug!(username = %user.username, "User already present");
            Ok(())
        }
        Err(StoreError::NotFound(_)) => store.create_user(user).await.map(|_| ()),
        Err(e) => Err(e),
    }
}
