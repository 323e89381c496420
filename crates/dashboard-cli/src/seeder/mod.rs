//! Database seeding.
//!
//! A full run loads the baseline records first (the two demo services and
//! `user1`/`user2`), then adds generated services, versions and users.

mod models;
mod services;
mod users;

use std::time::Instant;

use dashboard_db::{ServiceRepository, StoreResult, UserRepository, seed_baseline};

pub use models::{SeedConfig, SeedReport, ServiceSeed, UserSeed, VersionSeed};
pub use services::{generate_services, insert_services};
pub use users::{SEEDED_ROLE, generate_users, insert_users};

/// Seeds baseline data plus everything `config` asks for.
///
/// `password_hash` is used for the baseline accounts and every generated user.
pub async fn seed_all<S>(
    store: &S,
    config: &SeedConfig,
    password_hash: &str,
) -> StoreResult<SeedReport>
where
    S: ServiceRepository + UserRepository + ?Sized,
{
    let start_time = Instant::now();
    println!("🌱 Seeding baseline records...");
    seed_baseline(store, password_hash).await?;

    println!(
        "📦 Seeding {} services with {} versions each...",
        config.services, config.versions_per_service
    );
    let services = generate_services(config.services, config.versions_per_service);
    let catalog = insert_services(store, &services).await?;

    println!("👥 Seeding {} users...", config.users);
    let users = generate_users(config.users);
    let directory = insert_users(store, &users, password_hash).await?;

    let report = SeedReport {
        services: catalog.services,
        versions: catalog.versions,
        users: directory.users,
        skipped: catalog.skipped + directory.skipped,
    };
    println!(
        "   ✓ {} services, {} versions, {} users ({} skipped) in {:?}",
        report.services,
        report.versions,
        report.users,
        report.skipped,
        start_time.elapsed()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use dashboard_core::plan;
    use dashboard_db::{Fetched, MemoryStore, execute};
    use dashboard_models::{Service, User};

    use super::*;

    fn hash() -> String {
        bcrypt::hash("password", 4).unwrap()
    }

    async fn total<R, S>(store: &S) -> i64
    where
        R: dashboard_core::Listable + Send + Sync + 'static,
        S: dashboard_db::ResourceStore<R> + ?Sized,
    {
        let fetch = plan::<R>(&HashMap::new()).unwrap();
        match execute::<R, S>(store, fetch).await.unwrap() {
            Fetched::Many(page) => page.meta.total,
            Fetched::One(_) => panic!("listing returned a single record"),
        }
    }

    #[tokio::test]
    async fn test_seed_all_counts() {
        let store = MemoryStore::new();
        let config = SeedConfig::new(5).with_versions(2).with_users(3);

        let report = seed_all(&store, &config, &hash()).await.unwrap();

        assert_eq!(report.services, 5);
        assert_eq!(report.versions, 10);
        assert_eq!(report.users, 3);
        assert_eq!(report.skipped, 0);
        assert_eq!(total::<Service, _>(&store).await, 7);
        assert_eq!(total::<User, _>(&store).await, 5);
    }

    #[tokio::test]
    async fn test_reseeding_skips_taken_names() {
        let store = MemoryStore::new();
        let seeds = generate_services(2, 0);

        let first = insert_services(&store, &seeds).await.unwrap();
        let second = insert_services(&store, &seeds).await.unwrap();

        assert_eq!(first.services, 2);
        assert_eq!(second.services, 0);
        assert_eq!(second.skipped, 2);
    }

    #[tokio::test]
    async fn test_generated_users_get_seeded_role() {
        let store = MemoryStore::new();
        let seeds = generate_users(1);

        insert_users(&store, &seeds, &hash()).await.unwrap();

        let params = HashMap::from([
            ("username".to_string(), seeds[0].username.clone()),
            ("load_profile".to_string(), "true".to_string()),
        ]);
        let fetch = plan::<User>(&params).unwrap();
        match execute::<User, _>(&store, fetch).await.unwrap() {
            Fetched::One(user) => {
                assert_eq!(user.role, SEEDED_ROLE);
                assert_eq!(user.user_profile.unwrap().email, seeds[0].email);
            }
            Fetched::Many(_) => panic!("lookup returned a page"),
        }
    }
}
