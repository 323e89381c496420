//! Fake directory users.

use fake::Fake;
use fake::faker::internet::en::{SafeEmail, Username};
use fake::faker::name::en::{FirstName, LastName};

use dashboard_db::{StoreError, StoreResult, UserRepository};
use dashboard_models::{NewUser, UserProfileDto};

use super::models::{SeedReport, UserSeed};

/// Role given to every generated user.
pub const SEEDED_ROLE: &str = "user";

pub fn generate_users(count: usize) -> Vec<UserSeed> {
    (0..count)
        .map(|i| {
            let username: String = Username().fake();
            UserSeed {
                username: format!("{username}{}", i + 1),
                first_name: FirstName().fake(),
                last_name: LastName().fake(),
                email: SafeEmail().fake(),
            }
        })
        .collect()
}

/// Inserts `seeds`, all sharing `password_hash` and [`SEEDED_ROLE`].
pub async fn insert_users<S>(
    store: &S,
    seeds: &[UserSeed],
    password_hash: &str,
) -> StoreResult<SeedReport>
where
    S: UserRepository + ?Sized,
{
    let mut report = SeedReport::default();

    for seed in seeds {
        let user = NewUser {
            username: seed.username.clone(),
            password_hash: password_hash.to_string(),
            role: SEEDED_ROLE.to_string(),
            profile: Some(UserProfileDto {
                first_name: seed.first_name.clone(),
                last_name: seed.last_name.clone(),
                email: seed.email.clone(),
            }),
        };
        match store.create_user(user).await {
            Ok(_) => report.users += 1,
            Err(StoreError::Conflict(_)) => report.skipped += 1,
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}
