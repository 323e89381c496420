use std::collections::HashMap;

use tracing::{info, instrument};

use dashboard_core::{AppError, hash_password, plan};
use dashboard_db::{Fetched, ResourceStore, UserRepository, execute};
use dashboard_models::{CreateUserDto, NewUser, UpdateUserDto, User, UserChanges};

use crate::modules::lookup::{Target, delete_target, required_id};

pub struct UserService;

impl UserService {
    #[instrument(skip(store))]
    pub async fn get_users(
        store: &dyn UserRepository,
        params: &HashMap<String, String>,
    ) -> Result<Fetched<User>, AppError> {
        let fetch = plan::<User>(params)?;
        Ok(execute::<User, _>(store, fetch).await?)
    }

    #[instrument(skip(store, dto), fields(username = %dto.username))]
    pub async fn create_user(
        store: &dyn UserRepository,
        dto: CreateUserDto,
    ) -> Result<User, AppError> {
        let user = store
            .create_user(NewUser {
                password_hash: hash_password(&dto.password)?,
                username: dto.username,
                role: dto.role,
                profile: dto.user_profile,
            })
            .await?;
        info!(user_id = user.id, "User created");
        Ok(user)
    }

    /// Applies only the fields present in `dto`.
    #[instrument(skip(store, dto), fields(user_id = ?dto.id))]
    pub async fn update_user(
        store: &dyn UserRepository,
        dto: UpdateUserDto,
    ) -> Result<User, AppError> {
        let id = required_id(dto.id)?;
        let password_hash = dto.password.as_deref().map(hash_password).transpose()?;

        let user = store
            .update_user(
                id,
                UserChanges {
                    username: dto.username,
                    password_hash,
                    role: dto.role,
                    profile: dto.user_profile,
                },
            )
            .await?;
        Ok(user)
    }

    #[instrument(skip(store))]
    pub async fn delete_user(
        store: &dyn UserRepository,
        params: &HashMap<String, String>,
    ) -> Result<(), AppError> {
        let id = match delete_target(params, "username")? {
            Target::Id(id) => id,
            Target::Name(username) => {
                ResourceStore::<User>::find_by_unique_field(store, &username, false)
                    .await?
                    .id
            }
        };
        store.delete_user(id).await?;
        info!(user_id = id, "User deleted");
        Ok(())
    }
}
