use tracing::{info, instrument};

use dashboard_auth::issue_token;
use dashboard_config::JwtConfig;
use dashboard_core::AppError;
use dashboard_db::UserRepository;
use dashboard_models::{LoginRequest, LoginResponse};

pub struct AuthService;

impl AuthService {
    #[instrument(skip(users, dto, jwt_config), fields(username = %dto.username))]
    pub async fn login(
        users: &dyn UserRepository,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let token = issue_token(users, &dto.username, &dto.password, jwt_config).await?;
        info!("Access token issued");
        Ok(LoginResponse { token })
    }
}
