use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Login request.
///
/// Missing fields deserialize as empty strings and fail validation with a
/// 400 before any credential lookup.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "username is required"))]
    #[schema(example = "user1")]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    #[schema(example = "password")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_requires_both_fields() {
        let dto: LoginRequest = serde_json::from_str(r#"{"username": "user1"}"#).unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
        assert!(!errors.field_errors().contains_key("username"));

        let dto = LoginRequest {
            username: String::new(),
            password: "password".into(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_login_request_valid() {
        let dto = LoginRequest {
            username: "user1".into(),
            password: "password".into(),
        };
        assert!(dto.validate().is_ok());
    }
}
