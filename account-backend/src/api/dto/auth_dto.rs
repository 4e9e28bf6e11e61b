// src/api/dto/auth_dto.rs

use crate::domain::user_model::SafeUser;
use crate::utils::validation::{trimmed, validate_not_blank};
use serde::{Deserialize, Serialize};
use validator::Validate;

// --- リクエストDTO ---

/// ユーザー登録リクエスト
///
/// 空のボディでもバリデーションエラー（422）になるよう、全フィールドに既定値を持たせる
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, max = 255, message = "The name field is required."),
        custom(function = validate_not_blank)
    )]
    pub name: String,

    #[serde(deserialize_with = "trimmed")]
    #[validate(
        length(min = 1, message = "The email field is required."),
        email(message = "The email must be a valid email address.")
    )]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "The password must be at least 8 characters."))]
    pub password: String,

    #[validate(must_match(
        other = "password",
        message = "The password confirmation does not match."
    ))]
    pub password_confirmation: String,

    /// 発行するトークンの名前
    #[validate(length(max = 255))]
    pub device_name: Option<String>,
}

/// ログインリクエスト
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(
        length(min = 1, message = "The email field is required."),
        email(message = "The email must be a valid email address.")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "The password field is required."))]
    pub password: String,

    #[validate(length(max = 255))]
    pub device_name: Option<String>,
}

// --- レスポンスDTO ---

/// 認証レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: SafeUser,
    /// `{id}|{secret}` 形式の平文トークン。この時だけ返却される
    pub token: String,
    pub token_type: String,
}

impl AuthResponse {
    pub fn bearer(user: SafeUser, token: String) -> Self {
        Self {
            user,
            token,
            token_type: "Bearer".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_register_request_fails_validation() {
        let request: RegisterRequest = serde_json::from_str("{}").unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_password_confirmation_must_match() {
        let request = RegisterRequest {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password: "password123".to_string(),
            password_confirmation: "password124".to_string(),
            device_name: None,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password_confirmation"));
    }

    #[test]
    fn test_email_is_trimmed_before_validation() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"email":"  Jane@Example.com ","password":"x"}"#).unwrap();
        assert_eq!(request.email, "Jane@Example.com");
        assert!(request.validate().is_ok());

        let request: RegisterRequest =
            serde_json::from_str(r#"{"email":"\tjane@example.com\n"}"#).unwrap();
        assert_eq!(request.email, "jane@example.com");
        assert!(!request.validate().unwrap_err().field_errors().contains_key("email"));
    }

    #[test]
    fn test_valid_login_request() {
        let request = LoginRequest {
            email: "jane@example.com".to_string(),
            password: "x".to_string(),
            device_name: None,
        };
        assert!(request.validate().is_ok());
    }
}
