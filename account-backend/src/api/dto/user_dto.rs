// src/api/dto/user_dto.rs

use crate::domain::user_model::SafeUser;
use crate::utils::validation::{trimmed_option, validate_not_blank};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// プロフィール更新リクエスト（指定されたフィールドのみ更新）
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateProfileRequest {
    #[validate(
        length(min = 1, max = 255, message = "The name must be between 1 and 255 characters."),
        custom(function = validate_not_blank)
    )]
    pub name: Option<String>,

    #[serde(deserialize_with = "trimmed_option")]
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: Option<String>,
}

/// プロフィールレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfileResponse {
    pub user: SafeUser,
    pub subscribed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_email_is_trimmed() {
        let request: UpdateProfileRequest =
            serde_json::from_str(r#"{"email":" alice@example.com "}"#).unwrap();
        assert_eq!(request.email.as_deref(), Some("alice@example.com"));
        assert!(request.validate().is_ok());

        let request: UpdateProfileRequest = serde_json::from_str(r#"{"name":"Alice"}"#).unwrap();
        assert!(request.email.is_none());

        let request: UpdateProfileRequest = serde_json::from_str(r#"{"email":null}"#).unwrap();
        assert!(request.email.is_none());
    }
}
