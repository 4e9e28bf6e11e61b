// src/service/user_service.rs
use crate::api::dto::user_dto::UpdateProfileRequest;
use crate::domain::user_model;
use crate::error::{AppError, AppResult};
use crate::repository::user_repository::{UpdateUser, UserRepository};
use crate::service::auth_service::normalize_email;
use std::sync::Arc;
use tracing::info;

pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    /// プロフィールを更新して更新後のユーザーを返す
    pub async fn update_profile(
        &self,
        user: &user_model::Model,
        request: UpdateProfileRequest,
    ) -> AppResult<user_model::Model> {
        let email = request.email.as_deref().map(normalize_email);

        if let Some(email) = &email {
            if *email != user.email && self.user_repo.email_exists(email, Some(user.id)).await? {
                return Err(AppError::field(
                    "email",
                    "The email has already been taken.",
                ));
            }
        }

        let updated = self
            .user_repo
            .update(
                user,
                UpdateUser {
                    name: request.name.map(|name| name.trim().to_string()),
                    email,
                },
            )
            .await?;

        info!(user_id = %user.id, "User profile updated");
        Ok(updated)
    }
}
