// src/domain/mod.rs
pub mod personal_access_token_model;
pub mod subscription_model;
pub mod user_model;
