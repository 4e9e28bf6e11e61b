// src/repository/mod.rs
pub mod personal_access_token_repository;
pub mod subscription_repository;
pub mod user_repository;

pub use personal_access_token_repository::PersonalAccessTokenRepository;
pub use subscription_repository::SubscriptionRepository;
pub use user_repository::UserRepository;
