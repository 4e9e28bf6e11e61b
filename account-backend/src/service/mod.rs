// src/service/mod.rs
pub mod auth_service;
pub mod subscription_service;
pub mod token_service;
pub mod user_service;
