// src/api/dto/mod.rs
pub mod auth_dto;
pub mod subscription_dto;
pub mod user_dto;
