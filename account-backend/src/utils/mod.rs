// src/utils/mod.rs

pub mod password;
pub mod token;
pub mod validation;
