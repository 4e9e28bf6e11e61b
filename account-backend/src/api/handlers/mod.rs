pub mod auth_handler;
pub mod subscription_handler;
pub mod system_handler;
pub mod user_handler;
