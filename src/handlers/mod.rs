// src/handlers/mod.rs
pub mod notification_handler;
pub mod provider_handler;
