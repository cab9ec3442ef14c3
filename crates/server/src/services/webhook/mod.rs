pub mod messages;
pub mod webhook_service;
