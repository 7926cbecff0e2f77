pub mod auth_service;
pub mod hours_service;
