pub mod daily_log_routes;
pub mod log_entry_routes;
pub mod trip_routes;
pub mod user_routes;
