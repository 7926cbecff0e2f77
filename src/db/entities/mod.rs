//! SeaORM entities for the logbook tables.
//!
//! Ownership runs user → trip → daily_log → log_entry, each link declared with
//! `on_delete = "Cascade"` so removing a parent removes its children.

pub mod daily_log;
pub mod log_entry;
pub mod trip;
pub mod user;

pub mod prelude {
    pub use super::user::Entity as User;
    pub use super::user::Model as UserModel;
    pub use super::user::ActiveModel as UserActiveModel;
    pub use super::user::Column as UserColumn;

    pub use super::trip::Entity as Trip;
    pub use super::trip::Model as TripModel;
    pub use super::trip::ActiveModel as TripActiveModel;
    pub use super::trip::Column as TripColumn;

    pub use super::daily_log::Entity as DailyLog;
    pub use super::daily_log::Model as DailyLogModel;
    pub use super::daily_log::ActiveModel as DailyLogActiveModel;
    pub use super::daily_log::Column as DailyLogColumn;

    pub use super::log_entry::Entity as LogEntry;
    pub use super::log_entry::Model as LogEntryModel;
    pub use super::log_entry::ActiveModel as LogEntryActiveModel;
    pub use super::log_entry::Column as LogEntryColumn;
}
