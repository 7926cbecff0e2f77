use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Schema};
use tracing::info;

use crate::db::entities::{daily_log, log_entry, trip, user};

/// Creates the logbook tables from the entity definitions when they are missing.
///
/// Parents are created before children so the foreign keys resolve.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut statements = vec![
        schema.create_table_from_entity(user::Entity),
        schema.create_table_from_entity(trip::Entity),
        schema.create_table_from_entity(daily_log::Entity),
        schema.create_table_from_entity(log_entry::Entity),
    ];

    for statement in statements.iter_mut() {
        statement.if_not_exists();
        db.execute(backend.build(&*statement)).await?;
    }

    info!(tables = statements.len(), "Database schema is up to date.");
    Ok(())
}
