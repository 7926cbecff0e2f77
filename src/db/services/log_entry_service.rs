use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbConn, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use super::TripLogError;
use crate::db::entities::{
    daily_log, log_entry,
    prelude::{DailyLog, LogEntry},
};
use crate::services::hours_service::{SeaOrmHoursStore, recompute_totals};
use crate::web::models::log_models::LogEntryPayload;

pub const HOURS_PER_DAY: i16 = 24;

/// Entry writes and the totals of the affected logs share one transaction.
pub struct LogEntryService;

impl LogEntryService {
    pub async fn create_entry(
        db: &DbConn,
        payload: LogEntryPayload,
    ) -> Result<log_entry::Model, TripLogError> {
        validate_hours(payload.start_hour, payload.end_hour)?;

        let txn = db.begin().await?;
        let log = Self::parent_log(&txn, payload.daily_log).await?;

        let entry = Self::apply_payload(<log_entry::ActiveModel as Default>::default(), payload)
            .insert(&txn)
            .await?;
        recompute_totals(&SeaOrmHoursStore(&txn), log).await?;
        txn.commit().await?;

        info!(
            entry_id = entry.id,
            log_id = entry.daily_log_id,
            activity = %entry.activity_type,
            hours = entry.duration_hours(),
            "Log entry created."
        );
        Ok(entry)
    }

    pub async fn list_entries(
        db: &DbConn,
        daily_log_id: Option<i32>,
    ) -> Result<Vec<log_entry::Model>, TripLogError> {
        let mut query = LogEntry::find();
        if let Some(daily_log_id) = daily_log_id {
            query = query.filter(log_entry::Column::DailyLogId.eq(daily_log_id));
        }
        Ok(query
            .order_by_asc(log_entry::Column::DailyLogId)
            .order_by_asc(log_entry::Column::StartHour)
            .all(db)
            .await?)
    }

    pub async fn get_entry(db: &DbConn, entry_id: i32) -> Result<log_entry::Model, TripLogError> {
        LogEntry::find_by_id(entry_id)
            .one(db)
            .await?
            .ok_or(TripLogError::NotFound("Entry"))
    }

    /// Moving an entry to another log recomputes both logs.
    pub async fn update_entry(
        db: &DbConn,
        entry_id: i32,
        payload: LogEntryPayload,
    ) -> Result<log_entry::Model, TripLogError> {
        validate_hours(payload.start_hour, payload.end_hour)?;

        let txn = db.begin().await?;
        let existing = LogEntry::find_by_id(entry_id)
            .one(&txn)
            .await?
            .ok_or(TripLogError::NotFound("Entry"))?;
        let previous_log_id = existing.daily_log_id;
        let log = Self::parent_log(&txn, payload.daily_log).await?;

        let entry = Self::apply_payload(existing.into(), payload)
            .update(&txn)
            .await?;

        let store = SeaOrmHoursStore(&txn);
        recompute_totals(&store, log).await?;
        if previous_log_id != entry.daily_log_id {
            if let Some(previous_log) = DailyLog::find_by_id(previous_log_id).one(&txn).await? {
                recompute_totals(&store, previous_log).await?;
            }
        }
        txn.commit().await?;

        info!(entry_id = entry.id, log_id = entry.daily_log_id, "Log entry updated.");
        Ok(entry)
    }

    pub async fn delete_entry(db: &DbConn, entry_id: i32) -> Result<(), TripLogError> {
        let txn = db.begin().await?;
        let existing = LogEntry::find_by_id(entry_id)
            .one(&txn)
            .await?
            .ok_or(TripLogError::NotFound("Entry"))?;
        let log_id = existing.daily_log_id;

        existing.delete(&txn).await?;
        if let Some(log) = DailyLog::find_by_id(log_id).one(&txn).await? {
            recompute_totals(&SeaOrmHoursStore(&txn), log).await?;
        }
        txn.commit().await?;

        info!(entry_id, log_id, "Log entry deleted.");
        Ok(())
    }

    async fn parent_log<C: ConnectionTrait>(db: &C, log_id: i32) -> Result<daily_log::Model, TripLogError> {
        DailyLog::find_by_id(log_id).one(db).await?.ok_or_else(|| {
            TripLogError::Validation(format!("Invalid pk \"{log_id}\" - daily log does not exist."))
        })
    }

    fn apply_payload(
        mut active_entry: log_entry::ActiveModel,
        payload: LogEntryPayload,
    ) -> log_entry::ActiveModel {
        active_entry.daily_log_id = Set(payload.daily_log);
        active_entry.activity_type = Set(payload.activity_type);
        active_entry.start_hour = Set(payload.start_hour);
        active_entry.end_hour = Set(payload.end_hour);
        active_entry.latitude = Set(payload.latitude);
        active_entry.longitude = Set(payload.longitude);
        active_entry.location_name = Set(payload.location_name);
        active_entry.notes = Set(payload.notes);
        active_entry
    }
}

/// Hours are whole hours of one day: `0 <= start_hour <= end_hour <= 24`.
pub fn validate_hours(start_hour: i16, end_hour: i16) -> Result<(), TripLogError> {
    let in_day = |h: i16| (0..=HOURS_PER_DAY).contains(&h);
    if !in_day(start_hour) || !in_day(end_hour) {
        return Err(TripLogError::Validation(format!(
            "Hours must be between 0 and {HOURS_PER_DAY}."
        )));
    }
    if end_hour < start_hour {
        return Err(TripLogError::Validation(
            "end_hour cannot be earlier than start_hour.".to_string(),
        ));
    }
    Ok(())
}
