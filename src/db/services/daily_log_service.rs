use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, FromQueryResult, LoaderTrait, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::{info, warn};

use super::TripLogError;
use crate::db::entities::{
    daily_log, log_entry,
    prelude::{DailyLog, LogEntry, Trip, User},
};
use crate::db::enums::ActivityKind;
use crate::report::{LogSheet, SheetEntry};
use crate::web::models::log_models::DailyLogPayload;

/// Entry row read for the log sheet. The activity stays a raw string so rows
/// written outside the API with an unknown value can be skipped instead of
/// failing the whole load.
#[derive(Debug, FromQueryResult)]
struct RawSheetEntry {
    activity_type: String,
    start_hour: i16,
    end_hour: i16,
}

pub struct DailyLogService;

impl DailyLogService {
    pub async fn create_log(
        db: &DbConn,
        payload: DailyLogPayload,
    ) -> Result<daily_log::Model, TripLogError> {
        Self::validate(db, &payload).await?;

        let new_log = Self::apply_payload(<daily_log::ActiveModel as Default>::default(), payload);
        let log = daily_log::ActiveModel {
            total_driving_hours: Set(Default::default()),
            total_on_duty_hours: Set(Default::default()),
            total_off_duty_hours: Set(Default::default()),
            total_sleeper_hours: Set(Default::default()),
            ..new_log
        }
        .insert(db)
        .await?;

        info!(log_id = log.id, trip_id = log.trip_id, date = %log.date, "Daily log created.");
        Ok(log)
    }

    /// Logs newest first, each with its entries ordered by start hour.
    pub async fn list_logs_with_entries(
        db: &DbConn,
        trip_id: Option<i32>,
    ) -> Result<Vec<(daily_log::Model, Vec<log_entry::Model>)>, TripLogError> {
        let mut query = DailyLog::find();
        if let Some(trip_id) = trip_id {
            query = query.filter(daily_log::Column::TripId.eq(trip_id));
        }
        let logs = query
            .order_by_desc(daily_log::Column::Date)
            .order_by_asc(daily_log::Column::Id)
            .all(db)
            .await?;

        let entries = logs.load_many(LogEntry, db).await?;
        Ok(logs
            .into_iter()
            .zip(entries)
            .map(|(log, mut entries)| {
                entries.sort_by_key(|e| (e.start_hour, e.id));
                (log, entries)
            })
            .collect())
    }

    pub async fn get_log(db: &DbConn, log_id: i32) -> Result<daily_log::Model, TripLogError> {
        DailyLog::find_by_id(log_id)
            .one(db)
            .await?
            .ok_or(TripLogError::NotFound("Log"))
    }

    pub async fn get_log_with_entries(
        db: &DbConn,
        log_id: i32,
    ) -> Result<(daily_log::Model, Vec<log_entry::Model>), TripLogError> {
        let log = Self::get_log(db, log_id).await?;
        let entries = log
            .find_related(LogEntry)
            .order_by_asc(log_entry::Column::StartHour)
            .order_by_asc(log_entry::Column::Id)
            .all(db)
            .await?;
        Ok((log, entries))
    }

    /// Updates the descriptive columns. The hour totals are left as they are.
    pub async fn update_log(
        db: &DbConn,
        log_id: i32,
        payload: DailyLogPayload,
    ) -> Result<daily_log::Model, TripLogError> {
        let existing = Self::get_log(db, log_id).await?;
        Self::validate(db, &payload).await?;

        let active_log = Self::apply_payload(existing.into(), payload);
        let log = active_log.update(db).await?;
        info!(log_id = log.id, "Daily log updated.");
        Ok(log)
    }

    pub async fn delete_log(db: &DbConn, log_id: i32) -> Result<(), TripLogError> {
        let existing = Self::get_log(db, log_id).await?;
        existing.delete(db).await?;
        info!(log_id, "Daily log deleted with its entries.");
        Ok(())
    }

    /// Loads everything the log sheet needs: the log, the trip owner's name
    /// and the entries ordered by start hour.
    pub async fn load_log_sheet(db: &DbConn, log_id: i32) -> Result<LogSheet, TripLogError> {
        let log = Self::get_log(db, log_id).await?;

        let driver = match Trip::find_by_id(log.trip_id).one(db).await? {
            Some(trip) => User::find_by_id(trip.user_id).one(db).await?,
            None => None,
        };
        let driver_name = driver.map(|u| u.full_name()).unwrap_or_default();

        let rows = LogEntry::find()
            .select_only()
            .column(log_entry::Column::ActivityType)
            .column(log_entry::Column::StartHour)
            .column(log_entry::Column::EndHour)
            .filter(log_entry::Column::DailyLogId.eq(log_id))
            .order_by_asc(log_entry::Column::StartHour)
            .order_by_asc(log_entry::Column::Id)
            .into_model::<RawSheetEntry>()
            .all(db)
            .await?;

        let entries = rows
            .into_iter()
            .filter_map(|row| match ActivityKind::from_db_str(&row.activity_type) {
                Some(activity) => Some(SheetEntry {
                    activity,
                    start_hour: row.start_hour,
                    end_hour: row.end_hour,
                }),
                None => {
                    warn!(log_id, activity_type = %row.activity_type, "Skipping entry with unknown activity type.");
                    None
                }
            })
            .collect();

        Ok(LogSheet {
            log,
            driver_name,
            entries,
        })
    }

    async fn validate(db: &DbConn, payload: &DailyLogPayload) -> Result<(), TripLogError> {
        if payload.pickup_location.trim().is_empty() || payload.dropoff_location.trim().is_empty() {
            return Err(TripLogError::Validation(
                "Pickup and dropoff locations are required.".to_string(),
            ));
        }
        if payload.total_miles_driven < 0.0 || payload.total_mileage_today < 0.0 {
            return Err(TripLogError::Validation("Mileage cannot be negative.".to_string()));
        }
        if Trip::find_by_id(payload.trip).one(db).await?.is_none() {
            return Err(TripLogError::Validation(format!(
                "Invalid pk \"{}\" - trip does not exist.",
                payload.trip
            )));
        }
        Ok(())
    }

    fn apply_payload(
        mut active_log: daily_log::ActiveModel,
        payload: DailyLogPayload,
    ) -> daily_log::ActiveModel {
        active_log.trip_id = Set(payload.trip);
        active_log.date = Set(payload.date);
        active_log.pickup_location = Set(payload.pickup_location);
        active_log.dropoff_location = Set(payload.dropoff_location);
        active_log.total_miles_driven = Set(payload.total_miles_driven);
        active_log.total_mileage_today = Set(payload.total_mileage_today);
        active_log.trailer_or_plate = Set(payload.trailer_or_plate);
        active_log.carrier_name = Set(payload.carrier_name);
        active_log.main_office_address = Set(payload.main_office_address);
        active_log.home_terminal_address = Set(payload.home_terminal_address);
        active_log.manifest_number = Set(payload.manifest_number);
        active_log.shipper_and_commodity = Set(payload.shipper_and_commodity);
        active_log.remarks = Set(payload.remarks);
        active_log
    }
}
