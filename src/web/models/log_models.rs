use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::entities::{daily_log, log_entry};
use crate::db::enums::ActivityKind;

/// Body of `POST /api/logs` and `PUT /api/logs/{id}`.
///
/// Hour totals are not part of the payload; they follow the entries.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyLogPayload {
    pub trip: i32,
    pub date: NaiveDate,
    pub pickup_location: String,
    pub dropoff_location: String,
    #[serde(default)]
    pub total_miles_driven: f64,
    #[serde(default)]
    pub total_mileage_today: f64,
    pub trailer_or_plate: Option<String>,
    pub carrier_name: Option<String>,
    pub main_office_address: Option<String>,
    pub home_terminal_address: Option<String>,
    pub manifest_number: Option<String>,
    pub shipper_and_commodity: Option<String>,
    pub remarks: Option<String>,
}

/// A daily log together with its entries, as returned by the log routes.
#[derive(Debug, Serialize)]
pub struct DailyLogResponse {
    #[serde(flatten)]
    pub log: daily_log::Model,
    pub entries: Vec<log_entry::Model>,
}

impl From<(daily_log::Model, Vec<log_entry::Model>)> for DailyLogResponse {
    fn from((log, entries): (daily_log::Model, Vec<log_entry::Model>)) -> Self {
        DailyLogResponse { log, entries }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogEntryPayload {
    pub daily_log: i32,
    pub activity_type: ActivityKind,
    pub start_hour: i16,
    pub end_hour: i16,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub location_name: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DailyLogFilter {
    pub trip: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogEntryFilter {
    pub daily_log: Option<i32>,
}
