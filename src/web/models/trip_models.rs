use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::db::enums::TripStatus;

/// Body of `POST /api/trips` and `PUT /api/trips/{id}`. The owner is always the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct TripPayload {
    pub pickup_location: String,
    pub pickup_latitude: Option<f64>,
    pub pickup_longitude: Option<f64>,
    pub dropoff_location: String,
    pub dropoff_latitude: Option<f64>,
    pub dropoff_longitude: Option<f64>,
    pub current_location: Option<String>,
    pub current_cycle_used: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_miles: f64,
    #[serde(default)]
    pub status: TripStatus,
}
