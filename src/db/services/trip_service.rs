use chrono::Utc;
use sea_orm::{ActiveModelTrait, DbConn, EntityTrait, ModelTrait, QueryOrder, Set};
use tracing::info;

use super::TripLogError;
use crate::db::entities::{prelude::Trip, trip};
use crate::db::enums::TripStatus;
use crate::web::models::trip_models::TripPayload;

pub struct TripService;

impl TripService {
    pub async fn create_trip(
        db: &DbConn,
        user_id: i32,
        payload: TripPayload,
    ) -> Result<trip::Model, TripLogError> {
        Self::validate(&payload)?;

        let new_trip = trip::ActiveModel {
            user_id: Set(user_id),
            ..Self::apply_payload(<trip::ActiveModel as Default>::default(), payload)
        };

        let trip = new_trip.insert(db).await?;
        info!(trip_id = trip.id, user_id, "Trip created.");
        Ok(trip)
    }

    pub async fn list_trips(db: &DbConn) -> Result<Vec<trip::Model>, TripLogError> {
        Ok(Trip::find()
            .order_by_desc(trip::Column::StartDate)
            .all(db)
            .await?)
    }

    pub async fn get_trip(db: &DbConn, trip_id: i32) -> Result<trip::Model, TripLogError> {
        Trip::find_by_id(trip_id)
            .one(db)
            .await?
            .ok_or(TripLogError::NotFound("Trip"))
    }

    pub async fn update_trip(
        db: &DbConn,
        trip_id: i32,
        payload: TripPayload,
    ) -> Result<trip::Model, TripLogError> {
        Self::validate(&payload)?;
        let existing = Self::get_trip(db, trip_id).await?;
        let active_trip = Self::apply_payload(existing.into(), payload);
        Ok(active_trip.update(db).await?)
    }

    /// Closes a trip: status becomes `completed` and `end_date` is stamped with now.
    pub async fn complete_trip(db: &DbConn, trip_id: i32) -> Result<trip::Model, TripLogError> {
        let existing = Self::get_trip(db, trip_id).await?;
        let mut active_trip: trip::ActiveModel = existing.into();
        active_trip.status = Set(TripStatus::Completed);
        active_trip.end_date = Set(Some(Utc::now()));

        let trip = active_trip.update(db).await?;
        info!(trip_id = trip.id, "Trip completed.");
        Ok(trip)
    }

    pub async fn delete_trip(db: &DbConn, trip_id: i32) -> Result<(), TripLogError> {
        let existing = Self::get_trip(db, trip_id).await?;
        existing.delete(db).await?;
        info!(trip_id, "Trip deleted with its daily logs.");
        Ok(())
    }

    fn validate(payload: &TripPayload) -> Result<(), TripLogError> {
        if payload.pickup_location.trim().is_empty() || payload.dropoff_location.trim().is_empty() {
            return Err(TripLogError::Validation(
                "Pickup and dropoff locations are required.".to_string(),
            ));
        }
        if payload.current_cycle_used.is_sign_negative() {
            return Err(TripLogError::Validation(
                "current_cycle_used cannot be negative.".to_string(),
            ));
        }
        if let Some(end_date) = payload.end_date {
            if end_date < payload.start_date {
                return Err(TripLogError::Validation(
                    "end_date cannot be earlier than start_date.".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn apply_payload(mut active_trip: trip::ActiveModel, payload: TripPayload) -> trip::ActiveModel {
        active_trip.pickup_location = Set(payload.pickup_location);
        active_trip.pickup_latitude = Set(payload.pickup_latitude);
        active_trip.pickup_longitude = Set(payload.pickup_longitude);
        active_trip.dropoff_location = Set(payload.dropoff_location);
        active_trip.dropoff_latitude = Set(payload.dropoff_latitude);
        active_trip.dropoff_longitude = Set(payload.dropoff_longitude);
        active_trip.current_location = Set(payload.current_location);
        active_trip.current_cycle_used = Set(payload.current_cycle_used);
        active_trip.start_date = Set(payload.start_date);
        active_trip.end_date = Set(payload.end_date);
        active_trip.total_miles = Set(payload.total_miles);
        active_trip.status = Set(payload.status);
        active_trip
    }
}
