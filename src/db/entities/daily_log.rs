use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One calendar day of a trip.
///
/// The four `total_*_hours` columns are derived data: they are rewritten by
/// `services::hours_service::recompute_totals` from the day's entries and are
/// never accepted from API input.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "daily_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[serde(rename = "trip")]
    pub trip_id: i32,
    pub date: Date,

    pub pickup_location: String,
    pub dropoff_location: String,
    pub total_miles_driven: f64,
    pub total_mileage_today: f64,

    pub trailer_or_plate: Option<String>,
    pub carrier_name: Option<String>,
    pub main_office_address: Option<String>,
    pub home_terminal_address: Option<String>,
    pub manifest_number: Option<String>,
    pub shipper_and_commodity: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub remarks: Option<String>,

    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub total_driving_hours: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub total_on_duty_hours: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub total_off_duty_hours: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub total_sleeper_hours: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::trip::Entity",
        from = "Column::TripId",
        to = "super::trip::Column::Id",
        on_delete = "Cascade",
        on_update = "Cascade"
    )]
    Trip,

    #[sea_orm(has_many = "super::log_entry::Entity")]
    Entries,
}

impl Related<super::trip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trip.def()
    }
}

impl Related<super::log_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
