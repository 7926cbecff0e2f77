use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::enums::TripStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[serde(rename = "user")]
    pub user_id: i32,
    pub pickup_location: String,
    pub pickup_latitude: Option<f64>,
    pub pickup_longitude: Option<f64>,
    pub dropoff_location: String,
    pub dropoff_latitude: Option<f64>,
    pub dropoff_longitude: Option<f64>,
    pub current_location: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub current_cycle_used: Decimal,
    pub start_date: ChronoDateTimeUtc,
    pub end_date: Option<ChronoDateTimeUtc>,
    pub total_miles: f64,
    pub status: TripStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade",
        on_update = "Cascade"
    )]
    User,

    #[sea_orm(has_many = "super::daily_log::Entity")]
    DailyLogs,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::daily_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
