use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::enums::ActivityKind;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "log_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[serde(rename = "daily_log")]
    pub daily_log_id: i32,
    pub activity_type: ActivityKind,
    pub start_hour: i16,
    pub end_hour: i16,
    #[sea_orm(column_type = "Decimal(Some((9, 6)))", nullable)]
    pub latitude: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((9, 6)))", nullable)]
    pub longitude: Option<Decimal>,
    pub location_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
}

impl Model {
    pub fn duration_hours(&self) -> i16 {
        self.end_hour - self.start_hour
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::daily_log::Entity",
        from = "Column::DailyLogId",
        to = "super::daily_log::Column::Id",
        on_delete = "Cascade",
        on_update = "Cascade"
    )]
    DailyLog,
}

impl Related<super::daily_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
