use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Duty status recorded by a log entry.
///
/// Variant order is the row order of the log sheet grid, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "activity_type_enum")]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    #[sea_orm(string_value = "off_duty")]
    OffDuty,
    #[sea_orm(string_value = "sleeper")]
    Sleeper,
    #[sea_orm(string_value = "driving")]
    Driving,
    #[sea_orm(string_value = "on_duty")]
    OnDuty,
}

impl ActivityKind {
    pub const GRID_ROWS: [ActivityKind; 4] = [
        ActivityKind::OffDuty,
        ActivityKind::Sleeper,
        ActivityKind::Driving,
        ActivityKind::OnDuty,
    ];

    /// Zero-based grid row, counted from the top of the sheet.
    pub fn row_index(self) -> usize {
        match self {
            ActivityKind::OffDuty => 0,
            ActivityKind::Sleeper => 1,
            ActivityKind::Driving => 2,
            ActivityKind::OnDuty => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActivityKind::OffDuty => "Off Duty",
            ActivityKind::Sleeper => "Sleeper Berth",
            ActivityKind::Driving => "Driving",
            ActivityKind::OnDuty => "On Duty (Not Driving)",
        }
    }

    /// Parses a raw column value. Used where rows are read as plain strings,
    /// so a bad value can be skipped instead of failing the whole query.
    pub fn from_db_str(raw: &str) -> Option<Self> {
        Self::try_from_value(&raw.to_string()).ok()
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Default)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "trip_status_enum")]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    #[default]
    #[sea_orm(string_value = "ongoing")]
    Ongoing,
    #[sea_orm(string_value = "completed")]
    Completed,
}
