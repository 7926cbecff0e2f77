//! Hour totals of a daily log.
//!
//! The totals on `daily_logs` are always re-derived from the log's entries,
//! never adjusted incrementally. [`recompute_totals`] reads one grouped sum per
//! activity, zeroes all four totals, fills in the groups it found and writes
//! back only the four total columns.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect,
    sea_query::{Expr, Func, SimpleExpr},
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::db::entities::{daily_log, log_entry};
use crate::db::enums::ActivityKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HourTotals {
    pub driving: Decimal,
    pub on_duty: Decimal,
    pub off_duty: Decimal,
    pub sleeper: Decimal,
}

impl HourTotals {
    /// Builds totals from `(activity_type, summed hours)` rows.
    ///
    /// Rows whose activity string is not one of the four known values are skipped.
    pub fn from_grouped_sums<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, i64)>,
    {
        let mut totals = HourTotals::default();
        for (raw_kind, hours) in rows {
            match ActivityKind::from_db_str(&raw_kind) {
                Some(kind) => *totals.slot_mut(kind) += Decimal::from(hours),
                None => warn!(activity_type = %raw_kind, hours, "Skipping entries with unknown activity type."),
            }
        }
        totals
    }

    pub fn of_log(log: &daily_log::Model) -> Self {
        HourTotals {
            driving: log.total_driving_hours,
            on_duty: log.total_on_duty_hours,
            off_duty: log.total_off_duty_hours,
            sleeper: log.total_sleeper_hours,
        }
    }

    fn slot_mut(&mut self, kind: ActivityKind) -> &mut Decimal {
        match kind {
            ActivityKind::Driving => &mut self.driving,
            ActivityKind::OnDuty => &mut self.on_duty,
            ActivityKind::OffDuty => &mut self.off_duty,
            ActivityKind::Sleeper => &mut self.sleeper,
        }
    }

    /// Hours counted on the recap line: driving plus on duty (not driving).
    pub fn recap_hours(&self) -> Decimal {
        self.driving + self.on_duty
    }

    pub fn apply_to(&self, log: &mut daily_log::Model) {
        log.total_driving_hours = self.driving;
        log.total_on_duty_hours = self.on_duty;
        log.total_off_duty_hours = self.off_duty;
        log.total_sleeper_hours = self.sleeper;
    }
}

/// Storage used by [`recompute_totals`].
#[async_trait]
pub trait HoursStore: Send + Sync {
    /// One row per activity present on the log: the raw activity value and
    /// the sum of `end_hour - start_hour` over its entries.
    async fn grouped_durations(&self, log_id: i32) -> Result<Vec<(String, i64)>, DbErr>;

    /// Writes the four total columns of the log and nothing else.
    async fn write_totals(&self, log_id: i32, totals: &HourTotals) -> Result<(), DbErr>;
}

/// [`HoursStore`] over any sea-orm connection or transaction.
pub struct SeaOrmHoursStore<'a, C>(pub &'a C);

#[async_trait]
impl<'a, C> HoursStore for SeaOrmHoursStore<'a, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn grouped_durations(&self, log_id: i32) -> Result<Vec<(String, i64)>, DbErr> {
        let duration = Expr::col(log_entry::Column::EndHour).sub(Expr::col(log_entry::Column::StartHour));

        log_entry::Entity::find()
            .select_only()
            .column(log_entry::Column::ActivityType)
            .column_as(SimpleExpr::from(Func::sum(duration)), "total_hours")
            .filter(log_entry::Column::DailyLogId.eq(log_id))
            .group_by(log_entry::Column::ActivityType)
            .into_tuple::<(String, i64)>()
            .all(self.0)
            .await
    }

    async fn write_totals(&self, log_id: i32, totals: &HourTotals) -> Result<(), DbErr> {
        daily_log::Entity::update_many()
            .col_expr(daily_log::Column::TotalDrivingHours, Expr::value(totals.driving))
            .col_expr(daily_log::Column::TotalOnDutyHours, Expr::value(totals.on_duty))
            .col_expr(daily_log::Column::TotalOffDutyHours, Expr::value(totals.off_duty))
            .col_expr(daily_log::Column::TotalSleeperHours, Expr::value(totals.sleeper))
            .filter(daily_log::Column::Id.eq(log_id))
            .exec(self.0)
            .await?;
        Ok(())
    }
}

/// Re-derives the four hour totals of `log` from its entries and persists them.
///
/// Activities without entries end at zero. Only the total columns are written,
/// so nothing that reacts to a full log save runs again.
pub async fn recompute_totals<S>(store: &S, mut log: daily_log::Model) -> Result<daily_log::Model, DbErr>
where
    S: HoursStore + ?Sized,
{
    let rows = store.grouped_durations(log.id).await?;
    let totals = HourTotals::from_grouped_sums(rows);

    store.write_totals(log.id, &totals).await?;
    totals.apply_to(&mut log);

    debug!(
        log_id = log.id,
        driving = %totals.driving,
        on_duty = %totals.on_duty,
        off_duty = %totals.off_duty,
        sleeper = %totals.sleeper,
        "Recomputed daily log totals."
    );
    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Entries kept in memory; mimics the grouped-sum query and records writes.
    #[derive(Default)]
    struct MemoryStore {
        entries: Vec<(i32, String, i16, i16)>,
        writes: Mutex<Vec<(i32, HourTotals)>>,
    }

    impl MemoryStore {
        fn with_entries(log_id: i32, entries: &[(&str, i16, i16)]) -> Self {
            MemoryStore {
                entries: entries
                    .iter()
                    .map(|(kind, start, end)| (log_id, kind.to_string(), *start, *end))
                    .collect(),
                writes: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HoursStore for MemoryStore {
        async fn grouped_durations(&self, log_id: i32) -> Result<Vec<(String, i64)>, DbErr> {
            let mut groups: BTreeMap<String, i64> = BTreeMap::new();
            for (entry_log, kind, start, end) in &self.entries {
                if *entry_log == log_id {
                    *groups.entry(kind.clone()).or_default() += i64::from(end - start);
                }
            }
            Ok(groups.into_iter().collect())
        }

        async fn write_totals(&self, log_id: i32, totals: &HourTotals) -> Result<(), DbErr> {
            self.writes.lock().unwrap().push((log_id, *totals));
            Ok(())
        }
    }

    fn log(id: i32) -> daily_log::Model {
        daily_log::Model {
            id,
            trip_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            pickup_location: "Dallas, TX".to_string(),
            dropoff_location: "Memphis, TN".to_string(),
            total_miles_driven: 0.0,
            total_mileage_today: 0.0,
            trailer_or_plate: None,
            carrier_name: None,
            main_office_address: None,
            home_terminal_address: None,
            manifest_number: None,
            shipper_and_commodity: None,
            remarks: None,
            // Stale values that must not survive a recompute.
            total_driving_hours: Decimal::from(99),
            total_on_duty_hours: Decimal::from(99),
            total_off_duty_hours: Decimal::from(99),
            total_sleeper_hours: Decimal::from(99),
        }
    }

    #[tokio::test]
    async fn test_full_day_totals() {
        let store = MemoryStore::with_entries(
            7,
            &[("driving", 0, 8), ("off_duty", 8, 10), ("driving", 10, 14), ("sleeper", 14, 24)],
        );

        let updated = recompute_totals(&store, log(7)).await.unwrap();

        assert_eq!(updated.total_driving_hours, Decimal::from(12));
        assert_eq!(updated.total_off_duty_hours, Decimal::from(2));
        assert_eq!(updated.total_sleeper_hours, Decimal::from(10));
        assert_eq!(updated.total_on_duty_hours, Decimal::ZERO);
        assert_eq!(HourTotals::of_log(&updated).recap_hours(), Decimal::from(12));
    }

    #[tokio::test]
    async fn test_two_activities_land_in_their_slots() {
        let store = MemoryStore::with_entries(3, &[("on_duty", 6, 7), ("on_duty", 15, 16), ("sleeper", 0, 6)]);

        let updated = recompute_totals(&store, log(3)).await.unwrap();
        let totals = HourTotals::of_log(&updated);

        assert_eq!(totals.on_duty, Decimal::from(2));
        assert_eq!(totals.sleeper, Decimal::from(6));
        assert_eq!(totals.driving, Decimal::ZERO);
        assert_eq!(totals.off_duty, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_recompute_is_idempotent() {
        let store = MemoryStore::with_entries(5, &[("driving", 2, 9), ("on_duty", 9, 11)]);

        let first = recompute_totals(&store, log(5)).await.unwrap();
        let second = recompute_totals(&store, first.clone()).await.unwrap();

        assert_eq!(first, second);
        let writes = store.writes.lock().unwrap();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0], writes[1]);
    }

    #[tokio::test]
    async fn test_no_entries_zeroes_everything() {
        let store = MemoryStore::default();

        let updated = recompute_totals(&store, log(9)).await.unwrap();

        assert_eq!(HourTotals::of_log(&updated), HourTotals::default());
        assert_eq!(store.writes.lock().unwrap().as_slice(), &[(9, HourTotals::default())]);
    }

    #[tokio::test]
    async fn test_other_logs_are_ignored() {
        let mut store = MemoryStore::with_entries(1, &[("driving", 0, 5)]);
        store.entries.push((2, "driving".to_string(), 0, 11));

        let updated = recompute_totals(&store, log(1)).await.unwrap();
        assert_eq!(updated.total_driving_hours, Decimal::from(5));
    }

    #[test]
    fn test_unknown_activity_rows_are_skipped() {
        let totals = HourTotals::from_grouped_sums(vec![
            ("driving".to_string(), 4),
            ("yard_move".to_string(), 3),
        ]);
        assert_eq!(totals.driving, Decimal::from(4));
        assert_eq!(totals.on_duty + totals.off_duty + totals.sleeper, Decimal::ZERO);
    }
}
