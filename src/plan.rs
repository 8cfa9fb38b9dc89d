//! Production plan rows: planned kilograms per day against a total target.

use crate::client::ApiClient;
use crate::editor::{EditCell, InFlight, PendingEdit, Resolution};
use crate::errors::{ClientError, EditError};
use crate::fields::{parse_edit, parse_planned_field, planned_field};
use crate::ledger::WEEK;
use crate::models::{FieldUpdateRequest, PlanTotals};
use crate::ui::format_amount;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanRow {
    pub total_kg: f64,
    pub planned: [f64; 7],
    pub total_planned: f64,
    pub variance: f64,
}

impl PlanRow {
    pub fn new(total_kg: f64) -> Self {
        Self {
            total_kg,
            ..Self::default()
        }
    }

    pub fn planned(&self, day: Weekday) -> f64 {
        self.planned[day.num_days_from_monday() as usize]
    }

    pub fn set_planned(&mut self, day: Weekday, value: f64) {
        self.planned[day.num_days_from_monday() as usize] = value;
    }
}

pub fn recompute_plan(mut row: PlanRow) -> PlanRow {
    row.total_planned = WEEK
        .into_iter()
        .map(|day| row.planned(day))
        .filter(|value| value.is_finite())
        .sum();
    let total_kg = if row.total_kg.is_finite() { row.total_kg } else { 0.0 };
    row.variance = total_kg - row.total_planned;
    row
}

#[derive(Debug, Default)]
pub struct PlanTable {
    rows: BTreeMap<i64, PlanRow>,
    in_flight: InFlight,
}

impl PlanTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_row(&mut self, id: i64, row: PlanRow) {
        self.rows.insert(id, recompute_plan(row));
    }

    pub fn row(&self, id: i64) -> Option<&PlanRow> {
        self.rows.get(&id)
    }

    pub fn begin_edit(&self, row_id: i64, field_id: &str) -> Result<EditCell<Weekday>, EditError> {
        let day = parse_planned_field(field_id)?;
        let row = self.rows.get(&row_id).ok_or(EditError::UnknownRow(row_id))?;
        Ok(EditCell {
            row_id,
            field: day,
            original: format_amount(row.planned(day)),
        })
    }

    pub fn commit(
        &mut self,
        cell: &EditCell<Weekday>,
        input: &str,
    ) -> Result<PendingEdit<Weekday>, EditError> {
        let value = parse_edit(input)?;
        let row = self
            .rows
            .get_mut(&cell.row_id)
            .ok_or(EditError::UnknownRow(cell.row_id))?;

        let previous = row.planned(cell.field);
        row.set_planned(cell.field, value);
        *row = recompute_plan(*row);

        let field = planned_field(cell.field);
        let token = self.in_flight.issue(cell.row_id);
        info!(row = cell.row_id, %field, value, "plan edit committed");
        Ok(PendingEdit {
            token,
            field: cell.field,
            value,
            previous,
            request: FieldUpdateRequest {
                id: cell.row_id,
                field,
                value,
            },
        })
    }

    pub fn resolve(
        &mut self,
        pending: &PendingEdit<Weekday>,
        outcome: Result<PlanTotals, ClientError>,
    ) -> Resolution {
        let row_id = pending.token.row_id();
        let current = self.in_flight.settle(pending.token);
        let Some(row) = self.rows.get_mut(&row_id) else {
            return Resolution::Stale;
        };

        match outcome {
            Ok(totals) if current => {
                row.total_planned = totals.total_planned;
                row.variance = totals.variance;
                Resolution::Applied
            }
            Ok(_) => {
                debug!(row = row_id, "discarding stale plan response");
                Resolution::Stale
            }
            Err(err) if !current && row.planned(pending.field) != pending.value => {
                debug!(row = row_id, "planned cell rewritten since failed edit: {err}");
                Resolution::Stale
            }
            Err(err) => {
                warn!(row = row_id, "plan edit reverted: {err}");
                row.set_planned(pending.field, pending.previous);
                *row = recompute_plan(*row);
                Resolution::Reverted(err.to_string())
            }
        }
    }

    pub async fn submit(
        &mut self,
        client: &ApiClient,
        cell: &EditCell<Weekday>,
        input: &str,
    ) -> Result<Resolution, EditError> {
        let pending = self.commit(cell, input)?;
        let outcome = client.update_daily_plan(&pending.request).await;
        Ok(self.resolve(&pending, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_and_variance() {
        let mut row = PlanRow::new(100.0);
        row.set_planned(Weekday::Mon, 30.0);
        row.set_planned(Weekday::Sun, 25.5);
        let row = recompute_plan(row);
        assert_eq!(row.total_planned, 55.5);
        assert_eq!(row.variance, 44.5);
    }

    #[test]
    fn commit_then_confirm() {
        let mut table = PlanTable::new();
        table.insert_row(3, PlanRow::new(50.0));

        let cell = table.begin_edit(3, "wednesday_planned").unwrap();
        let pending = table.commit(&cell, "60").unwrap();
        assert_eq!(pending.request.field, "wednesday_planned");
        assert_eq!(table.row(3).unwrap().variance, -10.0);

        let totals = PlanTotals {
            total_planned: 61.0,
            variance: -11.0,
        };
        assert_eq!(table.resolve(&pending, Ok(totals)), Resolution::Applied);
        assert_eq!(table.row(3).unwrap().total_planned, 61.0);
        assert_eq!(table.row(3).unwrap().planned(Weekday::Wed), 60.0);
    }

    #[test]
    fn rejection_reverts_planned_value() {
        let mut table = PlanTable::new();
        let mut row = PlanRow::new(20.0);
        row.set_planned(Weekday::Fri, 4.0);
        table.insert_row(1, row);

        let cell = table.begin_edit(1, "friday_planned").unwrap();
        assert_eq!(cell.original, "4.00");
        let pending = table.commit(&cell, "9").unwrap();

        let outcome = Err(ClientError::Rejected("Invalid field".to_string()));
        assert_eq!(
            table.resolve(&pending, outcome),
            Resolution::Reverted("Invalid field".to_string())
        );
        let row = table.row(1).unwrap();
        assert_eq!(row.planned(Weekday::Fri), 4.0);
        assert_eq!(row.variance, 16.0);
    }

    #[test]
    fn older_confirmation_is_discarded_after_newer_edit() {
        let mut table = PlanTable::new();
        table.insert_row(2, PlanRow::new(40.0));

        let monday = table.begin_edit(2, "monday_planned").unwrap();
        let first = table.commit(&monday, "10").unwrap();
        let tuesday = table.begin_edit(2, "tuesday_planned").unwrap();
        let second = table.commit(&tuesday, "15").unwrap();

        let early = PlanTotals {
            total_planned: 10.0,
            variance: 30.0,
        };
        assert_eq!(table.resolve(&first, Ok(early)), Resolution::Stale);
        assert_eq!(table.row(2).unwrap().total_planned, 25.0);

        let latest = PlanTotals {
            total_planned: 25.0,
            variance: 15.0,
        };
        assert_eq!(table.resolve(&second, Ok(latest)), Resolution::Applied);
        assert_eq!(table.row(2).unwrap().variance, 15.0);
    }

    #[test]
    fn older_rejection_is_rolled_back_behind_newer_edit() {
        let mut table = PlanTable::new();
        table.insert_row(2, PlanRow::new(40.0));

        let monday = table.begin_edit(2, "monday_planned").unwrap();
        let first = table.commit(&monday, "10").unwrap();
        let tuesday = table.begin_edit(2, "tuesday_planned").unwrap();
        let _second = table.commit(&tuesday, "15").unwrap();

        let outcome = Err(ClientError::Rejected("Invalid field".to_string()));
        assert_eq!(
            table.resolve(&first, outcome),
            Resolution::Reverted("Invalid field".to_string())
        );
        let row = table.row(2).unwrap();
        assert_eq!(row.planned(Weekday::Mon), 0.0);
        assert_eq!(row.total_planned, 15.0);
        assert_eq!(row.variance, 25.0);
    }

    #[test]
    fn older_rejection_keeps_newer_value_of_same_cell() {
        let mut table = PlanTable::new();
        table.insert_row(2, PlanRow::new(40.0));

        let cell = table.begin_edit(2, "sunday_planned").unwrap();
        let first = table.commit(&cell, "10").unwrap();
        let cell = table.begin_edit(2, "sunday_planned").unwrap();
        let _second = table.commit(&cell, "12").unwrap();

        assert_eq!(table.resolve(&first, Err(ClientError::MissingData)), Resolution::Stale);
        assert_eq!(table.row(2).unwrap().planned(Weekday::Sun), 12.0);
    }

    #[test]
    fn only_planned_cells_are_editable() {
        let mut table = PlanTable::new();
        table.insert_row(1, PlanRow::new(1.0));
        assert!(matches!(
            table.begin_edit(1, "monday_required_kg"),
            Err(EditError::UnknownField(_))
        ));
        let cell = table.begin_edit(1, "monday_planned").unwrap();
        assert!(matches!(table.commit(&cell, "-2"), Err(EditError::InvalidInput(_))));
    }
}
