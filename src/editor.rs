//! Single-cell editing of the inventory table.
//!
//! An edit is applied locally as soon as it is committed and a request is
//! issued for it. Each row remembers the token of its latest edit; a successful
//! response carrying an older token is discarded so a slow reply can never
//! overwrite values belonging to a newer edit of the same row. A failed edit is
//! always rolled back unless a later edit has since rewritten that cell.

use crate::client::ApiClient;
use crate::errors::{ClientError, EditError};
use crate::fields::{DayField, Field, parse_edit};
use crate::ledger::{WeekLedger, recompute};
use crate::models::{ConfirmedValues, FieldUpdateRequest};
use crate::ui::format_amount;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditToken {
    row_id: i64,
    seq: u64,
}

impl EditToken {
    pub fn row_id(&self) -> i64 {
        self.row_id
    }
}

/// Latest issued edit per row.
#[derive(Debug, Default)]
pub struct InFlight {
    next: u64,
    latest: HashMap<i64, u64>,
}

impl InFlight {
    pub fn issue(&mut self, row_id: i64) -> EditToken {
        self.next += 1;
        self.latest.insert(row_id, self.next);
        EditToken {
            row_id,
            seq: self.next,
        }
    }

    pub fn is_current(&self, token: EditToken) -> bool {
        self.latest.get(&token.row_id) == Some(&token.seq)
    }

    pub fn is_pending(&self, row_id: i64) -> bool {
        self.latest.contains_key(&row_id)
    }

    /// Consumes `token` if it is the row's latest; returns whether it was.
    pub fn settle(&mut self, token: EditToken) -> bool {
        if self.is_current(token) {
            self.latest.remove(&token.row_id);
            true
        } else {
            false
        }
    }
}

/// A cell opened for editing, holding the text it showed beforehand.
#[derive(Debug, Clone, PartialEq)]
pub struct EditCell<F> {
    pub row_id: i64,
    pub field: F,
    pub original: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingEdit<F> {
    pub token: EditToken,
    pub field: F,
    pub value: f64,
    pub previous: f64,
    pub request: FieldUpdateRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Server-confirmed values were merged into the row.
    Applied,
    /// The edit failed and the field went back to its previous value.
    Reverted(String),
    /// A newer edit of the same row owns the row; the response was ignored.
    Stale,
}

#[derive(Debug, Default)]
pub struct InventoryTable {
    rows: BTreeMap<i64, WeekLedger>,
    in_flight: InFlight,
}

impl InventoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_row(&mut self, id: i64, ledger: WeekLedger) {
        self.rows.insert(id, recompute(ledger));
    }

    pub fn row(&self, id: i64) -> Option<&WeekLedger> {
        self.rows.get(&id)
    }

    pub fn display(&self, id: i64, field: Field) -> Option<String> {
        self.rows.get(&id).map(|row| format_amount(field.get(row)))
    }

    pub fn is_pending(&self, id: i64) -> bool {
        self.in_flight.is_pending(id)
    }

    pub fn begin_edit(&self, row_id: i64, field_id: &str) -> Result<EditCell<Field>, EditError> {
        let field: Field = field_id.parse()?;
        if !matches!(field, Field::Day(_, kind) if kind.is_raw()) {
            return Err(EditError::NotEditable(field_id.to_string()));
        }
        let row = self.rows.get(&row_id).ok_or(EditError::UnknownRow(row_id))?;
        Ok(EditCell {
            row_id,
            field,
            original: format_amount(field.get(row)),
        })
    }

    pub fn cancel(&self, cell: EditCell<Field>) -> String {
        cell.original
    }

    /// Validates `input`, applies it to the row and recomputes. Invalid input
    /// leaves the row as it was.
    pub fn commit(
        &mut self,
        cell: &EditCell<Field>,
        input: &str,
    ) -> Result<PendingEdit<Field>, EditError> {
        let value = parse_edit(input)?;
        let row = self
            .rows
            .get_mut(&cell.row_id)
            .ok_or(EditError::UnknownRow(cell.row_id))?;

        let previous = cell.field.get(row);
        cell.field.set(row, value);
        *row = recompute(*row);

        let token = self.in_flight.issue(cell.row_id);
        info!(row = cell.row_id, field = %cell.field, value, "edit committed");
        Ok(PendingEdit {
            token,
            field: cell.field,
            value,
            previous,
            request: FieldUpdateRequest {
                id: cell.row_id,
                field: cell.field.to_string(),
                value,
            },
        })
    }

    pub fn resolve(
        &mut self,
        pending: &PendingEdit<Field>,
        outcome: Result<ConfirmedValues, ClientError>,
    ) -> Resolution {
        let row_id = pending.token.row_id();
        let current = self.in_flight.settle(pending.token);
        let Some(row) = self.rows.get_mut(&row_id) else {
            return Resolution::Stale;
        };

        match outcome {
            Ok(values) if current => {
                merge_confirmed(row, pending.field, &values);
                Resolution::Applied
            }
            Ok(_) => {
                debug!(row = row_id, field = %pending.field, "discarding stale response");
                Resolution::Stale
            }
            // A rejected value never stays on screen, even behind a newer edit,
            // unless that newer edit already overwrote the same cell.
            Err(err) if current || pending.field.get(row) == pending.value => {
                warn!(row = row_id, field = %pending.field, "edit reverted: {err}");
                pending.field.set(row, pending.previous);
                *row = recompute(*row);
                Resolution::Reverted(err.to_string())
            }
            Err(err) => {
                debug!(row = row_id, field = %pending.field, "cell rewritten since failed edit: {err}");
                Resolution::Stale
            }
        }
    }

    pub async fn submit(
        &mut self,
        client: &ApiClient,
        cell: &EditCell<Field>,
        input: &str,
    ) -> Result<Resolution, EditError> {
        let pending = self.commit(cell, input)?;
        let outcome = client.update_field(&pending.request).await;
        Ok(self.resolve(&pending, outcome))
    }
}

fn merge_confirmed(row: &mut WeekLedger, field: Field, values: &ConfirmedValues) {
    if let Field::Day(day, _) = field {
        let record = row.day_mut(day);
        DayField::OpeningStock.set(record, values.opening_stock);
        DayField::Variance.set(record, values.variance);
        DayField::ClosingStock.set(record, values.closing_stock);
    }
    row.required_for_plan = values.required_for_plan;
    row.variance_for_week = values.variance_for_week;
    row.value_required = values.value_required;
}
