//! Inventory entry form.
//!
//! The form holds every display field as text keyed by element id, the way the
//! page does. [`InventoryForm::recalculate`] is the one place derived fields get
//! written: read raw fields, recompute, render.

use crate::client::ApiClient;
use crate::errors::ClientError;
use crate::fields::{DayField, Field, read_amount};
use crate::ledger::{VarianceClass, WEEK, WeekLedger, classify, parse_day_key, recompute};
use crate::models::WeekInput;
use crate::ui::format_amount;
use std::collections::BTreeMap;
use tracing::{info, warn};

pub const SUPPLIER_NAME: &str = "supplier_name";
pub const CATEGORY: &str = "category";
pub const REQUIRED_TOTAL: &str = "required_total";
pub const WEEK_COMMENCING: &str = "week_commencing";

const DERIVED_DAY_FIELDS: [DayField; 3] = [
    DayField::OpeningStock,
    DayField::Variance,
    DayField::ClosingStock,
];

#[derive(Debug, Clone, Default)]
pub struct InventoryForm {
    values: BTreeMap<String, String>,
    classes: BTreeMap<String, VarianceClass>,
}

impl InventoryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, id: &str) -> Option<&str> {
        self.values.get(id).map(String::as_str)
    }

    pub fn field(&self, field: Field) -> Option<&str> {
        self.value(&field.to_string())
    }

    pub fn set(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.values.insert(id.into(), value.into());
    }

    pub fn variance_class(&self, id: &str) -> VarianceClass {
        self.classes.get(id).copied().unwrap_or(VarianceClass::Neutral)
    }

    pub fn read_ledger(&self) -> WeekLedger {
        let mut week = WeekLedger::new(
            self.amount(Field::CurrentStock),
            self.amount(Field::PricePerKg),
        );
        for day in WEEK {
            for kind in DayField::ALL.into_iter().filter(|kind| kind.is_raw()) {
                let field = Field::Day(day, kind);
                field.set(&mut week, self.amount(field));
            }
        }
        week
    }

    pub fn render(&mut self, week: &WeekLedger) {
        for day in WEEK {
            for kind in DERIVED_DAY_FIELDS {
                self.render_field(Field::Day(day, kind), week);
            }
            let variance = Field::Day(day, DayField::Variance);
            self.classes
                .insert(variance.to_string(), classify(variance.get(week)));
        }

        self.render_field(Field::RequiredForPlan, week);
        self.render_field(Field::ValueRequired, week);
        self.render_field(Field::VarianceForWeek, week);
        self.classes.insert(
            Field::VarianceForWeek.to_string(),
            classify(week.variance_for_week),
        );
    }

    pub fn recalculate(&mut self) -> WeekLedger {
        let week = recompute(self.read_ledger());
        self.render(&week);
        week
    }

    pub fn on_input(&mut self, id: &str, value: &str) -> WeekLedger {
        self.set(id, value);
        self.recalculate()
    }

    pub fn load_week(&mut self, input: &WeekInput) {
        if let Some(date) = input.week_commencing {
            self.set(WEEK_COMMENCING, date.to_string());
        }
        if let Some(stock) = input.current_stock {
            self.set(Field::CurrentStock.to_string(), stock.to_string());
        }
        if let Some(price) = input.price_per_kg {
            self.set(Field::PricePerKg.to_string(), price.to_string());
        }

        for (key, figures) in &input.days {
            let Some(day) = parse_day_key(key) else {
                warn!("ignoring figures for unknown day {key:?}");
                continue;
            };
            let raw = [
                (DayField::Required, figures.required),
                (DayField::Ordered, figures.ordered),
                (DayField::Received, figures.received),
                (DayField::Consumed, figures.consumed),
            ];
            for (kind, value) in raw {
                self.set(Field::Day(day, kind).to_string(), value.to_string());
            }
        }
    }

    /// Fills item metadata, stock and usage for `item_id`, then recalculates.
    ///
    /// A failed item lookup leaves the form untouched. Stocktake and usage are
    /// fetched together; either failing only skips its own field.
    pub async fn select_item(
        &mut self,
        client: &ApiClient,
        item_id: i64,
    ) -> Result<WeekLedger, ClientError> {
        let item = client.fetch_item(item_id).await?;
        self.set(
            Field::PricePerKg.to_string(),
            item.price_per_kg.unwrap_or(0.0).to_string(),
        );
        self.set(SUPPLIER_NAME, item.supplier_name.unwrap_or_default());
        self.set(CATEGORY, item.category.unwrap_or_default());

        let (stocktake, usage) = tokio::join!(
            client.fetch_stocktake(item_id),
            client.fetch_raw_material_usage(item_id)
        );
        match stocktake {
            Ok(stocktake) => self.set(
                Field::CurrentStock.to_string(),
                stocktake.current_stock.unwrap_or(0.0).to_string(),
            ),
            Err(err) => warn!(item_id, "stocktake lookup failed: {err}"),
        }
        match usage {
            Ok(usage) => self.set(REQUIRED_TOTAL, usage.total_usage.unwrap_or(0.0).to_string()),
            Err(err) => warn!(item_id, "raw material usage lookup failed: {err}"),
        }

        info!(item_id, "item selected");
        Ok(self.recalculate())
    }

    fn amount(&self, field: Field) -> f64 {
        read_amount(self.field(field))
    }

    fn render_field(&mut self, field: Field, week: &WeekLedger) {
        self.values
            .insert(field.to_string(), format_amount(field.get(week)));
    }
}
