use crate::errors::EditError;
use crate::ledger::{DayRecord, WeekLedger, day_key, parse_day_key};
use chrono::Weekday;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayField {
    Required,
    Ordered,
    Received,
    Consumed,
    OpeningStock,
    Variance,
    ClosingStock,
}

impl DayField {
    pub const ALL: [DayField; 7] = [
        DayField::Required,
        DayField::Ordered,
        DayField::Received,
        DayField::Consumed,
        DayField::OpeningStock,
        DayField::Variance,
        DayField::ClosingStock,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            DayField::Required => "required_kg",
            DayField::Ordered => "to_be_ordered",
            DayField::Received => "ordered_received",
            DayField::Consumed => "consumed_kg",
            DayField::OpeningStock => "opening_stock",
            DayField::Variance => "variance",
            DayField::ClosingStock => "closing_stock",
        }
    }

    pub fn is_raw(self) -> bool {
        matches!(
            self,
            DayField::Required | DayField::Ordered | DayField::Received | DayField::Consumed
        )
    }

    pub fn get(self, record: &DayRecord) -> f64 {
        match self {
            DayField::Required => record.required,
            DayField::Ordered => record.ordered,
            DayField::Received => record.received,
            DayField::Consumed => record.consumed,
            DayField::OpeningStock => record.opening_stock,
            DayField::Variance => record.variance,
            DayField::ClosingStock => record.closing_stock,
        }
    }

    pub fn set(self, record: &mut DayRecord, value: f64) {
        let slot = match self {
            DayField::Required => &mut record.required,
            DayField::Ordered => &mut record.ordered,
            DayField::Received => &mut record.received,
            DayField::Consumed => &mut record.consumed,
            DayField::OpeningStock => &mut record.opening_stock,
            DayField::Variance => &mut record.variance,
            DayField::ClosingStock => &mut record.closing_stock,
        };
        *slot = value;
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.suffix() == suffix)
    }
}

/// A ledger display field, named by its element id on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Day(Weekday, DayField),
    CurrentStock,
    PricePerKg,
    RequiredForPlan,
    ValueRequired,
    VarianceForWeek,
}

impl Field {
    pub fn is_raw(self) -> bool {
        match self {
            Field::Day(_, field) => field.is_raw(),
            Field::CurrentStock | Field::PricePerKg => true,
            Field::RequiredForPlan | Field::ValueRequired | Field::VarianceForWeek => false,
        }
    }

    pub fn get(self, week: &WeekLedger) -> f64 {
        match self {
            Field::Day(day, field) => field.get(week.day(day)),
            Field::CurrentStock => week.current_stock,
            Field::PricePerKg => week.price_per_kg,
            Field::RequiredForPlan => week.required_for_plan,
            Field::ValueRequired => week.value_required,
            Field::VarianceForWeek => week.variance_for_week,
        }
    }

    pub fn set(self, week: &mut WeekLedger, value: f64) {
        match self {
            Field::Day(day, field) => field.set(week.day_mut(day), value),
            Field::CurrentStock => week.current_stock = value,
            Field::PricePerKg => week.price_per_kg = value,
            Field::RequiredForPlan => week.required_for_plan = value,
            Field::ValueRequired => week.value_required = value,
            Field::VarianceForWeek => week.variance_for_week = value,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Day(day, field) => write!(f, "{}_{}", day_key(*day), field.suffix()),
            Field::CurrentStock => f.write_str("current_stock"),
            Field::PricePerKg => f.write_str("price_per_kg"),
            Field::RequiredForPlan => f.write_str("required_for_plan"),
            Field::ValueRequired => f.write_str("value_required"),
            Field::VarianceForWeek => f.write_str("variance_for_week"),
        }
    }
}

impl FromStr for Field {
    type Err = EditError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        match id {
            "current_stock" => return Ok(Field::CurrentStock),
            "price_per_kg" => return Ok(Field::PricePerKg),
            "required_for_plan" => return Ok(Field::RequiredForPlan),
            "value_required" => return Ok(Field::ValueRequired),
            "variance_for_week" => return Ok(Field::VarianceForWeek),
            _ => {}
        }

        id.split_once('_')
            .and_then(|(day, suffix)| Some(Field::Day(parse_day_key(day)?, DayField::from_suffix(suffix)?)))
            .ok_or_else(|| EditError::UnknownField(id.to_string()))
    }
}

/// Production-plan cell id, `{day}_planned`.
pub fn planned_field(day: Weekday) -> String {
    format!("{}_planned", day_key(day))
}

pub fn parse_planned_field(id: &str) -> Result<Weekday, EditError> {
    id.strip_suffix("_planned")
        .and_then(parse_day_key)
        .ok_or_else(|| EditError::UnknownField(id.to_string()))
}

/// Lenient read used for recomputation: anything that is not a finite number
/// reads as zero.
pub fn read_amount(raw: Option<&str>) -> f64 {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Strict read used when a user commits an edit.
pub fn parse_edit(raw: &str) -> Result<f64, EditError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(EditError::InvalidInput(raw.to_string())),
    }
}
