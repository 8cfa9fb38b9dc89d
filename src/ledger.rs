//! Weekly stock ledger.
//!
//! A week is seven [`DayRecord`]s, Monday first. Opening stock chains from the
//! previous day's closing stock, starting from the week's current stock.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn day_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

pub fn parse_day_key(key: &str) -> Option<Weekday> {
    WEEK.into_iter().find(|day| day_key(*day) == key)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DayRecord {
    pub required: f64,
    /// Tracked for display only; not part of the stock derivation.
    pub ordered: f64,
    pub received: f64,
    pub consumed: f64,
    pub opening_stock: f64,
    pub closing_stock: f64,
    pub variance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WeekLedger {
    pub days: [DayRecord; 7],
    pub current_stock: f64,
    pub price_per_kg: f64,
    pub required_for_plan: f64,
    pub value_required: f64,
    pub variance_for_week: f64,
}

impl WeekLedger {
    pub fn new(current_stock: f64, price_per_kg: f64) -> Self {
        Self {
            current_stock,
            price_per_kg,
            ..Self::default()
        }
    }

    pub fn day(&self, day: Weekday) -> &DayRecord {
        &self.days[day.num_days_from_monday() as usize]
    }

    pub fn day_mut(&mut self, day: Weekday) -> &mut DayRecord {
        &mut self.days[day.num_days_from_monday() as usize]
    }
}

/// Derives opening stock, variance and closing stock for every day plus the
/// week totals from the raw figures.
///
/// Values are chained at full precision. Non-finite raw figures count as zero
/// and are written back as zero.
pub fn recompute(mut week: WeekLedger) -> WeekLedger {
    week.current_stock = finite_or_zero(week.current_stock);
    week.price_per_kg = finite_or_zero(week.price_per_kg);

    let mut opening = week.current_stock;
    let mut required_for_plan = 0.0;

    for day in week.days.iter_mut() {
        day.required = finite_or_zero(day.required);
        day.ordered = finite_or_zero(day.ordered);
        day.received = finite_or_zero(day.received);
        day.consumed = finite_or_zero(day.consumed);

        day.opening_stock = opening;
        day.variance = opening - day.required;
        day.closing_stock = opening + day.received - day.consumed;

        opening = day.closing_stock;
        required_for_plan += day.required;
    }

    week.required_for_plan = required_for_plan;
    week.value_required = required_for_plan * week.price_per_kg;
    week.variance_for_week = week.current_stock - required_for_plan;
    week
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarianceClass {
    Negative,
    Positive,
    Neutral,
}

impl VarianceClass {
    pub fn css_class(self) -> &'static str {
        match self {
            VarianceClass::Negative => "text-danger",
            VarianceClass::Positive => "text-success",
            VarianceClass::Neutral => "",
        }
    }
}

pub fn classify(value: f64) -> VarianceClass {
    if value < 0.0 {
        VarianceClass::Negative
    } else if value > 0.0 {
        VarianceClass::Positive
    } else {
        VarianceClass::Neutral
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
