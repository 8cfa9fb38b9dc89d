use crate::fields::{DayField, Field, read_amount};
use crate::form::{CATEGORY, InventoryForm, REQUIRED_TOTAL, SUPPLIER_NAME, WEEK_COMMENCING};
use crate::ledger::{VarianceClass, WEEK, day_key};
use std::fmt::Write;

/// Two decimal places, with values that round to zero shown as `0.00`.
pub fn format_amount(value: f64) -> String {
    let value = if value.abs() < 0.005 { 0.0 } else { value };
    format!("{value:.2}")
}

fn status(class: VarianceClass) -> &'static str {
    match class {
        VarianceClass::Negative => "short",
        VarianceClass::Positive => "surplus",
        VarianceClass::Neutral => "",
    }
}

const COLUMNS: [(&str, DayField); 7] = [
    ("Required", DayField::Required),
    ("Ordered", DayField::Ordered),
    ("Received", DayField::Received),
    ("Consumed", DayField::Consumed),
    ("Opening", DayField::OpeningStock),
    ("Variance", DayField::Variance),
    ("Closing", DayField::ClosingStock),
];

pub fn render_week(form: &InventoryForm) -> String {
    let text = |id: &str| form.value(id).unwrap_or("").to_string();
    let amount = |field: Field| format_amount(read_amount(form.field(field)));

    let mut out = String::new();
    let _ = writeln!(out, "Week commencing: {}", text(WEEK_COMMENCING));
    let _ = writeln!(out, "Supplier: {}", text(SUPPLIER_NAME));
    let _ = writeln!(out, "Category: {}", text(CATEGORY));
    let _ = writeln!(
        out,
        "Current stock: {}  Price per kg: {}  Required total: {}",
        amount(Field::CurrentStock),
        amount(Field::PricePerKg),
        format_amount(read_amount(form.value(REQUIRED_TOTAL))),
    );
    out.push('\n');

    let _ = write!(out, "{:<10}", "Day");
    for (title, _) in COLUMNS {
        let _ = write!(out, "{title:>10}");
    }
    out.push_str("  Status\n");

    for day in WEEK {
        let _ = write!(out, "{:<10}", day_key(day));
        for (_, kind) in COLUMNS {
            let _ = write!(out, "{:>10}", amount(Field::Day(day, kind)));
        }
        let variance = Field::Day(day, DayField::Variance).to_string();
        let _ = writeln!(out, "  {}", status(form.variance_class(&variance)));
    }
    out.push('\n');

    let _ = writeln!(out, "Required for plan: {}", amount(Field::RequiredForPlan));
    let _ = writeln!(out, "Value required: {}", amount(Field::ValueRequired));
    let variance_for_week = Field::VarianceForWeek;
    let _ = writeln!(
        out,
        "Variance for week: {} {}",
        amount(variance_for_week),
        status(form.variance_class(&variance_for_week.to_string())),
    );
    out
}
