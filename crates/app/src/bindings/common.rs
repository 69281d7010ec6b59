//! Fields and formatters shared by every device page.

use serde_json::{Map, Value};
use wattdesk_domain::format;
use wattdesk_domain::time::Timestamp;

use crate::schema::{FormField, SelectOption};

/// Required free-text name.
#[must_use]
pub fn name_field() -> FormField {
    FormField::text("name", "Name").required()
}

/// Required status select, defaulting to online.
#[must_use]
pub fn status_field() -> FormField {
    FormField::select(
        "status",
        "Status",
        vec![
            SelectOption::new("Online", "online"),
            SelectOption::new("Offline", "offline"),
            SelectOption::new("Error", "error"),
        ],
    )
    .required()
    .default_value("online")
}

/// Required non-negative number.
#[must_use]
pub fn quantity_field(key: &'static str, label: &'static str, step: &'static str) -> FormField {
    FormField::number(key, label).required().step(step).min(0.0)
}

/// Missing, null and non-numeric values read as zero.
fn number(value: &Value) -> f64 {
    value.as_f64().unwrap_or(0.0)
}

pub fn watts(value: &Value, _record: &Map<String, Value>) -> String {
    format::watts(number(value))
}

pub fn kilowatt_hours(value: &Value, _record: &Map<String, Value>) -> String {
    format::kilowatt_hours(number(value))
}

pub fn kilowatts(value: &Value, _record: &Map<String, Value>) -> String {
    format::kilowatts(number(value))
}

pub fn percent(value: &Value, _record: &Map<String, Value>) -> String {
    format::percent(number(value))
}

pub fn fraction_as_percent(value: &Value, _record: &Map<String, Value>) -> String {
    format::fraction_as_percent(number(value))
}

pub fn square_meters(value: &Value, _record: &Map<String, Value>) -> String {
    format::square_meters(number(value))
}

pub fn coordinate(value: &Value, _record: &Map<String, Value>) -> String {
    format::coordinate(number(value))
}

pub fn kwh_per_hour(value: &Value, _record: &Map<String, Value>) -> String {
    format::kwh_per_hour(number(value))
}

/// RFC 3339 string as local date-time; `-` when missing or unparseable.
pub fn timestamp(value: &Value, _record: &Map<String, Value>) -> String {
    let parsed = value
        .as_str()
        .and_then(|raw| raw.parse::<Timestamp>().ok());
    format::timestamp(parsed.as_ref())
}
