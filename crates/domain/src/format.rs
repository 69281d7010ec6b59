//! Unit-aware display formatting.
//!
//! One rule per unit, used by every page so the same quantity always reads
//! the same way: watts are whole numbers, energy and power ratings carry one
//! decimal, and percentages carry one decimal. Ratios (such as panel
//! efficiency) arrive as 0–1 fractions and are multiplied by 100 here.

use crate::time::{Timestamp, to_local_string};

/// Placeholder for missing values.
pub const MISSING: &str = "-";

/// Whole watts, e.g. `"1500 W"`.
#[must_use]
pub fn watts(value: f64) -> String {
    format!("{:.0} W", tidy(value.round()))
}

/// Kilowatt-hours with one decimal, e.g. `"13.5 kWh"`.
#[must_use]
pub fn kilowatt_hours(value: f64) -> String {
    format!("{:.1} kWh", tidy(value))
}

/// Watt-hours rendered as kilowatt-hours with one decimal.
#[must_use]
pub fn watt_hours_as_kwh(value: f64) -> String {
    kilowatt_hours(value / 1000.0)
}

/// Kilowatts with one decimal, e.g. `"5.0 kW"`.
#[must_use]
pub fn kilowatts(value: f64) -> String {
    format!("{:.1} kW", tidy(value))
}

/// A value already expressed out of 100, with one decimal: `87.345` → `"87.3%"`.
#[must_use]
pub fn percent(value: f64) -> String {
    format!("{:.1}%", tidy(value))
}

/// A 0–1 fraction rendered as a percentage: `0.183` → `"18.3%"`.
#[must_use]
pub fn fraction_as_percent(fraction: f64) -> String {
    percent(fraction * 100.0)
}

/// Square metres with two decimals.
#[must_use]
pub fn square_meters(value: f64) -> String {
    format!("{:.2} m\u{b2}", tidy(value))
}

/// Geographic coordinate with four decimals.
#[must_use]
pub fn coordinate(value: f64) -> String {
    format!("{:.4}", tidy(value))
}

/// Kilowatt-hours per hour of driving, with one decimal.
#[must_use]
pub fn kwh_per_hour(value: f64) -> String {
    format!("{:.1} kWh/h", tidy(value))
}

/// Local date-time, or [`MISSING`].
#[must_use]
pub fn timestamp(value: Option<&Timestamp>) -> String {
    value.map_or_else(|| MISSING.to_string(), to_local_string)
}

/// Fold negative zero into zero so `-0.0` never reaches the screen.
fn tidy(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}
