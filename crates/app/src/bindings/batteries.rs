//! Stationary batteries.

use crate::bindings::common::{self, quantity_field};
use crate::schema::{DisplayField, PageSchema};

#[must_use]
pub fn schema() -> PageSchema {
    PageSchema {
        title: "🔋 Batteries",
        subtitle: "Monitor stored energy, charge levels, and charge/discharge limits.",
        empty_message: "No batteries found.",
        display: vec![
            DisplayField::formatted("capacity_kwh", "Capacity", common::kilowatt_hours),
            DisplayField::formatted("current_charge_kwh", "Current Charge", common::kilowatt_hours),
            DisplayField::formatted("charge_percentage", "Charge Level", common::percent),
            DisplayField::formatted("max_charge_rate_kw", "Max Charge Rate", common::kilowatts),
            DisplayField::formatted("max_discharge_rate_kw", "Max Discharge Rate", common::kilowatts),
        ],
        form: vec![
            common::name_field(),
            common::status_field(),
            quantity_field("capacity_kwh", "Capacity (kWh)", "0.1"),
            quantity_field("current_charge_kwh", "Current Charge (kWh)", "0.1"),
            quantity_field("max_charge_rate_kw", "Max Charge Rate (kW)", "0.1"),
            quantity_field("max_discharge_rate_kw", "Max Discharge Rate (kW)", "0.1"),
        ],
        validators: Vec::new(),
    }
}
