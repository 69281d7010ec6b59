//! Electric vehicles.

use serde_json::{Map, Value};

use crate::bindings::common::{self, quantity_field};
use crate::schema::{DisplayField, FormField, PageSchema, SelectOption};

fn mode(value: &Value, _record: &Map<String, Value>) -> String {
    value
        .as_str()
        .filter(|mode| !mode.is_empty())
        .unwrap_or("offline")
        .to_uppercase()
}

#[must_use]
pub fn schema() -> PageSchema {
    PageSchema {
        title: "🚗 Electric Vehicles",
        subtitle: "Track EV mode, charge levels, and charging/discharging limits.",
        empty_message: "No electric vehicles found.",
        display: vec![
            DisplayField::formatted("mode", "Mode", mode),
            DisplayField::formatted("capacity_kwh", "Capacity", common::kilowatt_hours),
            DisplayField::formatted("current_charge_kwh", "Current Charge", common::kilowatt_hours),
            DisplayField::formatted("charge_percentage", "Charge Level", common::percent),
            DisplayField::formatted("max_charge_rate_kw", "Max Charge Rate", common::kilowatts),
            DisplayField::formatted("max_discharge_rate_kw", "Max Discharge Rate", common::kilowatts),
            DisplayField::formatted("last_seen_at", "Last Seen", common::timestamp),
        ],
        form: vec![
            common::name_field(),
            common::status_field(),
            FormField::select(
                "mode",
                "Mode",
                vec![
                    SelectOption::new("Charging", "charging"),
                    SelectOption::new("Discharging", "discharging"),
                    SelectOption::new("Offline", "offline"),
                ],
            )
            .required()
            .default_value("offline"),
            quantity_field("capacity_kwh", "Capacity (kWh)", "0.1"),
            quantity_field("current_charge_kwh", "Current Charge (kWh)", "0.1"),
            quantity_field("max_charge_rate_kw", "Max Charge Rate (kW)", "0.1"),
            quantity_field("max_discharge_rate_kw", "Max Discharge Rate (kW)", "0.1"),
            quantity_field(
                "driving_efficiency_kwh_per_hour",
                "Driving Efficiency (kWh/h)",
                "0.1",
            ),
        ],
        validators: Vec::new(),
    }
}
