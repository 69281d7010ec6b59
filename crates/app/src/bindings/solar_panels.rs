//! Solar panels.

use crate::bindings::common::{self, quantity_field};
use crate::schema::{DisplayField, FormField, PageSchema};

#[must_use]
pub fn schema() -> PageSchema {
    PageSchema {
        title: "☀️ Solar Panels",
        subtitle: "View panel efficiency, output limits, and configured location.",
        empty_message: "No solar panels found.",
        display: vec![
            DisplayField::formatted("panel_area_m2", "Panel Area", common::square_meters),
            DisplayField::formatted("efficiency", "Efficiency", common::fraction_as_percent),
            DisplayField::formatted("max_capacity_w", "Max Capacity", common::watts),
            DisplayField::formatted("latitude", "Latitude", common::coordinate),
            DisplayField::formatted("longitude", "Longitude", common::coordinate),
        ],
        form: vec![
            common::name_field(),
            common::status_field(),
            quantity_field("panel_area_m2", "Panel Area (m²)", "0.01"),
            quantity_field("efficiency", "Efficiency (0-1)", "0.01"),
            quantity_field("max_capacity_w", "Max Capacity (W)", "1"),
            FormField::number("latitude", "Latitude").required().step("0.0001"),
            FormField::number("longitude", "Longitude").required().step("0.0001"),
        ],
        validators: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FormMode, FormState, build_payload};

    #[test]
    fn should_accept_negative_coordinates() {
        let schema = schema();
        let mut form = FormState::create(&schema);
        for (key, value) in [
            ("name", "Roof"),
            ("panel_area_m2", "24.5"),
            ("efficiency", "0.21"),
            ("max_capacity_w", "5000"),
            ("latitude", "-33.8688"),
            ("longitude", "-151.2093"),
        ] {
            form.values.insert(key.to_string(), value.to_string());
        }
        let payload = build_payload(&schema, &form.values, &FormMode::Create).unwrap();
        assert_eq!(payload["latitude"], serde_json::json!(-33.8688));
        assert_eq!(payload["max_capacity_w"], serde_json::json!(5000));
    }
}
