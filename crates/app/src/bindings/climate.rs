//! Air conditioners and heaters share one power envelope.

use crate::bindings::common::{self, quantity_field};
use crate::schema::{DisplayField, FormField, PageSchema};

fn display() -> Vec<DisplayField> {
    vec![
        DisplayField::formatted("rated_power_w", "Rated Power", common::watts),
        DisplayField::formatted("min_power_w", "Min Power", common::watts),
        DisplayField::formatted("max_power_w", "Max Power", common::watts),
    ]
}

fn form() -> Vec<FormField> {
    vec![
        common::name_field(),
        common::status_field(),
        quantity_field("rated_power_w", "Rated Power (W)", "1"),
        quantity_field("min_power_w", "Min Power (W)", "1"),
        quantity_field("max_power_w", "Max Power (W)", "1"),
    ]
}

#[must_use]
pub fn air_conditioners() -> PageSchema {
    PageSchema {
        title: "❄️ Air Conditioners",
        subtitle: "Review AC power bounds and real-time status.",
        empty_message: "No air conditioners found.",
        display: display(),
        form: form(),
        validators: Vec::new(),
    }
}

#[must_use]
pub fn heaters() -> PageSchema {
    PageSchema {
        title: "🔥 Heaters",
        subtitle: "Review heater power limits and online/offline status.",
        empty_message: "No heaters found.",
        display: display(),
        form: form(),
        validators: Vec::new(),
    }
}
