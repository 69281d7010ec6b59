//! Generators.

use crate::bindings::common::{self, quantity_field};
use crate::schema::{DisplayField, PageSchema};

#[must_use]
pub fn schema() -> PageSchema {
    PageSchema {
        title: "⚡ Generators",
        subtitle: "Inspect generator output ratings and operational status.",
        empty_message: "No generators found.",
        display: vec![DisplayField::formatted(
            "rated_output_w",
            "Rated Output",
            common::watts,
        )],
        form: vec![
            common::name_field(),
            common::status_field(),
            quantity_field("rated_output_w", "Rated Output (W)", "1"),
        ],
        validators: Vec::new(),
    }
}
