//! Form state and write-payload projection.
//!
//! Inputs are held as the strings a user typed. Turning them into a payload
//! is the only place values get typed: numbers are parsed, empty numbers
//! become `null`, select inputs map back to their option's value, and
//! fields are dropped according to their [`PayloadRule`].

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};
use wattdesk_domain::error::ValidationError;
use wattdesk_domain::id::RecordId;

use crate::ports::Payload;
use crate::schema::{FieldKind, FormField, PageSchema, PayloadRule};

/// Raw input text keyed by form field key.
pub type FormValues = BTreeMap<String, String>;

/// Whether the open form creates a record or edits one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: RecordId, name: String },
}

/// An open form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub mode: FormMode,
    pub values: FormValues,
}

impl FormState {
    /// A blank form seeded with field defaults.
    #[must_use]
    pub fn create(schema: &PageSchema) -> Self {
        let values = schema
            .form
            .iter()
            .map(|field| {
                let initial = match (&field.default, field.key) {
                    (Some(default), _) => input_text(default),
                    (None, "status") => "online".to_string(),
                    (None, _) => String::new(),
                };
                (field.key.to_string(), initial)
            })
            .collect();
        Self {
            mode: FormMode::Create,
            values,
        }
    }

    /// A form pre-filled from an existing record. Missing or null values
    /// become empty inputs.
    #[must_use]
    pub fn edit(schema: &PageSchema, id: RecordId, name: String, record: &Map<String, Value>) -> Self {
        let values = schema
            .form
            .iter()
            .map(|field| {
                let current = record.get(field.key).map(input_text).unwrap_or_default();
                (field.key.to_string(), current)
            })
            .collect();
        Self {
            mode: FormMode::Edit { id, name },
            values,
        }
    }

    /// Heading of the form.
    #[must_use]
    pub fn title(&self, schema: &PageSchema) -> String {
        match &self.mode {
            FormMode::Create => format!(
                "Add {}",
                schema.title.trim_start_matches(|c: char| !c.is_alphabetic())
            ),
            FormMode::Edit { name, .. } => format!("Edit {name}"),
        }
    }
}

/// Validate `values` against `schema` and project them into a payload.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found: per-field rules in form
/// order, then the schema's cross-field validators.
pub fn build_payload(
    schema: &PageSchema,
    values: &FormValues,
    mode: &FormMode,
) -> Result<Payload, ValidationError> {
    let mut payload = Payload::new();
    for field in &schema.form {
        let raw = values.get(field.key).map_or("", String::as_str);
        let value = field_value(field, raw)?;
        let keep = match field.payload {
            PayloadRule::Always => true,
            PayloadRule::OmitWhenEmpty => !raw.is_empty(),
            PayloadRule::Never => false,
        };
        if keep {
            payload.insert(field.key.to_string(), value);
        }
    }
    for validator in &schema.validators {
        validator(values, mode)?;
    }
    Ok(payload)
}

fn field_value(field: &FormField, raw: &str) -> Result<Value, ValidationError> {
    if field.required && raw.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.label.to_string(),
        });
    }
    match field.kind {
        FieldKind::Text | FieldKind::Password => Ok(Value::String(raw.to_string())),
        FieldKind::Select => Ok(field
            .option_for(raw)
            .map_or_else(|| Value::String(raw.to_string()), |option| option.value.clone())),
        FieldKind::Number => number_value(field, raw.trim()),
    }
}

#[allow(clippy::cast_precision_loss)]
fn number_value(field: &FormField, raw: &str) -> Result<Value, ValidationError> {
    if raw.is_empty() {
        return Ok(Value::Null);
    }
    let not_a_number = || ValidationError::NotANumber {
        field: field.label.to_string(),
    };
    let (number, as_f64) = if let Ok(integer) = raw.parse::<i64>() {
        (Number::from(integer), integer as f64)
    } else {
        let float = raw.parse::<f64>().map_err(|_| not_a_number())?;
        (Number::from_f64(float).ok_or_else(not_a_number)?, float)
    };
    if let Some(min) = field.min
        && as_f64 < min
    {
        return Err(ValidationError::BelowMinimum {
            field: field.label.to_string(),
            min,
        });
    }
    Ok(Value::Number(number))
}

/// The input text for a stored value: null is empty, strings are verbatim,
/// everything else uses its JSON rendering.
#[must_use]
pub fn input_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SelectOption;
    use serde_json::json;

    fn schema() -> PageSchema {
        PageSchema {
            title: "Batteries",
            subtitle: "",
            empty_message: "",
            display: Vec::new(),
            form: vec![
                FormField::text("name", "Name").required(),
                FormField::select(
                    "status",
                    "Status",
                    vec![
                        SelectOption::new("Online", "online"),
                        SelectOption::new("Offline", "offline"),
                    ],
                ),
                FormField::number("capacity_kwh", "Capacity (kWh)").min(0.0),
                FormField::select(
                    "is_staff",
                    "Role",
                    vec![SelectOption::new("Admin", true), SelectOption::new("User", false)],
                )
                .default_value(false),
                FormField::password("password", "Password").payload(PayloadRule::OmitWhenEmpty),
                FormField::password("password_confirm", "Confirm").payload(PayloadRule::Never),
            ],
            validators: Vec::new(),
        }
    }

    fn values(pairs: &[(&str, &str)]) -> FormValues {
        let mut values = FormState::create(&schema()).values;
        for (key, value) in pairs {
            values.insert((*key).to_string(), (*value).to_string());
        }
        values
    }

    #[test]
    fn should_seed_create_form_with_defaults_and_online_status() {
        let form = FormState::create(&schema());
        assert_eq!(form.values["status"], "online");
        assert_eq!(form.values["is_staff"], "false");
        assert_eq!(form.values["capacity_kwh"], "");
        assert_eq!(form.title(&schema()), "Add Batteries");
    }

    #[test]
    fn should_prefill_edit_form_and_blank_missing_values() {
        let record = match json!({"name": "Garage", "status": "offline", "capacity_kwh": 13.5, "password": null}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let form = FormState::edit(&schema(), RecordId::from(3), "Garage".to_string(), &record);
        assert_eq!(form.values["capacity_kwh"], "13.5");
        assert_eq!(form.values["password"], "");
        assert_eq!(form.values["is_staff"], "");
        assert_eq!(form.title(&schema()), "Edit Garage");
    }

    #[test]
    fn should_send_empty_number_as_null() {
        let payload = build_payload(&schema(), &values(&[("name", "Garage")]), &FormMode::Create).unwrap();
        assert_eq!(payload["capacity_kwh"], Value::Null);
    }

    #[test]
    fn should_parse_numbers_and_map_select_values_to_typed_options() {
        let payload = build_payload(
            &schema(),
            &values(&[("name", "Garage"), ("capacity_kwh", "13.5"), ("is_staff", "true")]),
            &FormMode::Create,
        )
        .unwrap();
        assert_eq!(payload["capacity_kwh"], json!(13.5));
        assert_eq!(payload["is_staff"], json!(true));
        assert_eq!(payload["status"], json!("online"));
    }

    #[test]
    fn should_pass_through_select_values_without_option() {
        let payload = build_payload(
            &schema(),
            &values(&[("name", "Garage"), ("status", "maintenance")]),
            &FormMode::Create,
        )
        .unwrap();
        assert_eq!(payload["status"], json!("maintenance"));
    }

    #[test]
    fn should_reject_non_numeric_and_below_minimum_input() {
        let err = build_payload(
            &schema(),
            &values(&[("name", "Garage"), ("capacity_kwh", "lots")]),
            &FormMode::Create,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::NotANumber { .. }));

        let err = build_payload(
            &schema(),
            &values(&[("name", "Garage"), ("capacity_kwh", "-1")]),
            &FormMode::Create,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::BelowMinimum { .. }));
    }

    #[test]
    fn should_require_non_blank_required_fields() {
        let err = build_payload(&schema(), &values(&[("name", "   ")]), &FormMode::Create).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Required {
                field: "Name".to_string()
            }
        );
    }

    #[test]
    fn should_apply_payload_rules() {
        let without = build_payload(&schema(), &values(&[("name", "Garage")]), &FormMode::Create).unwrap();
        assert!(!without.contains_key("password"));
        assert!(!without.contains_key("password_confirm"));

        let with = build_payload(
            &schema(),
            &values(&[("name", "Garage"), ("password", "s3cret"), ("password_confirm", "s3cret")]),
            &FormMode::Create,
        )
        .unwrap();
        assert_eq!(with["password"], json!("s3cret"));
        assert!(!with.contains_key("password_confirm"));
    }

    #[test]
    fn should_run_cross_field_validators_last() {
        fn always_fails(_: &FormValues, _: &FormMode) -> Result<(), ValidationError> {
            Err(ValidationError::PasswordMismatch)
        }
        let mut schema = schema();
        schema.validators.push(always_fails);
        let err = build_payload(&schema, &values(&[("name", "Garage")]), &FormMode::Create).unwrap_err();
        assert_eq!(err, ValidationError::PasswordMismatch);
    }
}
