//! Declarative page schemas.
//!
//! A [`PageSchema`] is plain configuration: which fields a card shows and
//! how, which inputs the form has, and which cross-field rules the form must
//! satisfy. Schemas carry no state and are built once per page.

use serde_json::{Map, Value};
use wattdesk_domain::error::ValidationError;
use wattdesk_domain::format::MISSING;

use crate::form::{FormMode, FormValues, input_text};

/// Renders one display value. Receives the raw value and the whole record.
pub type Formatter = fn(&Value, &Map<String, Value>) -> String;

/// Cross-field form rule, checked after every per-field rule.
pub type Validator = fn(&FormValues, &FormMode) -> Result<(), ValidationError>;

/// One labelled value on a record card.
#[derive(Debug, Clone)]
pub struct DisplayField {
    pub key: &'static str,
    pub label: &'static str,
    pub formatter: Option<Formatter>,
}

impl DisplayField {
    /// Show the raw value as text.
    #[must_use]
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            formatter: None,
        }
    }

    /// Show the value through `formatter`.
    #[must_use]
    pub const fn formatted(key: &'static str, label: &'static str, formatter: Formatter) -> Self {
        Self {
            key,
            label,
            formatter: Some(formatter),
        }
    }

    /// Render this field for `record`.
    ///
    /// Missing or null values without a formatter render as [`MISSING`].
    #[must_use]
    pub fn render(&self, record: &Map<String, Value>) -> String {
        let raw = record.get(self.key).unwrap_or(&Value::Null);
        match self.formatter {
            Some(formatter) => formatter(raw, record),
            None if raw.is_null() => MISSING.to_string(),
            None => input_text(raw),
        }
    }
}

/// Input control of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Parsed to a JSON number; empty input becomes `null`.
    Number,
    /// One of a fixed list of options, submitted as the option's typed value.
    Select,
    /// Free text rendered masked.
    Password,
}

/// One choice of a select field.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub label: &'static str,
    pub value: Value,
}

impl SelectOption {
    #[must_use]
    pub fn new(label: &'static str, value: impl Into<Value>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// Whether a form field ends up in the write payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayloadRule {
    #[default]
    Always,
    /// Sent only when the input is non-empty (e.g. a password on edit).
    OmitWhenEmpty,
    /// Checked by validators but never sent (e.g. a confirmation input).
    Never,
}

/// One form input.
#[derive(Debug, Clone)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub options: Vec<SelectOption>,
    /// Input granularity hint for renderers, e.g. `"0.01"`.
    pub step: Option<&'static str>,
    pub min: Option<f64>,
    pub placeholder: Option<&'static str>,
    pub default: Option<Value>,
    pub payload: PayloadRule,
}

impl FormField {
    fn with_kind(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: false,
            options: Vec::new(),
            step: None,
            min: None,
            placeholder: None,
            default: None,
            payload: PayloadRule::Always,
        }
    }

    #[must_use]
    pub fn text(key: &'static str, label: &'static str) -> Self {
        Self::with_kind(key, label, FieldKind::Text)
    }

    #[must_use]
    pub fn number(key: &'static str, label: &'static str) -> Self {
        Self::with_kind(key, label, FieldKind::Number)
    }

    #[must_use]
    pub fn password(key: &'static str, label: &'static str) -> Self {
        Self::with_kind(key, label, FieldKind::Password)
    }

    #[must_use]
    pub fn select(key: &'static str, label: &'static str, options: Vec<SelectOption>) -> Self {
        Self {
            options,
            ..Self::with_kind(key, label, FieldKind::Select)
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn step(mut self, step: &'static str) -> Self {
        self.step = Some(step);
        self
    }

    #[must_use]
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn payload(mut self, rule: PayloadRule) -> Self {
        self.payload = rule;
        self
    }

    /// The option whose value renders as `raw`.
    #[must_use]
    pub fn option_for(&self, raw: &str) -> Option<&SelectOption> {
        self.options
            .iter()
            .find(|option| input_text(&option.value) == raw)
    }
}

/// Everything a generic record page needs to know about one record type.
#[derive(Debug, Clone)]
pub struct PageSchema {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub empty_message: &'static str,
    pub display: Vec<DisplayField>,
    pub form: Vec<FormField>,
    pub validators: Vec<Validator>,
}

impl PageSchema {
    /// Look up a form field by key.
    #[must_use]
    pub fn form_field(&self, key: &str) -> Option<&FormField> {
        self.form.iter().find(|field| field.key == key)
    }
}
