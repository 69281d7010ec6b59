//! User administration.
//!
//! Passwords are write-only: required when creating an account, sent on edit
//! only when typed, and the confirmation input is never sent.

use serde_json::{Map, Value};
use wattdesk_domain::error::ValidationError;
use wattdesk_domain::user;

use crate::bindings::common;
use crate::form::{FormMode, FormValues};
use crate::schema::{DisplayField, FormField, PageSchema, PayloadRule, SelectOption, Validator};

fn role(value: &Value, _record: &Map<String, Value>) -> String {
    user::role_label(value.as_bool().unwrap_or(false)).to_string()
}

fn activity(value: &Value, _record: &Map<String, Value>) -> String {
    user::activity_label(value.as_bool().unwrap_or(false)).to_string()
}

fn passwords(values: &FormValues, mode: &FormMode) -> Result<(), ValidationError> {
    let password = values.get("password").map_or("", String::as_str);
    let confirmation = values.get("password_confirm").map_or("", String::as_str);
    if *mode == FormMode::Create && password.is_empty() {
        return Err(ValidationError::Required {
            field: "Password".to_string(),
        });
    }
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

#[must_use]
pub fn schema() -> PageSchema {
    PageSchema {
        title: "👥 Users",
        subtitle: "Manage accounts, roles, and access.",
        empty_message: "No users found.",
        display: vec![
            DisplayField::new("email", "Email"),
            DisplayField::formatted("is_staff", "Role", role),
            DisplayField::new("device_count", "Devices"),
            DisplayField::formatted("is_active", "Status", activity),
            DisplayField::formatted("date_joined", "Joined", common::timestamp),
        ],
        form: vec![
            FormField::text("username", "Username").required(),
            FormField::text("email", "Email").placeholder("name@example.com"),
            FormField::text("first_name", "First Name"),
            FormField::text("last_name", "Last Name"),
            FormField::select(
                "is_staff",
                "Role",
                vec![SelectOption::new("User", false), SelectOption::new("Admin", true)],
            )
            .default_value(false),
            FormField::select(
                "is_active",
                "Status",
                vec![
                    SelectOption::new("Active", true),
                    SelectOption::new("Inactive", false),
                ],
            )
            .default_value(true),
            FormField::password("password", "Password").payload(PayloadRule::OmitWhenEmpty),
            FormField::password("password_confirm", "Confirm Password").payload(PayloadRule::Never),
        ],
        validators: vec![passwords as Validator],
    }
}
