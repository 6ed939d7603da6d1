use serde_json::Value;

use crate::core::ValidationIssue;
use crate::domain::{EmployeePatch, NewEmployee, ROLES, Role};
use crate::validation::{EntitySchema, ObjectReader, Validated, is_valid_email};

pub struct EmployeeSchema;

impl EntitySchema for EmployeeSchema {
    type Insert = NewEmployee;
    type Update = EmployeePatch;

    fn insert(value: &Value) -> Validated<NewEmployee> {
        insert_employee_params(value)
    }

    fn update(id: &str, value: &Value) -> Validated<EmployeePatch> {
        update_employee_params(id, value)
    }
}

/// Body of a create request: every field except id and timestamps.
pub fn insert_employee_params(value: &Value) -> Validated<NewEmployee> {
    let mut reader = ObjectReader::new(value)?;
    let first_name = reader.required_string("firstName");
    let email = read_email(&mut reader);
    let last_name = reader.nullable_string("lastName").flatten();
    let role = read_role(&mut reader).flatten();

    reader.finish(|| {
        Some(NewEmployee {
            last_name: blank_to_none(last_name),
            first_name: first_name?,
            email: email?,
            role,
        })
    })
}

/// Body of an update request. First name and email are always resubmitted
/// by the edit form; the nullable fields keep their value when omitted.
pub fn update_employee_params(id: &str, value: &Value) -> Validated<EmployeePatch> {
    let mut reader = ObjectReader::new(value)?;
    let first_name = reader.required_string("firstName");
    let email = read_email(&mut reader);
    let last_name = reader
        .nullable_string("lastName")
        .map(blank_to_none);
    let role = read_role(&mut reader);

    reader.finish(|| {
        Some(EmployeePatch {
            id: id.to_string(),
            first_name: Some(first_name?),
            email: Some(email?),
            last_name,
            role,
        })
    })
}

fn read_email(reader: &mut ObjectReader<'_>) -> Option<String> {
    let email = reader.required_string("email")?;
    if is_valid_email(&email) {
        Some(email)
    } else {
        reader.push(ValidationIssue::new("invalid_string", "email", "Invalid email"));
        None
    }
}

/// Empty text counts as "no role".
fn read_role(reader: &mut ObjectReader<'_>) -> Option<Option<Role>> {
    let raw = reader.nullable_string("role")?;
    let Some(raw) = raw.filter(|text| !text.trim().is_empty()) else {
        return Some(None);
    };
    match Role::parse(&raw) {
        Some(role) => Some(Some(role)),
        None => {
            let expected = ROLES
                .iter()
                .map(|role| format!("'{role}'"))
                .collect::<Vec<_>>()
                .join(" | ");
            reader.push(ValidationIssue::new(
                "invalid_enum_value",
                "role",
                format!("Invalid enum value. Expected {expected}, received '{raw}'"),
            ));
            None
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
