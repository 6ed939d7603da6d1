use serde::Serialize;
use serde_json::Value;

use crate::core::{EntityId, ValidationIssue};
use crate::validation::{EntitySchema, Validated, parse_id};

/// One pending user action against a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "data", rename_all = "lowercase")]
pub enum OptimisticAction<D, P> {
    Create(D),
    Update(P),
    Delete(EntityId),
    /// A dispatch whose kind is none of the above. Reconciles to a no-op.
    Unsupported(String),
}

impl<D, P> OptimisticAction<D, P> {
    pub fn kind(&self) -> &str {
        match self {
            Self::Create(_) => "create",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
            Self::Unsupported(kind) => kind,
        }
    }

    /// Parse the `{ "action": kind, "data": {...} }` wire form through the
    /// entity's schemas. Unknown kinds are not an error.
    pub fn parse<S>(value: &Value) -> Validated<Self>
    where
        S: EntitySchema<Insert = D, Update = P>,
    {
        let kind = match value.get("action") {
            Some(Value::String(kind)) => kind.as_str(),
            Some(_) => return Err(vec![ValidationIssue::invalid_type("action", "string")]),
            None => return Err(vec![ValidationIssue::required("action")]),
        };
        let data = value.get("data").unwrap_or(&Value::Null);
        let read_id = || parse_id(data.get("id").and_then(Value::as_str));

        match kind {
            "create" => S::insert(data).map(Self::Create),
            "update" => {
                let id = read_id()?;
                S::update(&id, data).map(Self::Update)
            }
            "delete" => read_id().map(Self::Delete),
            other => Ok(Self::Unsupported(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmployeePatch, NewEmployee};
    use crate::validation::EmployeeSchema;
    use serde_json::json;

    type EmployeeAction = OptimisticAction<NewEmployee, EmployeePatch>;

    #[test]
    fn test_wire_actions_parse_through_entity_schemas() {
        let create = EmployeeAction::parse::<EmployeeSchema>(&json!({
            "action": "create",
            "data": { "firstName": "Ann", "email": "ann@example.com" }
        }))
        .unwrap();
        assert_eq!(create.kind(), "create");

        let delete = EmployeeAction::parse::<EmployeeSchema>(&json!({
            "action": "delete",
            "data": { "id": "e1" }
        }))
        .unwrap();
        assert_eq!(delete, EmployeeAction::Delete("e1".into()));
    }

    #[test]
    fn test_unknown_kind_becomes_unsupported() {
        let parsed = EmployeeAction::parse::<EmployeeSchema>(&json!({
            "action": "archive",
            "data": { "id": "e1" }
        }))
        .unwrap();
        assert_eq!(parsed, EmployeeAction::Unsupported("archive".into()));
    }

    #[test]
    fn test_update_without_id_is_invalid() {
        let issues = EmployeeAction::parse::<EmployeeSchema>(&json!({
            "action": "update",
            "data": { "firstName": "Ann", "email": "ann@example.com" }
        }))
        .unwrap_err();
        assert_eq!(issues[0].path, vec!["id"]);
    }
}
