use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::EntityId;
use crate::domain::{overlay, overlay_nullable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

pub const ROLES: [Role; 2] = [Role::Admin, Role::Employee];

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Employee => "employee",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        ROLES
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EntityId,
    pub last_name: Option<String>,
    pub first_name: String,
    pub email: String,
    pub role: Option<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// "Last, First" when a last name is known, otherwise just the first name.
    pub fn full_name(&self) -> String {
        match self.last_name.as_deref() {
            Some(last) if !last.is_empty() => format!("{last}, {}", self.first_name),
            _ => self.first_name.clone(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    pub(crate) fn from_new(id: EntityId, input: &NewEmployee, now: DateTime<Utc>) -> Self {
        Self {
            id,
            last_name: input.last_name.clone(),
            first_name: input.first_name.clone(),
            email: input.email.clone(),
            role: input.role,
            created_at: now,
            updated_at: now,
        }
    }
}

pub fn to_full_name(employee: Option<&Employee>) -> Option<String> {
    employee.map(Employee::full_name)
}

/// Validated insert params.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub last_name: Option<String>,
    pub first_name: String,
    pub email: String,
    pub role: Option<Role>,
}

/// Validated partial update. Nullable fields are tri-state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePatch {
    pub id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Option<Role>>,
}

impl EmployeePatch {
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, employee: &mut Employee) {
        overlay(&mut employee.first_name, &self.first_name);
        overlay(&mut employee.email, &self.email);
        overlay_nullable(&mut employee.last_name, &self.last_name);
        overlay_nullable(&mut employee.role, &self.role);
    }
}
