use crate::domain::Role;

/// Who is looking at a list. Identity comes from trusted upstream headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewer {
    pub email: Option<String>,
    pub role: Option<Role>,
}

impl Viewer {
    pub fn new(email: Option<String>, role: Option<Role>) -> Self {
        Self { email, role }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn admin() -> Self {
        Self::new(None, Some(Role::Admin))
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }
}
