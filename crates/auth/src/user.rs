//! User accounts.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use dscommerce_core::UserId;

use crate::Role;

/// Registered user and the roles granted to it.
///
/// The password is stored as an opaque hash (e.g. BCrypt); it is never
/// serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: NaiveDate,
    #[serde(skip_serializing, default)]
    pub password: String,
    roles: HashSet<Role>,
}

impl User {
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        birth_date: NaiveDate,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            birth_date,
            password: password.into(),
            roles: HashSet::new(),
        }
    }

    pub fn add_role(&mut self, role: Role) {
        self.roles.insert(role);
    }

    pub fn roles(&self) -> &HashSet<Role> {
        &self.roles
    }

    pub fn has_role(&self, authority: &str) -> bool {
        self.roles.iter().any(|r| r.authority() == authority)
    }

    /// The email doubles as the login name.
    pub fn username(&self) -> &str {
        &self.email
    }
}
