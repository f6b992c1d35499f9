use std::borrow::Cow;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use dscommerce_core::RoleId;

pub const ROLE_CLIENT: &str = "ROLE_CLIENT";
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// Granted authority (e.g. `ROLE_ADMIN`).
///
/// Two roles are the same role when their authorities match; the id is only a
/// storage key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    authority: Cow<'static, str>,
}

impl Role {
    pub fn new(id: RoleId, authority: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id,
            authority: authority.into(),
        }
    }

    pub fn client() -> Self {
        Self::new(RoleId::new(1), ROLE_CLIENT)
    }

    pub fn admin() -> Self {
        Self::new(RoleId::new(2), ROLE_ADMIN)
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }
}

impl PartialEq for Role {
    fn eq(&self, other: &Self) -> bool {
        self.authority == other.authority
    }
}

impl Eq for Role {}

impl Hash for Role {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.authority.hash(state);
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.authority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_compare_by_authority() {
        assert_eq!(Role::new(RoleId::new(1), ROLE_CLIENT), Role::new(RoleId::new(9), ROLE_CLIENT));
        assert_ne!(Role::client(), Role::admin());
    }

    #[test]
    fn displays_authority() {
        assert_eq!(Role::admin().to_string(), "ROLE_ADMIN");
    }
}
