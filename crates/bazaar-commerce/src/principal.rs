//! Authenticated caller passed explicitly into every cart and order operation.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CommerceError;
use crate::ids::UserId;

/// User role for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular customer.
    #[default]
    Customer,
    /// Store administrator.
    Admin,
    /// Super admin with full access.
    SuperAdmin,
}

impl Role {
    /// Get role as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Check if this role has at least the given permission level.
    pub fn has_permission(&self, required: Role) -> bool {
        self.level() >= required.level()
    }

    /// Get permission level (higher = more permissions).
    pub fn level(&self) -> u8 {
        match self {
            Role::Customer => 0,
            Role::Admin => 1,
            Role::SuperAdmin => 2,
        }
    }
}

impl FromStr for Role {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" | "user" => Ok(Role::Customer),
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            other => Err(CommerceError::ValidationError(format!(
                "unknown role: {other}"
            ))),
        }
    }
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// User ID.
    pub user_id: UserId,
    /// Role carried by the credential.
    pub role: Role,
}

impl Principal {
    /// Create a principal.
    pub fn new(user_id: impl Into<UserId>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    /// Create a customer principal.
    pub fn customer(user_id: impl Into<UserId>) -> Self {
        Self::new(user_id, Role::Customer)
    }

    /// Create an admin principal.
    pub fn admin(user_id: impl Into<UserId>) -> Self {
        Self::new(user_id, Role::Admin)
    }

    /// Whether this principal is an admin or super admin.
    pub fn is_admin(&self) -> bool {
        self.role.has_permission(Role::Admin)
    }

    /// Owner-or-admin check for a resource owned by `owner`.
    pub fn can_access(&self, owner: &UserId) -> bool {
        &self.user_id == owner || self.is_admin()
    }

    /// Fail with `Unauthorized` unless the principal owns the resource or is an admin.
    pub fn ensure_access(&self, owner: &UserId, what: &str) -> Result<(), CommerceError> {
        if self.can_access(owner) {
            Ok(())
        } else {
            Err(CommerceError::Unauthorized(format!(
                "not authorized to access {what}"
            )))
        }
    }

    /// Fail with `Forbidden` unless the principal is an admin.
    pub fn ensure_admin(&self) -> Result<(), CommerceError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(CommerceError::Forbidden(format!(
                "role {} cannot perform admin operations",
                self.role.as_str()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permissions() {
        assert!(Role::Admin.has_permission(Role::Customer));
        assert!(Role::SuperAdmin.has_permission(Role::Admin));
        assert!(!Role::Customer.has_permission(Role::Admin));
    }

    #[test]
    fn test_owner_or_admin_access() {
        let owner = UserId::new("u1");
        assert!(Principal::customer("u1").can_access(&owner));
        assert!(!Principal::customer("u2").can_access(&owner));
        assert!(Principal::admin("a1").can_access(&owner));
        assert!(Principal::new("s1", Role::SuperAdmin).can_access(&owner));
    }

    #[test]
    fn test_ensure_admin_rejects_customer() {
        let err = Principal::customer("u1").ensure_admin().unwrap_err();
        assert_eq!(err.kind(), "Forbidden");
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("super_admin".parse::<Role>().unwrap(), Role::SuperAdmin);
        assert!("root".parse::<Role>().is_err());
    }
}
