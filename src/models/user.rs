use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account record keyed by email (the natural login key).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_verified: bool,
    pub date_joined: String,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Capability check over the flag set. Superusers hold every
    /// permission, staff hold the administrative ones, inactive
    /// accounts hold none.
    pub fn has_perm(&self, perm: Permission) -> bool {
        if !self.is_active {
            return false;
        }
        match perm {
            Permission::Admin => self.is_staff || self.is_superuser,
            Permission::ManageUsers => self.is_superuser,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Admin,
    ManageUsers,
}

/// Field set handed to the repository by `create_user`. The password is
/// already hashed by the time this exists.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_verified: bool,
    pub date_joined: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(active: bool, staff: bool, superuser: bool) -> User {
        User {
            id: 1,
            email: "a@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            password_hash: "hash".to_string(),
            is_active: active,
            is_staff: staff,
            is_superuser: superuser,
            is_verified: false,
            date_joined: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn full_name_trims_missing_parts() {
        let mut u = user(true, false, false);
        assert_eq!(u.full_name(), "Ada Lovelace");
        u.last_name.clear();
        assert_eq!(u.full_name(), "Ada");
        u.first_name.clear();
        assert_eq!(u.full_name(), "");
    }

    #[test]
    fn inactive_users_hold_no_permissions() {
        let u = user(false, true, true);
        assert!(!u.has_perm(Permission::Admin));
        assert!(!u.has_perm(Permission::ManageUsers));
    }

    #[test]
    fn staff_gets_admin_but_not_user_management() {
        let u = user(true, true, false);
        assert!(u.has_perm(Permission::Admin));
        assert!(!u.has_perm(Permission::ManageUsers));
    }
}
