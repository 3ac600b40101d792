//! Privileged account constructors. These are free functions over an
//! explicit `UserRepository` handle rather than methods on the storage
//! type, so there is no hidden global state to reach through.

use crate::models::{NewUser, User};
use crate::repositories::user_repository::{RepositoryError, UserRepository};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Email is required")]
    EmailRequired,
    #[error("Superuser must have is_staff=true")]
    SuperuserMustBeStaff,
    #[error("Superuser must have is_superuser=true")]
    SuperuserMustBeSuperuser,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Password hashing failed: {0}")]
    HashingError(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Optional field overrides for the constructors. Unset fields take the
/// entity defaults.
#[derive(Debug, Clone, Default)]
pub struct UserOverrides {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// Lowercase the domain part of an email address. The local part is
/// case-sensitive by the standard, so it is left untouched.
pub fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

pub fn hash_password(password: &str) -> Result<String, IdentityError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| IdentityError::HashingError(e.to_string()))
}

/// Create and persist a regular user. The plaintext password never
/// reaches the repository.
pub async fn create_user(
    repo: &dyn UserRepository,
    email: &str,
    password: &str,
    overrides: UserOverrides,
) -> Result<User, IdentityError> {
    if email.is_empty() {
        return Err(IdentityError::EmailRequired);
    }

    let email = normalize_email(email);
    let password_hash = hash_password(password)?;

    let new_user = NewUser {
        email,
        first_name: overrides.first_name.unwrap_or_default(),
        last_name: overrides.last_name.unwrap_or_default(),
        password_hash,
        is_active: overrides.is_active.unwrap_or(true),
        is_staff: overrides.is_staff.unwrap_or(false),
        is_superuser: overrides.is_superuser.unwrap_or(false),
        is_verified: false,
        date_joined: chrono::Utc::now().to_rfc3339(),
    };

    match repo.insert(new_user).await {
        Ok(user) => Ok(user),
        Err(RepositoryError::AlreadyExists) => Err(IdentityError::EmailTaken),
        Err(e) => Err(IdentityError::Repository(e)),
    }
}

/// Create a superuser. Staff and superuser flags default to true and may
/// not be overridden to false.
pub async fn create_superuser(
    repo: &dyn UserRepository,
    email: &str,
    password: &str,
    mut overrides: UserOverrides,
) -> Result<User, IdentityError> {
    if overrides.is_staff == Some(false) {
        return Err(IdentityError::SuperuserMustBeStaff);
    }
    if overrides.is_superuser == Some(false) {
        return Err(IdentityError::SuperuserMustBeSuperuser);
    }

    overrides.is_staff = Some(true);
    overrides.is_superuser = Some(true);
    overrides.is_active = Some(overrides.is_active.unwrap_or(true));

    create_user(repo, email, password, overrides).await
}
