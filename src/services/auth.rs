//! Credential check against the user table. Every failure mode collapses
//! into `InvalidCredentials` so responses never reveal whether an email
//! is registered.

use crate::models::User;
use crate::repositories::user_repository::UserRepository;
use crate::services::identity::normalize_email;
use argon2::{password_hash::PasswordHash, Argon2, PasswordVerifier};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User not found")]
    UserNotFound,
    #[error("Repository error: {0}")]
    Repository(#[from] crate::repositories::user_repository::RepositoryError),
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    if let Ok(parsed_hash) = PasswordHash::new(password_hash) {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    } else {
        false
    }
}

pub async fn authenticate(
    repo: &dyn UserRepository,
    email: &str,
    password: &str,
) -> Result<User, AuthError> {
    let user = repo
        .find_by_email(&normalize_email(email))
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(password, &user.password_hash) {
        return Err(AuthError::InvalidCredentials);
    }

    // Deactivated accounts fail the same way as bad passwords.
    if !user.is_active {
        return Err(AuthError::InvalidCredentials);
    }

    Ok(user)
}

pub async fn get_user_by_id(repo: &dyn UserRepository, user_id: i64) -> Result<User, AuthError> {
    repo.find_by_id(user_id)
        .await?
        .ok_or(AuthError::UserNotFound)
}
