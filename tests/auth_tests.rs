use doorman::{
    repositories::SqliteUserRepository,
    services::{
        auth::{self, AuthError},
        identity::{self, UserOverrides},
    },
    test_utils::test_helpers,
};

#[tokio::test]
async fn authenticate_success_with_correct_credentials() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repo = SqliteUserRepository::new(pool);

    let created = identity::create_user(
        &repo,
        "auth@example.com",
        "correctpassword",
        UserOverrides::default(),
    )
    .await
    .unwrap();

    let user = auth::authenticate(&repo, "auth@example.com", "correctpassword")
        .await
        .unwrap();
    assert_eq!(user.id, created.id);
}

#[tokio::test]
async fn authenticate_accepts_unnormalized_email() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repo = SqliteUserRepository::new(pool);

    identity::create_user(
        &repo,
        "casey@example.com",
        "correctpassword",
        UserOverrides::default(),
    )
    .await
    .unwrap();

    let result = auth::authenticate(&repo, "casey@EXAMPLE.COM", "correctpassword").await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn wrong_password_and_unknown_email_fail_identically() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repo = SqliteUserRepository::new(pool);

    identity::create_user(
        &repo,
        "known@example.com",
        "correctpassword",
        UserOverrides::default(),
    )
    .await
    .unwrap();

    let wrong_password = auth::authenticate(&repo, "known@example.com", "wrongpassword")
        .await
        .unwrap_err();
    let unknown_email = auth::authenticate(&repo, "unknown@example.com", "anypassword")
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    assert!(matches!(unknown_email, AuthError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

#[tokio::test]
async fn inactive_account_cannot_log_in() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repo = SqliteUserRepository::new(pool);

    identity::create_user(
        &repo,
        "inactive@example.com",
        "correctpassword",
        UserOverrides {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let result = auth::authenticate(&repo, "inactive@example.com", "correctpassword").await;
    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
}
