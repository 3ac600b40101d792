use doorman::{
    repositories::SqliteUserRepository,
    services::identity::{self, IdentityError, UserOverrides},
    test_utils::test_helpers,
};

#[tokio::test]
async fn create_user_persists_hashed_password() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repo = SqliteUserRepository::new(pool);

    let user = identity::create_user(
        &repo,
        "jane@example.com",
        "password123",
        UserOverrides {
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(user.email, "jane@example.com");
    assert_eq!(user.first_name, "Jane");
    assert_ne!(user.password_hash, "password123");
    assert!(user.password_hash.starts_with("$argon2"));
    assert!(user.is_active);
    assert!(!user.is_staff);
    assert!(!user.is_superuser);
    assert!(!user.is_verified);
    assert!(!user.date_joined.is_empty());
}

#[tokio::test]
async fn duplicate_email_fails_even_with_different_domain_case() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repo = SqliteUserRepository::new(pool);

    identity::create_user(
        &repo,
        "dup@example.com",
        "password123",
        UserOverrides::default(),
    )
    .await
    .unwrap();

    // Same address, domain cased differently; normalization collapses them.
    let result = identity::create_user(
        &repo,
        "dup@EXAMPLE.COM",
        "password456",
        UserOverrides::default(),
    )
    .await;

    assert!(matches!(result, Err(IdentityError::EmailTaken)));
}

#[tokio::test]
async fn empty_email_is_rejected_before_touching_the_store() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repo = SqliteUserRepository::new(pool);

    let result = identity::create_user(&repo, "", "password123", UserOverrides::default()).await;
    assert!(matches!(result, Err(IdentityError::EmailRequired)));
}

#[tokio::test]
async fn create_superuser_defaults_flags_to_true() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repo = SqliteUserRepository::new(pool);

    let user = identity::create_superuser(
        &repo,
        "root@example.com",
        "password123",
        UserOverrides::default(),
    )
    .await
    .unwrap();

    assert!(user.is_staff);
    assert!(user.is_superuser);
    assert!(user.is_active);
}

#[tokio::test]
async fn create_superuser_rejects_flag_downgrades() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repo = SqliteUserRepository::new(pool);

    let result = identity::create_superuser(
        &repo,
        "root@example.com",
        "password123",
        UserOverrides {
            is_staff: Some(false),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(result, Err(IdentityError::SuperuserMustBeStaff)));

    let result = identity::create_superuser(
        &repo,
        "root@example.com",
        "password123",
        UserOverrides {
            is_superuser: Some(false),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(
        result,
        Err(IdentityError::SuperuserMustBeSuperuser)
    ));
}

#[tokio::test]
async fn find_by_email_is_the_natural_key_lookup() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repo = SqliteUserRepository::new(pool);

    let created = identity::create_user(
        &repo,
        "lookup@example.com",
        "password123",
        UserOverrides::default(),
    )
    .await
    .unwrap();

    use doorman::repositories::UserRepository;
    let found = repo
        .find_by_email("lookup@example.com")
        .await
        .unwrap()
        .expect("user should be found by email");
    assert_eq!(found.id, created.id);

    assert!(repo
        .find_by_email("missing@example.com")
        .await
        .unwrap()
        .is_none());
}
