//! Integration tests for the account registry using in-memory SurrealDB.

use estateflow_core::error::CrmError;
use estateflow_core::models::account::{CreateAccount, Plan, UpdateAccount};
use estateflow_core::repository::AccountRepository;
use estateflow_db::repository::SurrealAccountRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    estateflow_db::run_migrations(&db).await.unwrap();
    db
}

fn agent(email: &str) -> CreateAccount {
    CreateAccount {
        email: email.into(),
        password: "correct-horse-battery".into(),
        plan: Plan::Free,
        is_admin: false,
    }
}

#[tokio::test]
async fn create_and_get_account() {
    let db = setup().await;
    let repo = SurrealAccountRepository::new(db);

    let account = repo.create(agent("dana@example.com")).await.unwrap();

    assert_eq!(account.email, "dana@example.com");
    assert_eq!(account.plan, Plan::Free);
    assert!(!account.is_admin);

    // Password should be hashed, not stored in plaintext.
    assert_ne!(account.password_hash, "correct-horse-battery");
    assert!(account.password_hash.starts_with("$argon2id$"));

    let fetched = repo.get_by_id(account.id).await.unwrap();
    assert_eq!(fetched.id, account.id);
    assert_eq!(fetched.email, "dana@example.com");
}

#[tokio::test]
async fn duplicate_email_is_rejected_case_insensitively() {
    let db = setup().await;
    let repo = SurrealAccountRepository::new(db);

    repo.create(agent("Dana@Example.com")).await.unwrap();

    let err = repo.create(agent("dana@example.com")).await.unwrap_err();
    assert!(matches!(err, CrmError::AlreadyExists { .. }));

    // Registry unchanged by the failed sign-up.
    assert_eq!(repo.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn get_by_email_ignores_case() {
    let db = setup().await;
    let repo = SurrealAccountRepository::new(db);

    let created = repo.create(agent("dana@example.com")).await.unwrap();
    let fetched = repo.get_by_email("DANA@EXAMPLE.COM").await.unwrap();
    assert_eq!(fetched.id, created.id);
}

#[tokio::test]
async fn update_changes_plan() {
    let db = setup().await;
    let repo = SurrealAccountRepository::new(db);

    let account = repo.create(agent("dana@example.com")).await.unwrap();

    let updated = repo
        .update(
            account.id,
            UpdateAccount {
                plan: Some(Plan::Pro),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.plan, Plan::Pro);

    let fetched = repo.get_by_id(account.id).await.unwrap();
    assert_eq!(fetched.plan, Plan::Pro);
    // Credential untouched by a plan change.
    assert_eq!(fetched.password_hash, account.password_hash);
}

#[tokio::test]
async fn update_missing_account_is_not_found() {
    let db = setup().await;
    let repo = SurrealAccountRepository::new(db);

    let err = repo
        .update(
            Uuid::new_v4(),
            UpdateAccount {
                plan: Some(Plan::Pro),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CrmError::NotFound { .. }));
}

#[tokio::test]
async fn list_returns_accounts_in_registration_order() {
    let db = setup().await;
    let repo = SurrealAccountRepository::new(db);

    let a = repo.create(agent("a@example.com")).await.unwrap();
    let b = repo.create(agent("b@example.com")).await.unwrap();
    let c = repo.create(agent("c@example.com")).await.unwrap();

    let listed: Vec<_> = repo.list().await.unwrap().into_iter().map(|x| x.id).collect();
    assert_eq!(listed, vec![a.id, b.id, c.id]);
}

#[tokio::test]
async fn pepper_changes_the_stored_hash_input() {
    let db = setup().await;
    let repo = SurrealAccountRepository::with_pepper(db, "deployment-pepper".into());

    let account = repo.create(agent("dana@example.com")).await.unwrap();
    assert!(account.password_hash.starts_with("$argon2id$"));
}
