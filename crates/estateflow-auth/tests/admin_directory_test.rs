//! Integration tests for the admin directory view.

use chrono::Utc;
use estateflow_auth::config::AuthConfig;
use estateflow_auth::directory::AdminDirectory;
use estateflow_auth::service::AuthService;
use estateflow_core::error::CrmError;
use estateflow_core::models::account::Plan;
use estateflow_core::models::lead::{CreateLead, LeadSource, LeadStatus, Purpose, Recurrence};
use estateflow_core::models::session::ActiveSession;
use estateflow_core::repository::{LeadRepository, SessionStore};
use estateflow_db::repository::{
    SurrealAccountRepository, SurrealLeadRepository, SurrealSessionStore,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

fn test_config() -> AuthConfig {
    AuthConfig {
        master_email: "root@estateflow.test".into(),
        master_password: "master-pass-9".into(),
        master_pin: "4321".into(),
        pepper: None,
    }
}

async fn setup() -> (
    AuthService<SurrealAccountRepository<Db>, SurrealSessionStore<Db>>,
    AdminDirectory<SurrealAccountRepository<Db>, SurrealLeadRepository<Db>, SurrealSessionStore<Db>>,
    Surreal<Db>,
) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    estateflow_db::run_migrations(&db).await.unwrap();

    let svc = AuthService::new(
        SurrealAccountRepository::new(db.clone()),
        SurrealSessionStore::new(db.clone()),
        test_config(),
    );
    let directory = AdminDirectory::new(
        SurrealAccountRepository::new(db.clone()),
        SurrealLeadRepository::new(db.clone()),
        SurrealSessionStore::new(db.clone()),
    );
    (svc, directory, db)
}

/// An admin caller session, as the master login would produce.
fn admin_caller() -> ActiveSession {
    ActiveSession {
        account_id: Uuid::new_v4(),
        email: "root@estateflow.test".into(),
        plan: Plan::Pro,
        is_admin: true,
        started_at: Utc::now(),
    }
}

fn draft(tenant_id: Uuid, full_name: &str) -> CreateLead {
    CreateLead {
        tenant_id,
        full_name: full_name.into(),
        phone: "+1 555 010 9999".into(),
        budget: "450000".into(),
        area: "Palm District".into(),
        purpose: Purpose::Buy,
        source: LeadSource::Call,
        status: LeadStatus::New,
        notes: String::new(),
        next_follow_up: None,
        recurrence: Recurrence::None,
        recurrence_interval: None,
    }
}

#[tokio::test]
async fn non_admin_callers_are_denied() {
    let (svc, directory, _db) = setup().await;

    let caller = svc.sign_up("dana@example.com", "hunter2-hunter2").await.unwrap();
    assert!(!caller.is_admin);

    assert!(matches!(
        directory.list_accounts(&caller).await.unwrap_err(),
        CrmError::AuthorizationDenied { .. }
    ));
    assert!(matches!(
        directory.leads_for(&caller, Uuid::new_v4()).await.unwrap_err(),
        CrmError::AuthorizationDenied { .. }
    ));
    assert!(matches!(
        directory
            .set_plan(&caller, caller.account_id, Plan::Pro)
            .await
            .unwrap_err(),
        CrmError::AuthorizationDenied { .. }
    ));
}

#[tokio::test]
async fn admin_sees_every_registered_account() {
    let (svc, directory, _db) = setup().await;

    svc.sign_up("a@example.com", "password-aaaa").await.unwrap();
    svc.sign_up("b@example.com", "password-bbbb").await.unwrap();

    let listed = directory.list_accounts(&admin_caller()).await.unwrap();
    let emails: Vec<_> = listed.iter().map(|a| a.email.as_str()).collect();
    assert_eq!(emails, vec!["a@example.com", "b@example.com"]);
}

#[tokio::test]
async fn admin_reads_any_tenants_leads() {
    let (svc, directory, db) = setup().await;

    let tenant = svc.sign_up("a@example.com", "password-aaaa").await.unwrap();
    let leads = SurrealLeadRepository::new(db);
    leads.create(draft(tenant.account_id, "Dana Hart")).await.unwrap();
    leads.create(draft(tenant.account_id, "Omar Reyes")).await.unwrap();

    let seen = directory
        .leads_for(&admin_caller(), tenant.account_id)
        .await
        .unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|l| l.tenant_id == tenant.account_id));
}

#[tokio::test]
async fn plan_toggle_reaches_a_logged_in_tenant_without_relogin() {
    let (svc, directory, db) = setup().await;

    // Tenant B signs up and stays logged in.
    let tenant = svc.sign_up("b@example.com", "password-bbbb").await.unwrap();
    assert_eq!(tenant.plan, Plan::Free);

    let summary = directory
        .set_plan(&admin_caller(), tenant.account_id, Plan::Pro)
        .await
        .unwrap();
    assert_eq!(summary.plan, Plan::Pro);

    // B's live session reflects PRO immediately.
    let current = svc.current_session().await.unwrap().unwrap();
    assert_eq!(current.plan, Plan::Pro);

    let store = SurrealSessionStore::new(db);
    assert_eq!(store.load().await.unwrap().unwrap().plan, Plan::Pro);
}

#[tokio::test]
async fn plan_toggle_on_unknown_tenant_is_not_found() {
    let (_svc, directory, _db) = setup().await;

    let err = directory
        .set_plan(&admin_caller(), Uuid::new_v4(), Plan::Pro)
        .await
        .unwrap_err();
    assert!(matches!(err, CrmError::NotFound { .. }));
}

#[tokio::test]
async fn stats_count_pro_agents() {
    let (svc, directory, _db) = setup().await;

    let a = svc.sign_up("a@example.com", "password-aaaa").await.unwrap();
    svc.sign_up("b@example.com", "password-bbbb").await.unwrap();
    svc.sign_up("c@example.com", "password-cccc").await.unwrap();

    directory
        .set_plan(&admin_caller(), a.account_id, Plan::Pro)
        .await
        .unwrap();

    let stats = directory.stats(&admin_caller()).await.unwrap();
    assert_eq!(stats.total_agents, 3);
    assert_eq!(stats.pro_agents, 1);
}
