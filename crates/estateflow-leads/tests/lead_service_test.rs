//! Integration tests for the lead lifecycle service.

use chrono::{Local, NaiveDate, TimeZone, Utc};
use estateflow_core::error::CrmError;
use estateflow_core::models::account::{CreateAccount, Plan, UpdateAccount};
use estateflow_core::models::lead::{
    CreateLead, LeadSource, LeadStatus, Purpose, Recurrence, UpdateLead,
};
use estateflow_core::plan::FREE_PLAN_LEAD_LIMIT;
use estateflow_core::repository::AccountRepository;
use estateflow_db::repository::{SurrealAccountRepository, SurrealLeadRepository};
use estateflow_leads::{CompleteOutcome, LeadService};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

type Service = LeadService<SurrealLeadRepository<Db>, SurrealAccountRepository<Db>>;

/// Spin up in-memory DB, run migrations, register a FREE-plan tenant.
async fn setup() -> (Service, SurrealAccountRepository<Db>, Uuid) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    estateflow_db::run_migrations(&db).await.unwrap();

    let accounts = SurrealAccountRepository::new(db.clone());
    let tenant = accounts
        .create(CreateAccount {
            email: "agent@example.com".into(),
            password: "correct-horse-battery".into(),
            plan: Plan::Free,
            is_admin: false,
        })
        .await
        .unwrap();

    let svc = LeadService::new(SurrealLeadRepository::new(db.clone()), accounts.clone());
    (svc, accounts, tenant.id)
}

fn draft(tenant_id: Uuid, full_name: &str) -> CreateLead {
    CreateLead {
        tenant_id,
        full_name: full_name.into(),
        phone: "+1 555 010 9999".into(),
        budget: "450000".into(),
        area: "Palm District".into(),
        purpose: Purpose::Buy,
        source: LeadSource::WhatsApp,
        status: LeadStatus::New,
        notes: String::new(),
        next_follow_up: None,
        recurrence: Recurrence::None,
        recurrence_interval: None,
    }
}

/// Noon local time on the given day, as UTC, so classification tests
/// hold in any host time zone.
fn local_noon(y: i32, m: u32, d: u32) -> chrono::DateTime<Utc> {
    Local
        .with_ymd_and_hms(y, m, d, 12, 0, 0)
        .unwrap()
        .with_timezone(&Utc)
}

#[tokio::test]
async fn free_plan_admits_five_then_denies_then_pro_unlocks() {
    let (svc, accounts, tenant) = setup().await;

    for i in 0..FREE_PLAN_LEAD_LIMIT {
        svc.create(draft(tenant, &format!("Lead {i}"))).await.unwrap();
    }

    // The sixth insert is a typed quota failure, not an alert.
    let err = svc.create(draft(tenant, "One Too Many")).await.unwrap_err();
    assert!(matches!(
        err,
        CrmError::QuotaExceeded {
            limit: FREE_PLAN_LEAD_LIMIT
        }
    ));
    assert_eq!(svc.list(tenant).await.unwrap().len(), 5);

    // Upgrading to PRO admits the sixth lead.
    accounts
        .update(
            tenant,
            UpdateAccount {
                plan: Some(Plan::Pro),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    svc.create(draft(tenant, "One Too Many")).await.unwrap();
    assert_eq!(svc.list(tenant).await.unwrap().len(), 6);
}

#[tokio::test]
async fn completing_a_weekly_follow_up_advances_seven_days() {
    let (svc, _accounts, tenant) = setup().await;

    let scheduled_for = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let mut input = draft(tenant, "Dana Hart");
    input.status = LeadStatus::Contacted;
    input.next_follow_up = Some(scheduled_for);
    input.recurrence = Recurrence::Weekly;
    let lead = svc.create(input).await.unwrap();

    let outcome = svc.complete_follow_up(tenant, lead.id).await.unwrap();
    let advanced = match outcome {
        CompleteOutcome::Rescheduled(lead) => lead,
        CompleteOutcome::NeedsReview(_) => panic!("weekly lead should reschedule"),
    };

    assert_eq!(
        advanced.next_follow_up,
        Some(Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap())
    );
    // Completing a follow-up never touches the pipeline status.
    assert_eq!(advanced.status, LeadStatus::Contacted);
}

#[tokio::test]
async fn completing_without_recurrence_hands_back_for_review() {
    let (svc, _accounts, tenant) = setup().await;

    let scheduled_for = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let mut input = draft(tenant, "Dana Hart");
    input.next_follow_up = Some(scheduled_for);
    let lead = svc.create(input).await.unwrap();

    let outcome = svc.complete_follow_up(tenant, lead.id).await.unwrap();
    assert!(matches!(outcome, CompleteOutcome::NeedsReview(_)));

    // The stored date was not auto-cleared.
    let stored = svc.get(tenant, lead.id).await.unwrap();
    assert_eq!(stored.next_follow_up, Some(scheduled_for));
}

#[tokio::test]
async fn completing_an_undated_recurring_lead_schedules_from_now() {
    let (svc, _accounts, tenant) = setup().await;

    let mut input = draft(tenant, "Dana Hart");
    input.recurrence = Recurrence::Daily;
    let lead = svc.create(input).await.unwrap();

    let before = Utc::now();
    let outcome = svc.complete_follow_up(tenant, lead.id).await.unwrap();
    let advanced = match outcome {
        CompleteOutcome::Rescheduled(lead) => lead,
        CompleteOutcome::NeedsReview(_) => panic!("daily lead should reschedule"),
    };

    let next = advanced.next_follow_up.expect("a date was scheduled");
    assert!(next > before, "next occurrence should be in the future");
}

#[tokio::test]
async fn closing_a_deal_clears_scheduling_regardless_of_prior_values() {
    let (svc, _accounts, tenant) = setup().await;

    let mut input = draft(tenant, "Dana Hart");
    input.next_follow_up = Some(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
    input.recurrence = Recurrence::Monthly;
    let lead = svc.create(input).await.unwrap();

    let closed = svc
        .set_status(tenant, lead.id, LeadStatus::DealClosed)
        .await
        .unwrap();
    assert_eq!(closed.status, LeadStatus::DealClosed);
    assert!(closed.next_follow_up.is_none());
    assert_eq!(closed.recurrence, Recurrence::None);
}

#[tokio::test]
async fn closing_overrides_conflicting_fields_in_the_same_update() {
    let (svc, _accounts, tenant) = setup().await;

    let lead = svc.create(draft(tenant, "Dana Hart")).await.unwrap();

    // An update that both closes the deal and tries to schedule.
    let closed = svc
        .update(
            tenant,
            lead.id,
            UpdateLead {
                status: Some(LeadStatus::DealClosed),
                next_follow_up: Some(Some(Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap())),
                recurrence: Some(Recurrence::Weekly),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(closed.next_follow_up.is_none());
    assert_eq!(closed.recurrence, Recurrence::None);
}

#[tokio::test]
async fn creating_a_closed_lead_never_carries_a_schedule() {
    let (svc, _accounts, tenant) = setup().await;

    let mut input = draft(tenant, "Walk-in Buyer");
    input.status = LeadStatus::DealClosed;
    input.next_follow_up = Some(Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap());
    input.recurrence = Recurrence::Daily;

    let lead = svc.create(input).await.unwrap();
    assert!(lead.next_follow_up.is_none());
    assert_eq!(lead.recurrence, Recurrence::None);
}

#[tokio::test]
async fn updates_to_unknown_leads_fail_loudly() {
    let (svc, _accounts, tenant) = setup().await;

    let err = svc
        .set_status(tenant, Uuid::new_v4(), LeadStatus::Lost)
        .await
        .unwrap_err();
    assert!(matches!(err, CrmError::NotFound { .. }));

    let err = svc.delete(tenant, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, CrmError::NotFound { .. }));

    let err = svc
        .complete_follow_up(tenant, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, CrmError::NotFound { .. }));
}

#[tokio::test]
async fn follow_up_queue_partitions_by_due_state() {
    let (svc, _accounts, tenant) = setup().await;
    let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();

    let mut overdue = draft(tenant, "Slipped");
    overdue.next_follow_up = Some(local_noon(2024, 5, 8));
    svc.create(overdue).await.unwrap();

    let mut due = draft(tenant, "Today");
    due.next_follow_up = Some(local_noon(2024, 5, 10));
    svc.create(due).await.unwrap();

    let mut upcoming = draft(tenant, "Later");
    upcoming.next_follow_up = Some(local_noon(2024, 5, 20));
    svc.create(upcoming).await.unwrap();

    // Undated leads are excluded from the queue entirely.
    svc.create(draft(tenant, "Unscheduled")).await.unwrap();

    let queue = svc.follow_up_queue(tenant, today).await.unwrap();
    assert_eq!(queue.overdue.len(), 1);
    assert_eq!(queue.overdue[0].full_name, "Slipped");
    assert_eq!(queue.due_today.len(), 1);
    assert_eq!(queue.due_today[0].full_name, "Today");
}

#[tokio::test]
async fn pipeline_stats_count_by_status() {
    let (svc, _accounts, tenant) = setup().await;

    svc.create(draft(tenant, "A")).await.unwrap();
    let b = svc.create(draft(tenant, "B")).await.unwrap();
    let c = svc.create(draft(tenant, "C")).await.unwrap();

    svc.set_status(tenant, b.id, LeadStatus::Contacted).await.unwrap();
    svc.set_status(tenant, c.id, LeadStatus::DealClosed).await.unwrap();

    let stats = svc.pipeline_stats(tenant).await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.new, 1);
    assert_eq!(stats.contacted, 1);
    assert_eq!(stats.deal_closed, 1);
    assert_eq!(stats.visit_done, 0);
    assert_eq!(stats.lost, 0);
}

#[tokio::test]
async fn creating_for_an_unregistered_tenant_is_not_found() {
    let (svc, _accounts, _tenant) = setup().await;

    let err = svc.create(draft(Uuid::new_v4(), "Ghost")).await.unwrap_err();
    assert!(matches!(err, CrmError::NotFound { .. }));
}
