//! Lead lifecycle orchestration.
//!
//! Generic over repository implementations, like the auth layer. The
//! service is where business rules live: the plan quota is enforced
//! here at insert time (not left to callers), and every write path
//! that can close a deal also clears its scheduling fields.

use chrono::{NaiveDate, Utc};
use estateflow_core::error::{CrmError, CrmResult};
use estateflow_core::models::lead::{CreateLead, Lead, LeadStatus, Recurrence, UpdateLead};
use estateflow_core::plan::{self, FREE_PLAN_LEAD_LIMIT};
use estateflow_core::repository::{AccountRepository, LeadRepository};
use estateflow_core::schedule::{self, DueState};
use tracing::{debug, info};
use uuid::Uuid;

/// Result of completing a follow-up.
#[derive(Debug, Clone)]
pub enum CompleteOutcome {
    /// The recurrence rule advanced the follow-up to its next
    /// occurrence.
    Rescheduled(Lead),
    /// No recurrence rule: the lead is handed back for the operator
    /// to decide next steps. Its date is left untouched.
    NeedsReview(Lead),
}

/// Per-status counts over a tenant's pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub total: usize,
    pub new: usize,
    pub contacted: usize,
    pub visit_done: usize,
    pub deal_closed: usize,
    pub lost: usize,
}

/// A tenant's dated leads partitioned by due state. Undated leads
/// appear in neither bucket.
#[derive(Debug, Clone, Default)]
pub struct FollowUpQueue {
    pub overdue: Vec<Lead>,
    pub due_today: Vec<Lead>,
}

pub struct LeadService<L: LeadRepository, A: AccountRepository> {
    leads: L,
    accounts: A,
}

impl<L: LeadRepository, A: AccountRepository> LeadService<L, A> {
    pub fn new(leads: L, accounts: A) -> Self {
        Self { leads, accounts }
    }

    /// The tenant's leads in insertion order; display layers re-sort.
    pub async fn list(&self, tenant_id: Uuid) -> CrmResult<Vec<Lead>> {
        self.leads.list(tenant_id).await
    }

    pub async fn get(&self, tenant_id: Uuid, id: Uuid) -> CrmResult<Lead> {
        self.leads.get_by_id(tenant_id, id).await
    }

    /// Create a lead, enforcing the plan quota in the store itself so
    /// no caller can bypass it.
    pub async fn create(&self, input: CreateLead) -> CrmResult<Lead> {
        let account = self.accounts.get_by_id(input.tenant_id).await?;
        let current = self.leads.count(input.tenant_id).await?;
        if !plan::can_admit(account.plan, current) {
            return Err(CrmError::QuotaExceeded {
                limit: FREE_PLAN_LEAD_LIMIT,
            });
        }

        let lead = self.leads.create(normalize_create(input)).await?;
        info!(lead_id = %lead.id, tenant_id = %lead.tenant_id, "Lead created");
        Ok(lead)
    }

    /// Merge fields into a lead. A `Deal Closed` status in the update
    /// always clears the schedule, whatever else the update says.
    pub async fn update(&self, tenant_id: Uuid, id: Uuid, input: UpdateLead) -> CrmResult<Lead> {
        self.leads
            .update(tenant_id, id, normalize_update(input))
            .await
    }

    /// Status-transition shorthand over [`LeadService::update`].
    pub async fn set_status(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        status: LeadStatus,
    ) -> CrmResult<Lead> {
        self.update(
            tenant_id,
            id,
            UpdateLead {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }

    /// Irreversible removal.
    pub async fn delete(&self, tenant_id: Uuid, id: Uuid) -> CrmResult<()> {
        self.leads.delete(tenant_id, id).await?;
        info!(lead_id = %id, "Lead deleted");
        Ok(())
    }

    /// Mark the current follow-up done.
    ///
    /// With a recurrence rule the date advances one hop — from the
    /// stored date, or from now when none is set. Without a rule the
    /// lead is handed back for review instead; nothing is written.
    pub async fn complete_follow_up(&self, tenant_id: Uuid, id: Uuid) -> CrmResult<CompleteOutcome> {
        let lead = self.leads.get_by_id(tenant_id, id).await?;

        if lead.recurrence == Recurrence::None {
            return Ok(CompleteOutcome::NeedsReview(lead));
        }

        let base = lead.next_follow_up.unwrap_or_else(Utc::now);
        let next = schedule::next_occurrence(base, lead.recurrence, lead.recurrence_interval);
        debug!(lead_id = %id, next = ?next, "Advancing follow-up");

        let updated = self
            .leads
            .update(
                tenant_id,
                id,
                UpdateLead {
                    next_follow_up: Some(next),
                    ..Default::default()
                },
            )
            .await?;
        Ok(CompleteOutcome::Rescheduled(updated))
    }

    /// Dated leads partitioned into overdue / due-today relative to
    /// `today` (pass [`schedule::today`] outside of tests).
    pub async fn follow_up_queue(
        &self,
        tenant_id: Uuid,
        today: NaiveDate,
    ) -> CrmResult<FollowUpQueue> {
        let mut queue = FollowUpQueue::default();
        for lead in self.leads.list(tenant_id).await? {
            let Some(ts) = lead.next_follow_up else {
                continue;
            };
            match schedule::classify(ts, today) {
                DueState::Overdue => queue.overdue.push(lead),
                DueState::DueToday => queue.due_today.push(lead),
                DueState::Upcoming => {}
            }
        }
        Ok(queue)
    }

    /// Per-status counts over the tenant's pipeline.
    pub async fn pipeline_stats(&self, tenant_id: Uuid) -> CrmResult<PipelineStats> {
        let mut stats = PipelineStats::default();
        for lead in self.leads.list(tenant_id).await? {
            stats.total += 1;
            match lead.status {
                LeadStatus::New => stats.new += 1,
                LeadStatus::Contacted => stats.contacted += 1,
                LeadStatus::VisitDone => stats.visit_done += 1,
                LeadStatus::DealClosed => stats.deal_closed += 1,
                LeadStatus::Lost => stats.lost += 1,
            }
        }
        Ok(stats)
    }
}

/// Closing a deal is terminal for scheduling: the follow-up date and
/// recurrence rule are cleared no matter what the caller passed.
fn normalize_update(mut input: UpdateLead) -> UpdateLead {
    if input.status == Some(LeadStatus::DealClosed) {
        input.next_follow_up = Some(None);
        input.recurrence = Some(Recurrence::None);
    }
    input
}

fn normalize_create(mut input: CreateLead) -> CreateLead {
    if input.status == LeadStatus::DealClosed {
        input.next_follow_up = None;
        input.recurrence = Recurrence::None;
    }
    input
}
