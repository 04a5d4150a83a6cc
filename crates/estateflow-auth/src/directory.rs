//! Admin directory — cross-tenant visibility for the master admin.
//!
//! Read aggregation over the registry and any tenant's lead
//! collection, plus exactly one mutation: switching a tenant's plan.
//! Every operation requires the caller's session to carry the admin
//! flag; nothing else about a tenant can be changed from here.

use estateflow_core::error::{CrmError, CrmResult};
use estateflow_core::models::account::{AccountSummary, Plan};
use estateflow_core::models::lead::Lead;
use estateflow_core::models::session::ActiveSession;
use estateflow_core::repository::{AccountRepository, LeadRepository, SessionStore};
use tracing::info;
use uuid::Uuid;

use crate::service::apply_plan_change;

/// Aggregate figures over the registry.
#[derive(Debug, Clone, Copy)]
pub struct DirectoryStats {
    pub total_agents: usize,
    pub pro_agents: usize,
}

pub struct AdminDirectory<A, L, S> {
    accounts: A,
    leads: L,
    sessions: S,
}

impl<A, L, S> AdminDirectory<A, L, S>
where
    A: AccountRepository,
    L: LeadRepository,
    S: SessionStore,
{
    pub fn new(accounts: A, leads: L, sessions: S) -> Self {
        Self {
            accounts,
            leads,
            sessions,
        }
    }

    fn authorize(caller: &ActiveSession) -> CrmResult<()> {
        if caller.is_admin {
            Ok(())
        } else {
            Err(CrmError::AuthorizationDenied {
                reason: "master-admin privilege required".into(),
            })
        }
    }

    /// Every registered account, without credential material.
    pub async fn list_accounts(&self, caller: &ActiveSession) -> CrmResult<Vec<AccountSummary>> {
        Self::authorize(caller)?;
        Ok(self
            .accounts
            .list()
            .await?
            .iter()
            .map(|account| account.summary())
            .collect())
    }

    pub async fn stats(&self, caller: &ActiveSession) -> CrmResult<DirectoryStats> {
        let accounts = self.list_accounts(caller).await?;
        Ok(DirectoryStats {
            total_agents: accounts.len(),
            pro_agents: accounts.iter().filter(|a| a.plan == Plan::Pro).count(),
        })
    }

    /// Any tenant's lead collection, not just the caller's own.
    pub async fn leads_for(&self, caller: &ActiveSession, tenant_id: Uuid) -> CrmResult<Vec<Lead>> {
        Self::authorize(caller)?;
        self.leads.list(tenant_id).await
    }

    /// The single mutation this view offers. Keeps the target's live
    /// session copy consistent when it is currently logged in.
    pub async fn set_plan(
        &self,
        caller: &ActiveSession,
        tenant_id: Uuid,
        plan: Plan,
    ) -> CrmResult<AccountSummary> {
        Self::authorize(caller)?;
        let account = apply_plan_change(&self.accounts, &self.sessions, tenant_id, plan).await?;
        info!(account_id = %tenant_id, plan = %plan, "Plan changed by admin");
        Ok(account.summary())
    }
}
