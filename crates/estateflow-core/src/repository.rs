//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Lead access is scoped by a
//! `tenant_id` parameter to enforce data isolation; the account
//! registry and the active session are process-wide.

use uuid::Uuid;

use crate::error::CrmResult;
use crate::models::{
    account::{Account, CreateAccount, UpdateAccount},
    lead::{CreateLead, Lead, UpdateLead},
    session::ActiveSession,
};

/// The shared tenant registry.
pub trait AccountRepository: Send + Sync {
    fn create(&self, input: CreateAccount) -> impl Future<Output = CrmResult<Account>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CrmResult<Account>> + Send;
    /// Lookup by email, compared case-insensitively.
    fn get_by_email(&self, email: &str) -> impl Future<Output = CrmResult<Account>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateAccount,
    ) -> impl Future<Output = CrmResult<Account>> + Send;
    /// All registered accounts, in registration order.
    fn list(&self) -> impl Future<Output = CrmResult<Vec<Account>>> + Send;
}

/// A tenant's lead collection.
pub trait LeadRepository: Send + Sync {
    fn create(&self, input: CreateLead) -> impl Future<Output = CrmResult<Lead>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = CrmResult<Lead>> + Send;
    /// Merge the given fields into an existing lead. Fails with
    /// `NotFound` when the id does not exist for this tenant.
    fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateLead,
    ) -> impl Future<Output = CrmResult<Lead>> + Send;
    /// Irreversible removal; no tombstone.
    fn delete(&self, tenant_id: Uuid, id: Uuid) -> impl Future<Output = CrmResult<()>> + Send;
    /// All of the tenant's leads, in insertion order. Callers re-sort
    /// for display.
    fn list(&self, tenant_id: Uuid) -> impl Future<Output = CrmResult<Vec<Lead>>> + Send;
    fn count(&self, tenant_id: Uuid) -> impl Future<Output = CrmResult<u64>> + Send;
}

/// The single persisted session slot.
pub trait SessionStore: Send + Sync {
    /// Replace the active session.
    fn save(&self, session: ActiveSession) -> impl Future<Output = CrmResult<()>> + Send;
    fn load(&self) -> impl Future<Output = CrmResult<Option<ActiveSession>>> + Send;
    /// Idempotent; clearing an empty slot is a no-op.
    fn clear(&self) -> impl Future<Output = CrmResult<()>> + Send;
}
