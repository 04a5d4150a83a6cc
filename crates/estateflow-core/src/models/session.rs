//! Active-session domain model.
//!
//! At most one session exists per client instance. It is a copy of the
//! authenticated account minus its secret, persisted so it survives a
//! restart and destroyed on logout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::{Account, Plan};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveSession {
    pub account_id: Uuid,
    pub email: String,
    pub plan: Plan,
    pub is_admin: bool,
    pub started_at: DateTime<Utc>,
}

impl ActiveSession {
    /// Build the secret-free session copy of an account.
    pub fn for_account(account: &Account, started_at: DateTime<Utc>) -> Self {
        Self {
            account_id: account.id,
            email: account.email.clone(),
            plan: account.plan,
            is_admin: account.is_admin,
            started_at,
        }
    }
}
