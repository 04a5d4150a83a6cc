//! Tenant account domain model.
//!
//! Every registered agent is a tenant; each tenant's lead collection is
//! fully isolated from every other tenant's. A single master-admin
//! account (flagged `is_admin`) can see across tenants.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subscription tier. FREE is capped by the plan gate; PRO is unlimited.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Plan {
    Free,
    Pro,
}

impl Plan {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "FREE",
            Self::Pro => "PRO",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            other => Err(format!("unknown plan: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    /// Unique across the registry, compared case-insensitively.
    pub email: String,
    /// Argon2id PHC-format hash; the raw secret is never stored.
    pub password_hash: String,
    pub plan: Plan,
    /// True only for the master identity.
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Projection without the credential hash, safe to hand to display
    /// layers and the admin directory.
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id,
            email: self.email.clone(),
            plan: self.plan,
            is_admin: self.is_admin,
            created_at: self.created_at,
        }
    }
}

/// Fields required to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccount {
    pub email: String,
    /// Raw password (hashed with Argon2id before storage).
    pub password: String,
    pub plan: Plan,
    pub is_admin: bool,
}

/// Fields that can be updated on an existing account.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateAccount {
    pub plan: Option<Plan>,
    pub is_admin: Option<bool>,
}

/// An account minus its credential hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: Uuid,
    pub email: String,
    pub plan: Plan,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}
