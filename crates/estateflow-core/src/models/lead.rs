//! Lead domain model.
//!
//! A lead is one prospective client interaction, owned by exactly one
//! tenant and tracked from first contact through recurring follow-ups
//! to a terminal outcome (deal closed or lost).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pipeline position of a lead.
///
/// `DealClosed` is terminal for scheduling purposes: a closed lead
/// carries no follow-up date and no recurrence rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LeadStatus {
    New,
    Contacted,
    VisitDone,
    DealClosed,
    Lost,
}

impl LeadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Contacted => "Contacted",
            Self::VisitDone => "Visit Done",
            Self::DealClosed => "Deal Closed",
            Self::Lost => "Lost",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "new" => Ok(Self::New),
            "contacted" => Ok(Self::Contacted),
            "visit done" => Ok(Self::VisitDone),
            "deal closed" => Ok(Self::DealClosed),
            "lost" => Ok(Self::Lost),
            other => Err(format!("unknown lead status: {other}")),
        }
    }
}

/// Channel the lead arrived through.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LeadSource {
    WhatsApp,
    Call,
    Instagram,
    Referral,
}

impl LeadSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WhatsApp => "WhatsApp",
            Self::Call => "Call",
            Self::Instagram => "Instagram",
            Self::Referral => "Referral",
        }
    }
}

impl fmt::Display for LeadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "whatsapp" => Ok(Self::WhatsApp),
            "call" => Ok(Self::Call),
            "instagram" => Ok(Self::Instagram),
            "referral" => Ok(Self::Referral),
            other => Err(format!("unknown lead source: {other}")),
        }
    }
}

/// Whether the prospect is buying or renting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Purpose {
    Buy,
    Rent,
}

impl Purpose {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Rent => "Rent",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Purpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Self::Buy),
            "rent" => Ok(Self::Rent),
            other => Err(format!("unknown purpose: {other}")),
        }
    }
}

/// How a completed follow-up reschedules itself.
///
/// `Custom` advances by `recurrence_interval` calendar days.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Recurrence {
    None,
    Daily,
    Weekly,
    Monthly,
    Custom,
}

impl Recurrence {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "custom" => Ok(Self::Custom),
            other => Err(format!("unknown recurrence rule: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    /// The tenant (agent account) that owns this lead.
    pub tenant_id: Uuid,
    pub full_name: String,
    pub phone: String,
    /// Free-text budget, e.g. "450000" or "$2,500 / mo".
    pub budget: String,
    /// Free-text location of interest.
    pub area: String,
    pub purpose: Purpose,
    pub source: LeadSource,
    pub status: LeadStatus,
    pub notes: String,
    /// When the next follow-up is due; `None` means the lead is not
    /// scheduled and is excluded from the follow-up queue.
    pub next_follow_up: Option<DateTime<Utc>>,
    pub recurrence: Recurrence,
    /// Days between occurrences when `recurrence` is `Custom`; always >= 1.
    pub recurrence_interval: u32,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a new lead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLead {
    pub tenant_id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub budget: String,
    pub area: String,
    pub purpose: Purpose,
    pub source: LeadSource,
    pub status: LeadStatus,
    pub notes: String,
    pub next_follow_up: Option<DateTime<Utc>>,
    pub recurrence: Recurrence,
    /// Defaults to 1; non-positive values are normalized to 1.
    pub recurrence_interval: Option<u32>,
}

/// Fields that can be updated on an existing lead.
///
/// `id`, `tenant_id`, and `created_at` are immutable.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateLead {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub budget: Option<String>,
    pub area: Option<String>,
    pub purpose: Option<Purpose>,
    pub source: Option<LeadSource>,
    pub status: Option<LeadStatus>,
    pub notes: Option<String>,
    /// `Some(Some(ts))` = set, `Some(None)` = clear, `None` = no change.
    pub next_follow_up: Option<Option<DateTime<Utc>>>,
    pub recurrence: Option<Recurrence>,
    pub recurrence_interval: Option<u32>,
}
