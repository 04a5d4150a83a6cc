//! SurrealDB repository implementations.

mod account;
mod lead;
mod session;

pub use account::SurrealAccountRepository;
pub use lead::SurrealLeadRepository;
pub use session::SurrealSessionStore;

use chrono::{DateTime, Utc};

use crate::error::DbError;

/// Timestamps are persisted as RFC 3339 strings.
pub(crate) fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

pub(crate) fn parse_ts(value: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| DbError::Corrupt(format!("invalid timestamp '{value}': {e}")))
}

pub(crate) fn parse_uuid(value: &str, what: &str) -> Result<uuid::Uuid, DbError> {
    uuid::Uuid::parse_str(value).map_err(|e| DbError::Corrupt(format!("invalid {what} UUID: {e}")))
}
