//! SurrealDB implementation of [`SessionStore`].
//!
//! The active session is a singleton: one fixed record that either
//! exists (someone is logged in) or does not. Saving replaces it,
//! clearing is idempotent.

use estateflow_core::error::CrmResult;
use estateflow_core::models::account::Plan;
use estateflow_core::models::session::ActiveSession;
use estateflow_core::repository::SessionStore;
use serde::Deserialize;
use surrealdb::{Connection, Surreal};

use crate::error::DbError;
use crate::repository::{format_ts, parse_ts, parse_uuid};

/// Fixed record id of the singleton session slot.
const SESSION_RECORD: &str = "current";

#[derive(Debug, Deserialize)]
struct SessionRow {
    account_id: String,
    email: String,
    plan: String,
    is_admin: bool,
    started_at: String,
}

impl SessionRow {
    fn try_into_session(self) -> Result<ActiveSession, DbError> {
        Ok(ActiveSession {
            account_id: parse_uuid(&self.account_id, "account")?,
            email: self.email,
            plan: self
                .plan
                .parse::<Plan>()
                .map_err(DbError::Corrupt)?,
            is_admin: self.is_admin,
            started_at: parse_ts(&self.started_at)?,
        })
    }
}

/// SurrealDB implementation of the persisted session slot.
#[derive(Clone)]
pub struct SurrealSessionStore<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSessionStore<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> SessionStore for SurrealSessionStore<C> {
    async fn save(&self, session: ActiveSession) -> CrmResult<()> {
        self.db
            .query(
                "DELETE active_session; \
                 CREATE type::thing('active_session', $rec) SET \
                 account_id = $account_id, \
                 email = $email, \
                 plan = $plan, \
                 is_admin = $is_admin, \
                 started_at = $started_at",
            )
            .bind(("rec", SESSION_RECORD))
            .bind(("account_id", session.account_id.to_string()))
            .bind(("email", session.email))
            .bind(("plan", session.plan.as_str().to_string()))
            .bind(("is_admin", session.is_admin))
            .bind(("started_at", format_ts(session.started_at)))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn load(&self) -> CrmResult<Option<ActiveSession>> {
        let mut result = self
            .db
            .query("SELECT * FROM type::thing('active_session', $rec)")
            .bind(("rec", SESSION_RECORD))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SessionRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_session()?)),
            None => Ok(None),
        }
    }

    async fn clear(&self) -> CrmResult<()> {
        self.db
            .query("DELETE active_session")
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }
}
