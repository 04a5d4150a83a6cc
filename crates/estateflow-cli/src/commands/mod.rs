//! Command handlers. Each prints its result; errors bubble up to main.

pub mod admin;
pub mod auth;
pub mod billing;
pub mod leads;

use anyhow::{Result, bail};
use estateflow_auth::AuthService;
use estateflow_core::models::session::ActiveSession;
use estateflow_core::repository::{AccountRepository, SessionStore};

/// The active session, or a friendly error telling the user to log in.
pub(crate) async fn require_session<A: AccountRepository, S: SessionStore>(
    auth: &AuthService<A, S>,
) -> Result<ActiveSession> {
    match auth.current_session().await? {
        Some(session) => Ok(session),
        None => bail!("not logged in; run `estateflow login` first"),
    }
}
