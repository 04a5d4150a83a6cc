//! Simulated checkout for the PRO upgrade.

use std::time::Duration;

use anyhow::Result;
use estateflow_auth::AuthService;
use estateflow_core::models::account::Plan;
use estateflow_core::repository::{AccountRepository, SessionStore};

use super::require_session;

/// Upgrade the active account to PRO after a fixed "processing" delay.
/// The delay stands in for a hosted checkout round trip; once started
/// there is no cancellation path.
pub async fn upgrade<A: AccountRepository, S: SessionStore>(
    auth: &AuthService<A, S>,
) -> Result<()> {
    let session = require_session(auth).await?;
    if session.plan == Plan::Pro {
        println!("Already on the PRO plan.");
        return Ok(());
    }

    println!("Processing payment...");
    tokio::time::sleep(Duration::from_secs(2)).await;

    auth.update_plan(session.account_id, Plan::Pro).await?;
    println!("Upgrade complete. Unlimited leads are active.");
    Ok(())
}
