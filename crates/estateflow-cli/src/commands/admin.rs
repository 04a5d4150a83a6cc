//! Master-admin commands over the directory view.

use anyhow::Result;
use estateflow_auth::directory::AdminDirectory;
use estateflow_auth::AuthService;
use estateflow_core::models::account::Plan;
use estateflow_core::repository::{AccountRepository, LeadRepository, SessionStore};
use uuid::Uuid;

use super::require_session;

pub async fn tenants<A: AccountRepository, S: SessionStore, L: LeadRepository>(
    auth: &AuthService<A, S>,
    directory: &AdminDirectory<A, L, S>,
) -> Result<()> {
    let caller = require_session(auth).await?;
    let stats = directory.stats(&caller).await?;
    let accounts = directory.list_accounts(&caller).await?;

    println!("{} agents, {} on PRO", stats.total_agents, stats.pro_agents);
    for account in &accounts {
        let admin = if account.is_admin { " (admin)" } else { "" };
        println!(
            "{}  {:<4} {}{admin}",
            account.id,
            account.plan.as_str(),
            account.email,
        );
    }
    Ok(())
}

pub async fn leads<A: AccountRepository, S: SessionStore, L: LeadRepository>(
    auth: &AuthService<A, S>,
    directory: &AdminDirectory<A, L, S>,
    tenant_id: Uuid,
) -> Result<()> {
    let caller = require_session(auth).await?;
    let rows = directory.leads_for(&caller, tenant_id).await?;

    if rows.is_empty() {
        println!("No leads for {tenant_id}.");
        return Ok(());
    }
    for lead in &rows {
        println!("{}  {:<11} {}", lead.id, lead.status.as_str(), lead.full_name);
    }
    Ok(())
}

pub async fn set_plan<A: AccountRepository, S: SessionStore, L: LeadRepository>(
    auth: &AuthService<A, S>,
    directory: &AdminDirectory<A, L, S>,
    tenant_id: Uuid,
    plan: Plan,
) -> Result<()> {
    let caller = require_session(auth).await?;
    let summary = directory.set_plan(&caller, tenant_id, plan).await?;
    println!("{} is now on the {} plan.", summary.email, summary.plan);
    Ok(())
}
