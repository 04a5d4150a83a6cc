//! Lead pipeline commands.

use anyhow::Result;
use chrono::Local;
use estateflow_auth::AuthService;
use estateflow_core::models::lead::{
    CreateLead, Lead, LeadSource, LeadStatus, Purpose, Recurrence, UpdateLead,
};
use estateflow_core::repository::{AccountRepository, LeadRepository, SessionStore};
use estateflow_core::{format, links, schedule};
use estateflow_leads::{CompleteOutcome, LeadService};
use uuid::Uuid;

use super::require_session;

pub struct AddArgs {
    pub name: String,
    pub phone: String,
    pub budget: String,
    pub area: String,
    pub purpose: Purpose,
    pub source: LeadSource,
    pub notes: String,
    pub follow_up: Option<String>,
    pub recurrence: Recurrence,
    pub interval: Option<u32>,
}

pub struct EditArgs {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub budget: Option<String>,
    pub area: Option<String>,
    pub purpose: Option<Purpose>,
    pub source: Option<LeadSource>,
    pub notes: Option<String>,
    pub follow_up: Option<String>,
    pub clear_follow_up: bool,
    pub recurrence: Option<Recurrence>,
    pub interval: Option<u32>,
}

fn describe_follow_up(lead: &Lead) -> String {
    match lead.next_follow_up {
        Some(ts) => {
            let date = ts.with_timezone(&Local).format("%Y-%m-%d");
            let marker = if schedule::is_overdue(ts) {
                " (overdue)"
            } else if schedule::is_due_today(ts) {
                " (today)"
            } else {
                ""
            };
            let repeat = if lead.recurrence != Recurrence::None {
                format!(", repeats {}", lead.recurrence)
            } else {
                String::new()
            };
            format!("follow up {date}{marker}{repeat}")
        }
        None => "no follow-up scheduled".into(),
    }
}

pub async fn add<A: AccountRepository, S: SessionStore, L: LeadRepository>(
    auth: &AuthService<A, S>,
    leads: &LeadService<L, A>,
    args: AddArgs,
) -> Result<()> {
    let session = require_session(auth).await?;

    let next_follow_up = match args.follow_up.as_deref() {
        Some(raw) => Some(schedule::parse_timestamp(raw)?),
        None => None,
    };

    let lead = leads
        .create(CreateLead {
            tenant_id: session.account_id,
            full_name: args.name,
            phone: args.phone,
            budget: args.budget,
            area: args.area,
            purpose: args.purpose,
            source: args.source,
            status: LeadStatus::New,
            notes: args.notes,
            next_follow_up,
            recurrence: args.recurrence,
            recurrence_interval: args.interval,
        })
        .await?;

    println!("Added {} ({}).", lead.full_name, lead.id);
    Ok(())
}

pub async fn list<A: AccountRepository, S: SessionStore, L: LeadRepository>(
    auth: &AuthService<A, S>,
    leads: &LeadService<L, A>,
) -> Result<()> {
    let session = require_session(auth).await?;

    let mut all = leads.list(session.account_id).await?;
    if all.is_empty() {
        println!("No leads yet.");
        return Ok(());
    }

    // Newest first for display; the store keeps insertion order.
    all.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    for lead in &all {
        println!(
            "{}  {:<11} {:<22} {:>10}  {}",
            lead.id,
            lead.status.as_str(),
            lead.full_name,
            format::format_currency(&lead.budget),
            describe_follow_up(lead),
        );
    }
    Ok(())
}

pub async fn show<A: AccountRepository, S: SessionStore, L: LeadRepository>(
    auth: &AuthService<A, S>,
    leads: &LeadService<L, A>,
    id: Uuid,
) -> Result<()> {
    let session = require_session(auth).await?;
    let lead = leads.get(session.account_id, id).await?;

    println!("{}", lead.full_name);
    println!("  id:      {}", lead.id);
    println!("  status:  {}", lead.status);
    println!("  purpose: {}", lead.purpose);
    println!("  source:  {}", lead.source);
    if !lead.area.is_empty() {
        println!("  area:    {}", lead.area);
    }
    println!("  budget:  {}", format::format_currency(&lead.budget));
    if !lead.notes.is_empty() {
        println!("  notes:   {}", lead.notes);
    }
    println!("  {}", describe_follow_up(&lead));
    println!("  call:    {}", links::dial_link(&lead.phone));
    let message = links::follow_up_message(&lead.full_name, &lead.area);
    println!("  chat:    {}", links::whatsapp_link(&lead.phone, Some(&message)));
    Ok(())
}

pub async fn edit<A: AccountRepository, S: SessionStore, L: LeadRepository>(
    auth: &AuthService<A, S>,
    leads: &LeadService<L, A>,
    id: Uuid,
    args: EditArgs,
) -> Result<()> {
    let session = require_session(auth).await?;

    let next_follow_up = if args.clear_follow_up {
        Some(None)
    } else {
        match args.follow_up.as_deref() {
            Some(raw) => Some(Some(schedule::parse_timestamp(raw)?)),
            None => None,
        }
    };

    let updated = leads
        .update(
            session.account_id,
            id,
            UpdateLead {
                full_name: args.name,
                phone: args.phone,
                budget: args.budget,
                area: args.area,
                purpose: args.purpose,
                source: args.source,
                status: None,
                notes: args.notes,
                next_follow_up,
                recurrence: args.recurrence,
                recurrence_interval: args.interval,
            },
        )
        .await?;

    println!("Updated {}. {}", updated.full_name, describe_follow_up(&updated));
    Ok(())
}

pub async fn set_status<A: AccountRepository, S: SessionStore, L: LeadRepository>(
    auth: &AuthService<A, S>,
    leads: &LeadService<L, A>,
    id: Uuid,
    status: LeadStatus,
) -> Result<()> {
    let session = require_session(auth).await?;
    let updated = leads.set_status(session.account_id, id, status).await?;
    println!("{} is now {}.", updated.full_name, updated.status);
    Ok(())
}

pub async fn done<A: AccountRepository, S: SessionStore, L: LeadRepository>(
    auth: &AuthService<A, S>,
    leads: &LeadService<L, A>,
    id: Uuid,
) -> Result<()> {
    let session = require_session(auth).await?;

    match leads.complete_follow_up(session.account_id, id).await? {
        CompleteOutcome::Rescheduled(lead) => {
            println!("Done. {}", describe_follow_up(&lead));
        }
        CompleteOutcome::NeedsReview(lead) => {
            println!(
                "Done. {} has no recurrence rule; use `estateflow lead edit` \
                 to schedule the next step.",
                lead.full_name
            );
        }
    }
    Ok(())
}

pub async fn delete<A: AccountRepository, S: SessionStore, L: LeadRepository>(
    auth: &AuthService<A, S>,
    leads: &LeadService<L, A>,
    id: Uuid,
) -> Result<()> {
    let session = require_session(auth).await?;
    leads.delete(session.account_id, id).await?;
    println!("Deleted {id}.");
    Ok(())
}

pub async fn followups<A: AccountRepository, S: SessionStore, L: LeadRepository>(
    auth: &AuthService<A, S>,
    leads: &LeadService<L, A>,
) -> Result<()> {
    let session = require_session(auth).await?;
    let queue = leads
        .follow_up_queue(session.account_id, schedule::today())
        .await?;

    if queue.overdue.is_empty() && queue.due_today.is_empty() {
        println!("Nothing due. You're all caught up.");
        return Ok(());
    }

    if !queue.overdue.is_empty() {
        println!("Overdue:");
        for lead in &queue.overdue {
            print_queue_line(lead);
        }
    }
    if !queue.due_today.is_empty() {
        println!("Due today:");
        for lead in &queue.due_today {
            print_queue_line(lead);
        }
    }
    Ok(())
}

fn print_queue_line(lead: &Lead) {
    let area = if lead.area.is_empty() { "?" } else { lead.area.as_str() };
    println!(
        "  {}  {} ({}, {})",
        lead.id,
        lead.full_name,
        area,
        format::format_currency(&lead.budget),
    );
}

pub async fn stats<A: AccountRepository, S: SessionStore, L: LeadRepository>(
    auth: &AuthService<A, S>,
    leads: &LeadService<L, A>,
) -> Result<()> {
    let session = require_session(auth).await?;
    let stats = leads.pipeline_stats(session.account_id).await?;

    println!("Total:       {}", stats.total);
    println!("New:         {}", stats.new);
    println!("Contacted:   {}", stats.contacted);
    println!("Visit done:  {}", stats.visit_done);
    println!("Deal closed: {}", stats.deal_closed);
    println!("Lost:        {}", stats.lost);
    Ok(())
}
