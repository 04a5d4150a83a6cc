//! EstateFlow — command-line client for the lead-tracking engine.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use estateflow_auth::directory::AdminDirectory;
use estateflow_auth::{AuthConfig, AuthService};
use estateflow_core::models::account::Plan;
use estateflow_core::models::lead::{LeadSource, LeadStatus, Purpose, Recurrence};
use estateflow_db::repository::{
    SurrealAccountRepository, SurrealLeadRepository, SurrealSessionStore,
};
use estateflow_db::{DbConfig, DbManager};
use estateflow_leads::LeadService;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod commands;

/// EstateFlow — lead tracking and follow-up scheduling for agents
#[derive(Parser, Debug)]
#[command(name = "estateflow")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path of the local database directory
    #[arg(long, default_value = "estateflow.db")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register a new agent account and log in
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Log in (the master admin is also asked for a security PIN)
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Master-admin second factor
        #[arg(long)]
        pin: Option<String>,
    },

    /// End the active session
    Logout,

    /// Show the active session
    Whoami,

    /// Manage the lead pipeline
    #[command(subcommand)]
    Lead(LeadCommand),

    /// Show overdue and due-today follow-ups
    Followups,

    /// Show pipeline counts
    Stats,

    /// Upgrade the active account to PRO (simulated checkout)
    Upgrade,

    /// Master-admin operations
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand, Debug)]
enum LeadCommand {
    /// Add a lead
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long, default_value = "")]
        budget: String,
        #[arg(long, default_value = "")]
        area: String,
        #[arg(long, default_value = "buy")]
        purpose: Purpose,
        #[arg(long, default_value = "call")]
        source: LeadSource,
        #[arg(long, default_value = "")]
        notes: String,
        /// Next follow-up (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        follow_up: Option<String>,
        #[arg(long, default_value = "none")]
        recurrence: Recurrence,
        /// Days between occurrences for a custom recurrence
        #[arg(long)]
        interval: Option<u32>,
    },

    /// List leads, newest first
    List,

    /// Show one lead with its contact links
    Show { id: Uuid },

    /// Update fields on a lead
    Edit {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        budget: Option<String>,
        #[arg(long)]
        area: Option<String>,
        #[arg(long)]
        purpose: Option<Purpose>,
        #[arg(long)]
        source: Option<LeadSource>,
        #[arg(long)]
        notes: Option<String>,
        /// Next follow-up (RFC 3339 or YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_follow_up")]
        follow_up: Option<String>,
        /// Remove the scheduled follow-up
        #[arg(long)]
        clear_follow_up: bool,
        #[arg(long)]
        recurrence: Option<Recurrence>,
        #[arg(long)]
        interval: Option<u32>,
    },

    /// Move a lead to a new pipeline status
    Status { id: Uuid, status: LeadStatus },

    /// Mark the current follow-up as done
    Done { id: Uuid },

    /// Delete a lead
    Delete { id: Uuid },
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// List every registered agent
    Tenants,

    /// Show a tenant's leads
    Leads { tenant_id: Uuid },

    /// Switch a tenant's plan
    SetPlan { tenant_id: Uuid, plan: Plan },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("estateflow=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let db_config = DbConfig {
        path: cli.data_dir.clone(),
        ..Default::default()
    };
    tracing::debug!(?db_config, "Resolved configuration");

    let manager = DbManager::open(&db_config).await?;
    let db = manager.client().clone();
    estateflow_db::run_migrations(&db).await?;

    let auth = AuthService::new(
        SurrealAccountRepository::new(db.clone()),
        SurrealSessionStore::new(db.clone()),
        AuthConfig::default(),
    );
    let leads = LeadService::new(
        SurrealLeadRepository::new(db.clone()),
        SurrealAccountRepository::new(db.clone()),
    );
    let directory = AdminDirectory::new(
        SurrealAccountRepository::new(db.clone()),
        SurrealLeadRepository::new(db.clone()),
        SurrealSessionStore::new(db.clone()),
    );

    match cli.command {
        Commands::Signup { email, password } => commands::auth::signup(&auth, &email, &password).await,
        Commands::Login { email, password, pin } => {
            commands::auth::login(&auth, &email, &password, pin.as_deref()).await
        }
        Commands::Logout => commands::auth::logout(&auth).await,
        Commands::Whoami => commands::auth::whoami(&auth).await,
        Commands::Lead(cmd) => match cmd {
            LeadCommand::Add {
                name,
                phone,
                budget,
                area,
                purpose,
                source,
                notes,
                follow_up,
                recurrence,
                interval,
            } => {
                commands::leads::add(
                    &auth,
                    &leads,
                    commands::leads::AddArgs {
                        name,
                        phone,
                        budget,
                        area,
                        purpose,
                        source,
                        notes,
                        follow_up,
                        recurrence,
                        interval,
                    },
                )
                .await
            }
            LeadCommand::List => commands::leads::list(&auth, &leads).await,
            LeadCommand::Show { id } => commands::leads::show(&auth, &leads, id).await,
            LeadCommand::Edit {
                id,
                name,
                phone,
                budget,
                area,
                purpose,
                source,
                notes,
                follow_up,
                clear_follow_up,
                recurrence,
                interval,
            } => {
                commands::leads::edit(
                    &auth,
                    &leads,
                    id,
                    commands::leads::EditArgs {
                        name,
                        phone,
                        budget,
                        area,
                        purpose,
                        source,
                        notes,
                        follow_up,
                        clear_follow_up,
                        recurrence,
                        interval,
                    },
                )
                .await
            }
            LeadCommand::Status { id, status } => {
                commands::leads::set_status(&auth, &leads, id, status).await
            }
            LeadCommand::Done { id } => commands::leads::done(&auth, &leads, id).await,
            LeadCommand::Delete { id } => commands::leads::delete(&auth, &leads, id).await,
        },
        Commands::Followups => commands::leads::followups(&auth, &leads).await,
        Commands::Stats => commands::leads::stats(&auth, &leads).await,
        Commands::Upgrade => commands::billing::upgrade(&auth).await,
        Commands::Admin(cmd) => match cmd {
            AdminCommand::Tenants => commands::admin::tenants(&auth, &directory).await,
            AdminCommand::Leads { tenant_id } => {
                commands::admin::leads(&auth, &directory, tenant_id).await
            }
            AdminCommand::SetPlan { tenant_id, plan } => {
                commands::admin::set_plan(&auth, &directory, tenant_id, plan).await
            }
        },
    }
}
