//! Session commands: signup, login, logout, whoami.

use anyhow::Result;
use estateflow_auth::{AuthService, LoginOutcome};
use estateflow_core::repository::{AccountRepository, SessionStore};

pub async fn signup<A: AccountRepository, S: SessionStore>(
    auth: &AuthService<A, S>,
    email: &str,
    password: &str,
) -> Result<()> {
    let session = auth.sign_up(email, password).await?;
    println!(
        "Account created. Logged in as {} ({} plan).",
        session.email, session.plan
    );
    Ok(())
}

pub async fn login<A: AccountRepository, S: SessionStore>(
    auth: &AuthService<A, S>,
    email: &str,
    password: &str,
    pin: Option<&str>,
) -> Result<()> {
    match auth.log_in(email, password, pin).await? {
        LoginOutcome::Authenticated(session) if session.is_admin => {
            println!("Admin authenticated as {}.", session.email);
        }
        LoginOutcome::Authenticated(session) => {
            println!("Logged in as {} ({} plan).", session.email, session.plan);
        }
        LoginOutcome::PinRequired => {
            println!("Admin access detected. Re-run login with --pin <SECURITY-PIN>.");
        }
    }
    Ok(())
}

pub async fn logout<A: AccountRepository, S: SessionStore>(
    auth: &AuthService<A, S>,
) -> Result<()> {
    auth.log_out().await?;
    println!("Logged out.");
    Ok(())
}

pub async fn whoami<A: AccountRepository, S: SessionStore>(
    auth: &AuthService<A, S>,
) -> Result<()> {
    match auth.current_session().await? {
        Some(session) => {
            let admin = if session.is_admin { ", master admin" } else { "" };
            println!("{} ({} plan{admin})", session.email, session.plan);
        }
        None => println!("Not logged in."),
    }
    Ok(())
}
