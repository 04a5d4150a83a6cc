//! Identity and session orchestration — sign-up, login, logout, and
//! plan changes.
//!
//! Login runs a small state machine: anonymous callers either
//! authenticate directly, or — on the master-admin path — pass the
//! password gate, receive a [`LoginOutcome::PinRequired`] prompt, and
//! re-invoke with the PIN second factor. Credential failures are typed
//! results, never panics.

use chrono::Utc;
use estateflow_core::error::{CrmError, CrmResult};
use estateflow_core::models::account::{Account, CreateAccount, Plan, UpdateAccount};
use estateflow_core::models::session::ActiveSession;
use estateflow_core::repository::{AccountRepository, SessionStore};
use tracing::info;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;

/// Outcome of a login attempt that did not hard-fail.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// Credentials accepted; the session is established and persisted.
    Authenticated(ActiveSession),
    /// Master-admin password accepted but no PIN was supplied. No
    /// session exists yet; the caller is expected to retry with one.
    PinRequired,
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer
/// has no dependency on the database crate.
pub struct AuthService<A: AccountRepository, S: SessionStore> {
    accounts: A,
    sessions: S,
    config: AuthConfig,
}

impl<A: AccountRepository, S: SessionStore> AuthService<A, S> {
    pub fn new(accounts: A, sessions: S, config: AuthConfig) -> Self {
        Self {
            accounts,
            sessions,
            config,
        }
    }

    fn is_master_email(&self, email: &str) -> bool {
        email.trim().eq_ignore_ascii_case(&self.config.master_email)
    }

    /// Register a new account and establish its session immediately
    /// (no separate confirmation step).
    ///
    /// Signing up with the master email AND master password yields the
    /// admin identity; the master email with any other password is an
    /// ordinary FREE account.
    pub async fn sign_up(&self, email: &str, password: &str) -> CrmResult<ActiveSession> {
        let email = email.trim();

        let is_admin = self.is_master_email(email) && password == self.config.master_password;

        let account = self
            .accounts
            .create(CreateAccount {
                email: email.to_string(),
                password: password.to_string(),
                plan: if is_admin { Plan::Pro } else { Plan::Free },
                is_admin,
            })
            .await?;

        info!(account_id = %account.id, "Account registered");
        self.establish(&account).await
    }

    /// Authenticate with email + password, plus the PIN second factor
    /// on the master-admin path.
    pub async fn log_in(
        &self,
        email: &str,
        password: &str,
        pin: Option<&str>,
    ) -> CrmResult<LoginOutcome> {
        if self.is_master_email(email) {
            return self.log_in_master(password, pin).await;
        }

        // 1. Look up the registry entry (case-insensitive).
        let account = match self.accounts.get_by_email(email).await {
            Ok(a) => a,
            Err(CrmError::NotFound { .. }) => {
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        // 2. Verify the password against the stored hash.
        let valid = password::verify_password(
            password,
            &account.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        Ok(LoginOutcome::Authenticated(self.establish(&account).await?))
    }

    /// Master-admin login: password gate, then the PIN second factor.
    async fn log_in_master(&self, password: &str, pin: Option<&str>) -> CrmResult<LoginOutcome> {
        // 1. Password gate. The master email never falls through to
        //    registry-password matching.
        if password != self.config.master_password {
            return Err(AuthError::InvalidCredentials.into());
        }

        // 2. Second factor. A missing PIN is a prompt, not a failure.
        let Some(pin) = pin else {
            return Ok(LoginOutcome::PinRequired);
        };
        if pin != self.config.master_pin {
            return Err(AuthError::InvalidPin.into());
        }

        // 3. Insert the master identity on first use, or reassert its
        //    flags — stored state never downgrades the master account.
        let account = match self.accounts.get_by_email(&self.config.master_email).await {
            Ok(existing) => {
                if existing.is_admin && existing.plan == Plan::Pro {
                    existing
                } else {
                    self.accounts
                        .update(
                            existing.id,
                            UpdateAccount {
                                plan: Some(Plan::Pro),
                                is_admin: Some(true),
                            },
                        )
                        .await?
                }
            }
            Err(CrmError::NotFound { .. }) => {
                self.accounts
                    .create(CreateAccount {
                        email: self.config.master_email.clone(),
                        password: password.to_string(),
                        plan: Plan::Pro,
                        is_admin: true,
                    })
                    .await?
            }
            Err(e) => return Err(e),
        };

        info!(account_id = %account.id, "Master admin authenticated");
        Ok(LoginOutcome::Authenticated(self.establish(&account).await?))
    }

    /// Clear the active session. Idempotent.
    pub async fn log_out(&self) -> CrmResult<()> {
        self.sessions.clear().await
    }

    /// The persisted session, refreshed against the registry.
    ///
    /// The stored copy may be stale (e.g. an admin changed the plan
    /// while the process was down), so the returned session is rebuilt
    /// from the current registry entry. A session whose account has
    /// been removed is dropped.
    pub async fn current_session(&self) -> CrmResult<Option<ActiveSession>> {
        let Some(session) = self.sessions.load().await? else {
            return Ok(None);
        };
        match self.accounts.get_by_id(session.account_id).await {
            Ok(account) => Ok(Some(ActiveSession::for_account(
                &account,
                session.started_at,
            ))),
            Err(CrmError::NotFound { .. }) => {
                self.sessions.clear().await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Change an account's plan, keeping the live session copy
    /// consistent when it belongs to the same account.
    pub async fn update_plan(&self, account_id: Uuid, plan: Plan) -> CrmResult<Account> {
        apply_plan_change(&self.accounts, &self.sessions, account_id, plan).await
    }

    async fn establish(&self, account: &Account) -> CrmResult<ActiveSession> {
        let session = ActiveSession::for_account(account, Utc::now());
        self.sessions.save(session.clone()).await?;
        Ok(session)
    }
}

/// Shared by [`AuthService::update_plan`] and the admin directory: the
/// registry entry changes and, when the active session belongs to the
/// same account, its copy is refreshed in place so no re-login is
/// needed to see the new plan.
pub(crate) async fn apply_plan_change<A: AccountRepository, S: SessionStore>(
    accounts: &A,
    sessions: &S,
    account_id: Uuid,
    plan: Plan,
) -> CrmResult<Account> {
    let account = accounts
        .update(
            account_id,
            UpdateAccount {
                plan: Some(plan),
                ..Default::default()
            },
        )
        .await?;

    if let Some(mut session) = sessions.load().await?
        && session.account_id == account_id
    {
        session.plan = plan;
        sessions.save(session).await?;
    }

    Ok(account)
}
