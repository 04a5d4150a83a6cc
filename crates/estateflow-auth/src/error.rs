//! Authentication error types.

use estateflow_core::error::CrmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid security PIN")]
    InvalidPin,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for CrmError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidPin => {
                CrmError::AuthenticationFailed {
                    reason: err.to_string(),
                }
            }
            AuthError::Crypto(msg) => CrmError::Internal(msg),
        }
    }
}
