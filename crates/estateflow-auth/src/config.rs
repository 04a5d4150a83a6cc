//! Authentication configuration.

/// Configuration for the authentication service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Email of the master-admin identity, compared case-insensitively.
    pub master_email: String,
    /// Password of the master-admin identity.
    pub master_password: String,
    /// Fixed 4-digit second factor required for master-admin login.
    pub master_pin: String,
    /// Optional pepper prepended to passwords before Argon2id
    /// verification. Must match the pepper used when hashing.
    pub pepper: Option<String>,
}

impl Default for AuthConfig {
    /// The defaults mirror the credentials the original client shipped
    /// with. Deployments should override all three master fields.
    fn default() -> Self {
        Self {
            master_email: "Admin123!@gmail.com".into(),
            master_password: "Admin123!".into(),
            master_pin: "8888".into(),
            pepper: None,
        }
    }
}
