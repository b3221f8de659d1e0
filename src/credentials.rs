use anyhow::{bail, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

pub const EMAIL_VAR: &str = "FORGE_API_EMAIL";
pub const TOKEN_VAR: &str = "FORGE_API_TOKEN";

/// Fetch a required variable through `lookup`; unset and empty are both fatal.
pub fn required_var<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => bail!("{name} is not set. Please export it, e.g. `export {name}=...`"),
    }
}

/// API identity + token pair, sent as HTTP Basic auth.
#[derive(Clone)]
pub struct Credentials {
    email: String,
    token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").field("email", &self.email).field("token", &"***").finish()
    }
}

impl Credentials {
    pub fn new(email: impl Into<String>, token: impl Into<String>) -> Self {
        Self { email: email.into(), token: token.into() }
    }

    /// Read `FORGE_API_EMAIL` / `FORGE_API_TOKEN` from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env` against an arbitrary variable source. The email is checked first.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let email = required_var(&lookup, EMAIL_VAR)?;
        let token = required_var(&lookup, TOKEN_VAR)?;
        Ok(Self { email, token })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// `Basic base64(email:token)`
    pub fn basic_auth_header(&self) -> String {
        format!("Basic {}", STANDARD.encode(format!("{}:{}", self.email, self.token)))
    }
}
