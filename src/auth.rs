// ABOUTME: Credential discovery and session establishment
// ABOUTME: CLI flag → environment variable, then a single login exchange

use crate::api::ApiClient;
use crate::model::Session;
use crate::{Error, Result};
use std::env;
use tracing::info;

pub const USER_ID_ENV: &str = "WIZ_USER_ID";
pub const PASSWORD_ENV: &str = "WIZ_PASSWORD";

#[derive(Clone)]
pub struct Credentials {
    pub user_id: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub fn resolve_credentials(
    cli_user_id: Option<String>,
    cli_password: Option<String>,
) -> Result<Credentials> {
    resolve_with(cli_user_id, cli_password, |key| env::var(key).ok())
}

fn resolve_with(
    cli_user_id: Option<String>,
    cli_password: Option<String>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Credentials> {
    let pick = |cli: Option<String>, key: &str| {
        cli.or_else(|| lookup(key)).filter(|v| !v.is_empty())
    };

    let user_id = pick(cli_user_id, USER_ID_ENV).ok_or_else(|| {
        Error::Usage(format!("missing user id (--user-id or {})", USER_ID_ENV))
    })?;
    let password = pick(cli_password, PASSWORD_ENV).ok_or_else(|| {
        Error::Usage(format!("missing password (--password or {})", PASSWORD_ENV))
    })?;

    Ok(Credentials { user_id, password })
}

/// Logs in once. Any failure here is fatal to the run.
pub fn authenticate(client: &ApiClient, credentials: &Credentials) -> Result<Session> {
    let session = client.login(&credentials.user_id, &credentials.password)?;

    info!(
        kb_server = %session.kb_server,
        kb_guid = %session.kb_guid,
        user = session.display_name.as_deref().unwrap_or(&session.user_guid),
        "session established"
    );

    Ok(session)
}
