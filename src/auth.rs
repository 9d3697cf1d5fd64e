//! Credential check for the operator login.
//!
//! The check is pluggable: the default implementation compares against the
//! credential pair from the config file and hands back an opaque session
//! token. Nothing else in the service interprets the token.

use crate::config::Auth;
use crate::db::{self, Pool};
use crate::error::{Error, Result};
use uuid::Uuid;

pub trait CredentialCheck: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Single credential pair loaded from the config file.
pub struct ConfigCredentials {
    auth: Auth,
}

impl ConfigCredentials {
    pub fn new(auth: Auth) -> Self {
        Self { auth }
    }
}

impl CredentialCheck for ConfigCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.auth.username && password == self.auth.password
    }
}

/// Verify credentials and issue a persisted session token.
pub async fn login(
    pool: &Pool,
    check: &dyn CredentialCheck,
    username: &str,
    password: &str,
) -> Result<String> {
    if !check.verify(username, password) {
        return Err(Error::Unauthorized);
    }
    let token = Uuid::new_v4().to_string();
    db::insert_session(pool, &token, username).await?;
    Ok(token)
}
