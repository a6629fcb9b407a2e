use super::AuthError;
use crate::models::AccountId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const ACCESS_TOKEN_TTL: Duration = Duration::hours(1);
pub const REFRESH_TOKEN_TTL: Duration = Duration::days(60);

/// Which class of token a claim set belongs to, carried in `iss`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Issuer {
    #[serde(rename = "chirpy-access")]
    Access,
    #[serde(rename = "chirpy-refresh")]
    Refresh,
}

impl Issuer {
    pub fn ttl(self) -> Duration {
        match self {
            Issuer::Access => ACCESS_TOKEN_TTL,
            Issuer::Refresh => REFRESH_TOKEN_TTL,
        }
    }
}

impl fmt::Display for Issuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issuer::Access => write!(f, "access"),
            Issuer::Refresh => write!(f, "refresh"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: Issuer,
    pub sub: String, // Subject (account id)
    pub iat: i64,
    pub exp: i64,
    /// Unique per token, so two tokens minted in the same second differ.
    #[serde(default)]
    pub jti: String,
}

impl Claims {
    pub fn new(issuer: Issuer, account_id: AccountId, issued_at: DateTime<Utc>) -> Self {
        Self {
            iss: issuer,
            sub: account_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + issuer.ttl()).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// The subject parsed back into an account id.
    pub fn account_id(&self) -> Result<AccountId, AuthError> {
        self.sub
            .parse()
            .map_err(|_| AuthError::InvalidSubject(self.sub.clone()))
    }
}
