//! Bearer tokens and the rules built on them.

mod bearer;
mod claims;
mod gate;
mod session;

pub use bearer::bearer_token;
pub use claims::{ACCESS_TOKEN_TTL, Claims, Issuer, REFRESH_TOKEN_TTL};
pub use gate::{AccessGate, authorize};
pub use session::{SessionAuthority, TokenPair};

use crate::models::AccountId;
use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    SignatureInvalid,
    #[error("token has expired")]
    Expired,
    #[error("expected {expected} token, got {found} token")]
    WrongTokenType { expected: Issuer, found: Issuer },
    #[error("refresh token has been revoked")]
    Revoked,
    #[error("token subject {0:?} is not an account id")]
    InvalidSubject(String),
    #[error("account {caller} does not own this resource")]
    NotAuthor { caller: AccountId },
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}
