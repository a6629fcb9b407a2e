use super::{AuthError, Claims, Issuer};
use crate::models::{Account, AccountId};
use crate::store::Store;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::{info, warn};

/// Tokens handed out on a successful login.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub account: Account,
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Mints and checks HS256 bearer tokens, and keeps the store's live
/// refresh-token set in step with what it hands out.
#[derive(Clone)]
pub struct SessionAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    store: Store,
}

impl std::fmt::Debug for SessionAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionAuthority")
            .field("validation", &self.validation)
            .finish()
    }
}

impl SessionAuthority {
    pub fn new(secret: &str, store: Store) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            store,
        }
    }

    pub fn issue_access_token(&self, account_id: AccountId) -> Result<String, AuthError> {
        self.sign(&Claims::new(Issuer::Access, account_id, Utc::now()))
    }

    /// Signs a refresh token. It is not usable until registered with
    /// [`Store::add_refresh_token`]; [`SessionAuthority::login`] does both.
    pub fn issue_refresh_token(&self, account_id: AccountId) -> Result<String, AuthError> {
        self.sign(&Claims::new(Issuer::Refresh, account_id, Utc::now()))
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding_key).map_err(AuthError::Signing)
    }

    /// Checks signature and expiry and returns the claims.
    pub fn parse_and_validate(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature => AuthError::SignatureInvalid,
                _ => AuthError::Malformed,
            })
    }

    /// Rejects a token of the wrong class, so a refresh token cannot stand in
    /// for an access token or the other way round.
    pub fn require_issuer(claims: &Claims, expected: Issuer) -> Result<(), AuthError> {
        if claims.iss != expected {
            return Err(AuthError::WrongTokenType {
                expected,
                found: claims.iss,
            });
        }
        Ok(())
    }

    /// Validates an access token and returns its claims.
    pub fn access_claims(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.parse_and_validate(token)?;
        Self::require_issuer(&claims, Issuer::Access)?;
        Ok(claims)
    }

    /// The account an access token was issued to.
    pub fn authenticate(&self, token: &str) -> Result<AccountId, AuthError> {
        self.access_claims(token)?.account_id()
    }

    /// Checks the credentials and hands out a fresh access/refresh pair.
    /// Failed logins all look the same to the caller.
    pub fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let Some(account) = self.store.valid_login(email, password)? else {
            return Err(AuthError::InvalidCredentials);
        };

        let access_token = self.issue_access_token(account.id)?;
        let refresh_token = self.issue_refresh_token(account.id)?;
        self.store.add_refresh_token(&refresh_token)?;

        info!("Account logged in: {}", account.id);

        Ok(TokenPair {
            account,
            access_token,
            refresh_token,
            expires_in: Issuer::Access.ttl().num_seconds(),
        })
    }

    /// Mints a new access token from a live refresh token. The refresh token
    /// itself stays live.
    pub fn refresh_access_token(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self.parse_and_validate(refresh_token)?;
        Self::require_issuer(&claims, Issuer::Refresh)?;

        if !self.store.is_live_refresh_token(refresh_token)? {
            warn!("Refresh attempted with revoked token for subject {}", claims.sub);
            return Err(AuthError::Revoked);
        }

        self.issue_access_token(claims.account_id()?)
    }

    /// Removes a refresh token from the live set. Revoking an unknown or
    /// already revoked token succeeds.
    pub fn revoke(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.store.revoke_refresh_token(refresh_token)?;
        Ok(())
    }

    #[cfg(test)]
    fn issue_at(
        &self,
        issuer: Issuer,
        account_id: AccountId,
        issued_at: chrono::DateTime<Utc>,
    ) -> Result<String, AuthError> {
        self.sign(&Claims::new(issuer, account_id, issued_at))
    }
}
