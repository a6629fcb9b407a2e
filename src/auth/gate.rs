use super::{AuthError, Claims, SessionAuthority};
use crate::models::{AccountId, Post, PostId};
use crate::store::Store;
use std::sync::Arc;
use tracing::warn;

/// Allows the action when the token subject is the resource's author.
///
/// A subject that is not a number fails as `InvalidSubject`, never as an
/// ownership mismatch. There is no admin override.
pub fn authorize(claims: &Claims, resource_author_id: AccountId) -> Result<AccountId, AuthError> {
    let caller = claims.account_id()?;
    if caller != resource_author_id {
        return Err(AuthError::NotAuthor { caller });
    }
    Ok(caller)
}

/// Post mutations behind an access token and the ownership rule.
#[derive(Debug, Clone)]
pub struct AccessGate {
    sessions: Arc<SessionAuthority>,
    store: Store,
}

impl AccessGate {
    pub fn new(sessions: Arc<SessionAuthority>, store: Store) -> Self {
        Self { sessions, store }
    }

    /// Creates a post authored by the token's subject.
    pub fn create_post(&self, token: &str, body: &str) -> Result<Post, AuthError> {
        let author_id = self.sessions.authenticate(token)?;
        Ok(self.store.create_post(author_id, body)?)
    }

    pub fn edit_post(&self, token: &str, id: PostId, body: &str) -> Result<Post, AuthError> {
        let caller = self.owner_of(token, id)?;
        Ok(self.store.update_post(id, body, caller)?)
    }

    pub fn delete_post(&self, token: &str, id: PostId) -> Result<(), AuthError> {
        let caller = self.owner_of(token, id)?;
        Ok(self.store.delete_post(id, caller)?)
    }

    fn owner_of(&self, token: &str, id: PostId) -> Result<AccountId, AuthError> {
        let claims = self.sessions.access_claims(token)?;
        let post = self.store.get_post(id)?;

        authorize(&claims, post.author_id).inspect_err(|_| {
            warn!("Account {} denied on post {}", claims.sub, id);
        })
    }
}
