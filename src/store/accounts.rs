use super::{State, Store, StoreError};
use crate::models::{Account, AccountId};
use tracing::{info, warn};

impl Store {
    /// Registers a new account under the next account id.
    pub fn create_account(&self, email: &str, password: &str) -> Result<Account, StoreError> {
        // bcrypt is slow; keep it outside the lock.
        let digest = self.vault().hash(password)?;

        let mut state = self.write()?;
        if email_owner(&state, email).is_some() {
            return Err(StoreError::EmailInUse);
        }

        let snapshot = &mut state.snapshot;
        let account = Account {
            email: email.to_string(),
            id: snapshot.next_account_id,
            is_upgraded: false,
        };
        snapshot.next_account_id += 1;
        snapshot.accounts.insert(account.id, account.clone());
        snapshot.hashes.insert(account.id, digest);
        self.mark_dirty(&mut state);

        info!("Account created: {} ({})", account.id, account.email);
        Ok(account)
    }

    /// Overwrites email and password for `id`.
    ///
    /// The id is not checked for existence: callers take it from a verified
    /// access token subject, and an unknown id is written as a new entry.
    pub fn update_account(
        &self,
        id: AccountId,
        email: &str,
        password: &str,
    ) -> Result<Account, StoreError> {
        let digest = self.vault().hash(password)?;

        let mut state = self.write()?;
        if email_owner(&state, email).is_some_and(|owner| owner != id) {
            return Err(StoreError::EmailInUse);
        }

        let snapshot = &mut state.snapshot;
        let account = Account {
            email: email.to_string(),
            id,
            is_upgraded: snapshot.accounts.get(&id).is_some_and(|a| a.is_upgraded),
        };
        snapshot.accounts.insert(id, account.clone());
        snapshot.hashes.insert(id, digest);
        self.mark_dirty(&mut state);

        info!("Account updated: {}", id);
        Ok(account)
    }

    /// Sets the upgrade flag. Called by the payment webhook.
    pub fn upgrade_account(&self, id: AccountId) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let account = state
            .snapshot
            .accounts
            .get_mut(&id)
            .ok_or(StoreError::AccountNotFound(id))?;
        account.is_upgraded = true;
        self.mark_dirty(&mut state);

        info!("Account upgraded: {}", id);
        Ok(())
    }

    pub fn get_account(&self, id: AccountId) -> Result<Account, StoreError> {
        self.read()?
            .snapshot
            .accounts
            .get(&id)
            .cloned()
            .ok_or(StoreError::AccountNotFound(id))
    }

    pub fn is_email_used(&self, email: &str) -> Result<bool, StoreError> {
        let state = self.read()?;
        Ok(email_owner(&state, email).is_some())
    }

    /// Returns the account when `email` and `password` match.
    ///
    /// Unknown email, a missing hash and a wrong password all give `None`,
    /// so callers cannot tell which accounts exist.
    pub fn valid_login(&self, email: &str, password: &str) -> Result<Option<Account>, StoreError> {
        let (account, digest) = {
            let state = self.read()?;
            let Some(id) = email_owner(&state, email) else {
                return Ok(None);
            };
            let Some(digest) = state.snapshot.hashes.get(&id) else {
                return Ok(None);
            };
            (state.snapshot.accounts[&id].clone(), digest.clone())
        };

        match self.vault().verify(&digest, password) {
            Ok(true) => Ok(Some(account)),
            Ok(false) => Ok(None),
            Err(e) => {
                warn!("Stored hash for account {} is unusable: {}", account.id, e);
                Ok(None)
            }
        }
    }
}

/// Linear scan for the account holding `email`.
fn email_owner(state: &State, email: &str) -> Option<AccountId> {
    state
        .snapshot
        .accounts
        .values()
        .find(|account| account.email == email)
        .map(|account| account.id)
}
