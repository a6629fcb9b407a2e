use super::{Store, StoreError};

impl Store {
    /// Marks a refresh token as live.
    pub fn add_refresh_token(&self, token: &str) -> Result<(), StoreError> {
        let mut state = self.write()?;
        state.snapshot.live_tokens.insert(token.to_string());
        self.mark_dirty(&mut state);
        Ok(())
    }

    /// Drops a refresh token from the live set. Unknown tokens are ignored.
    pub fn revoke_refresh_token(&self, token: &str) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if state.snapshot.live_tokens.remove(token) {
            self.mark_dirty(&mut state);
        }
        Ok(())
    }

    pub fn is_live_refresh_token(&self, token: &str) -> Result<bool, StoreError> {
        Ok(self.read()?.snapshot.live_tokens.contains(token))
    }
}
