use crate::models::{AccountId, PostId};
use crate::vault::VaultError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email is already used by another account")]
    EmailInUse,
    #[error("post body is {len} bytes, the limit is {max}")]
    TooLong { len: usize, max: usize },
    #[error("post {0} not found")]
    PostNotFound(PostId),
    #[error("account {0} not found")]
    AccountNotFound(AccountId),
    #[error("account {caller} is not the author of post {post}")]
    NotAuthor { post: PostId, caller: AccountId },
    /// A writer panicked while holding the store lock.
    #[error("record store is unavailable")]
    Unavailable,
    #[error(transparent)]
    Hash(#[from] VaultError),
    #[error("snapshot io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot is not valid json: {0}")]
    Snapshot(#[from] serde_json::Error),
}
