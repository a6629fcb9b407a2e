use super::AccountId;
use serde::{Deserialize, Serialize};

pub type PostId = u64;

/// Maximum body length in bytes, checked when a post is created.
pub const MAX_POST_LEN: usize = 140;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub body: String,
    pub id: PostId,
    pub author_id: AccountId,
}
