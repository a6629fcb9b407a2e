mod account;
mod post;

pub use account::{Account, AccountId};
pub use post::{MAX_POST_LEN, Post, PostId};
