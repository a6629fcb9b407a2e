use serde::{Deserialize, Serialize};

pub type AccountId = u64;

/// A registered account. The password hash lives next to it in the store
/// and is never part of this value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    pub id: AccountId,
    /// Set by the payment webhook once the account has been upgraded.
    #[serde(rename = "is_chirpy_red", default)]
    pub is_upgraded: bool,
}
