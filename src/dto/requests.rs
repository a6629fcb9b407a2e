use crate::models::AccountId;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Validate, Deserialize)]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// PUT /api/users carries the same fields as signup.
pub type UpdateAccountRequest = SignupRequest;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Form body of the OAuth2 password grant. `username` is the email.
#[derive(Debug, Deserialize, Validate)]
pub struct TokenForm {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    pub grant_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostBodyRequest {
    #[serde(alias = "chirpBody")]
    pub body: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// GET /api/chirps?author_id=1&sort=desc
#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub author_id: Option<AccountId>,
    #[serde(default)]
    pub sort: SortOrder,
}

#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    pub event: String,
    #[serde(default)]
    pub data: WebhookData,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookData {
    pub user_id: Option<AccountId>,
}
