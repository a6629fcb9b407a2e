use axum::http::{HeaderMap, header};

/// Pulls the credential out of the `Authorization` header.
///
/// `Bearer <token>` is the expected form, but any scheme word is skipped and
/// a bare token is accepted as is.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    let token = match value.split_once(' ') {
        Some((_scheme, token)) => token.trim(),
        None => value,
    };

    (!token.is_empty()).then_some(token)
}
