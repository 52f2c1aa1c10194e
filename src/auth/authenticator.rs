//! Bearer header construction

use super::types::{AuthHeaders, Credential};
use std::collections::HashMap;

/// Header carrying the credential
pub const AUTHORIZATION: &str = "Authorization";

/// Prefix placed in front of the secret
pub const BEARER_PREFIX: &str = "Bearer ";

/// Build the authorization headers for `secret`
///
/// The result holds exactly one entry, `Authorization: Bearer <secret>`.
/// An empty secret is not rejected here; the API answers it with a 401.
pub fn build_headers(secret: &Credential) -> AuthHeaders {
    let mut headers = HashMap::with_capacity(1);
    headers.insert(
        AUTHORIZATION.to_string(),
        format!("{BEARER_PREFIX}{}", secret.expose()),
    );
    AuthHeaders::from_map(headers)
}
