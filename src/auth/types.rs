//! Auth value types
//!
//! `Credential` holds the raw secret, `AuthHeaders` the derived headers.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;

/// Opaque API secret
///
/// Supplied once per run by the caller. The value is only reachable
/// through [`Credential::expose`]; formatting always redacts it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a secret value
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Read the secret from an environment variable
    pub fn from_env(var: &str) -> Result<Self> {
        match std::env::var(var) {
            Ok(value) => Ok(Self(value)),
            Err(std::env::VarError::NotPresent) => Err(Error::config(format!(
                "environment variable {var} is not set"
            ))),
            Err(std::env::VarError::NotUnicode(_)) => Err(Error::invalid_value(
                var,
                "environment variable is not valid unicode",
            )),
        }
    }

    /// Borrow the raw secret
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Check if the secret is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Outbound credential headers
///
/// Immutable once built. Values are redacted in `Debug` output.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthHeaders {
    headers: HashMap<String, String>,
}

impl AuthHeaders {
    pub(crate) fn from_map(headers: HashMap<String, String>) -> Self {
        Self { headers }
    }

    /// Look up a header value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Iterate over `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of headers
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Check if there are no headers
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

impl fmt::Debug for AuthHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.headers.keys().map(|k| (k, "***")))
            .finish()
    }
}
