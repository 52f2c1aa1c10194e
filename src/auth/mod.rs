//! Authentication module
//!
//! Turns the API secret into the outbound `Authorization` header.
//!
//! The secret is wrapped in [`Credential`] so that it never shows up in
//! `Debug` output or logs. [`build_headers`] produces an immutable
//! [`AuthHeaders`] value that is built once per session and shared by
//! reference across every request and metric.

mod authenticator;
mod types;

pub use authenticator::{build_headers, AUTHORIZATION, BEARER_PREFIX};
pub use types::{AuthHeaders, Credential};

#[cfg(test)]
mod tests;
