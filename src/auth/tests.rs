//! Tests for the auth module

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_build_headers_single_bearer_entry() {
    let headers = build_headers(&Credential::new("my-token"));

    assert_eq!(headers.len(), 1);
    assert_eq!(headers.get("Authorization"), Some("Bearer my-token"));
}

#[test]
fn test_build_headers_is_idempotent() {
    let secret = Credential::new("abc123");

    let first = build_headers(&secret);
    let second = build_headers(&secret);

    assert_eq!(first, second);
}

#[test]
fn test_build_headers_accepts_empty_secret() {
    let headers = build_headers(&Credential::new(""));
    assert_eq!(headers.get(AUTHORIZATION), Some("Bearer "));
}

#[test]
fn test_different_secrets_produce_different_headers() {
    let a = build_headers(&Credential::new("a"));
    let b = build_headers(&Credential::new("b"));
    assert_ne!(a, b);
}

#[test]
fn test_credential_debug_is_redacted() {
    let secret = Credential::new("super-secret");

    assert_eq!(format!("{secret:?}"), "Credential(***)");
    assert_eq!(secret.to_string(), "***");
    assert_eq!(secret.expose(), "super-secret");
}

#[test]
fn test_auth_headers_debug_is_redacted() {
    let headers = build_headers(&Credential::new("super-secret"));
    let debug = format!("{headers:?}");

    assert!(debug.contains("Authorization"));
    assert!(!debug.contains("super-secret"));
}

#[test]
fn test_credential_from_env() {
    std::env::set_var("INSIGHTS_TEST_SECRET_PRESENT", "from-env");
    let secret = Credential::from_env("INSIGHTS_TEST_SECRET_PRESENT").unwrap();
    assert_eq!(secret.expose(), "from-env");
}

#[test]
fn test_credential_from_env_missing() {
    let err = Credential::from_env("INSIGHTS_TEST_SECRET_DEFINITELY_UNSET").unwrap_err();
    assert!(err
        .to_string()
        .contains("INSIGHTS_TEST_SECRET_DEFINITELY_UNSET"));
}
