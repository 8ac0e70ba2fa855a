//! Bearer-token authentication helpers
//!
//! The service compares SHA-256 digests of the presented token and the
//! configured token, so the configured token is never held in plain text by
//! the HTTP layer.
//!
//! # Pure Functions
//!
//! No HTTP framework dependencies here; the tower layer lives in the
//! service crate.

use sha2::{Digest, Sha256};
use thiserror::Error;

/// SHA-256 digest of a token
pub type TokenDigest = [u8; 32];

/// Authentication error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Authorization header absent
    #[error("Access token required")]
    MissingToken,

    /// Authorization header present but not `Bearer <token>`
    #[error("Malformed authorization header")]
    MalformedHeader,

    /// Token does not match
    #[error("Invalid access token")]
    InvalidToken,
}

/// Calculate the digest of a token
///
/// # Examples
///
/// ```
/// use kalakar_common::auth::token_digest;
///
/// assert_eq!(token_digest("secret"), token_digest("secret"));
/// assert_ne!(token_digest("secret"), token_digest("Secret"));
/// ```
pub fn token_digest(token: &str) -> TokenDigest {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().into()
}

/// Extract the token from an `Authorization` header value
///
/// # Examples
///
/// ```
/// use kalakar_common::auth::parse_bearer;
///
/// assert_eq!(parse_bearer("Bearer abc123").unwrap(), "abc123");
/// assert!(parse_bearer("Basic abc123").is_err());
/// ```
pub fn parse_bearer(header_value: &str) -> Result<&str, AuthError> {
    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }

    Ok(token)
}

/// Validate an optional `Authorization` header against the expected digest
pub fn validate_bearer(
    header_value: Option<&str>,
    expected: &TokenDigest,
) -> Result<(), AuthError> {
    let header_value = header_value.ok_or(AuthError::MissingToken)?;
    let token = parse_bearer(header_value)?;

    if digests_match(&token_digest(token), expected) {
        Ok(())
    } else {
        Err(AuthError::InvalidToken)
    }
}

/// Compare digests without short-circuiting on the first differing byte
fn digests_match(a: &TokenDigest, b: &TokenDigest) -> bool {
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_token() {
        let expected = token_digest("artisan-token");
        assert_eq!(validate_bearer(Some("Bearer artisan-token"), &expected), Ok(()));
    }

    #[test]
    fn test_missing_header() {
        let expected = token_digest("artisan-token");
        assert_eq!(validate_bearer(None, &expected), Err(AuthError::MissingToken));
    }

    #[test]
    fn test_wrong_scheme() {
        let expected = token_digest("artisan-token");
        assert_eq!(
            validate_bearer(Some("Token artisan-token"), &expected),
            Err(AuthError::MalformedHeader)
        );
        assert_eq!(validate_bearer(Some("Bearer   "), &expected), Err(AuthError::MalformedHeader));
    }

    #[test]
    fn test_wrong_token() {
        let expected = token_digest("artisan-token");
        assert_eq!(
            validate_bearer(Some("Bearer buyer-token"), &expected),
            Err(AuthError::InvalidToken)
        );
    }
}
