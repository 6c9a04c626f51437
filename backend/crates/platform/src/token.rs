//! Signed Bearer Tokens
//!
//! HMAC-signed, time-bound tokens (JWT, HS256). The signing secret is
//! process-wide configuration injected at startup; there is no server-side
//! revocation, a token is valid until its `exp` claim lapses or the secret
//! changes.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Token verification errors
///
/// `Malformed` covers structurally broken input, `Invalid` covers a
/// well-formed token whose signature does not check out. Neither variant
/// carries signature internals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Token TTL has lapsed
    #[error("Token expired")]
    Expired,

    /// Signature mismatch or otherwise unacceptable token
    #[error("Invalid token")]
    Invalid,

    /// Not a structurally valid token
    #[error("Malformed token")]
    Malformed,

    /// Claims could not be serialized when issuing
    #[error("Failed to encode token")]
    Encoding,
}

/// Issues and verifies signed bearer tokens
///
/// Holds the derived signing keys; construct once at startup and share.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a token service from the process-wide signing secret
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::default();
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign a claim set
    ///
    /// The claims must carry their own `exp` (and usually `iat`); the
    /// service does not add timestamps.
    pub fn issue<C: Serialize>(&self, claims: &C) -> Result<String, TokenError> {
        encode(&Header::default(), claims, &self.encoding).map_err(|_| TokenError::Encoding)
    }

    /// Verify a token and decode its claims
    pub fn verify<C: DeserializeOwned>(&self, token: &str) -> Result<C, TokenError> {
        use jsonwebtoken::errors::ErrorKind;

        decode::<C>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_) => TokenError::Malformed,
                _ => TokenError::Invalid,
            })
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestClaims {
        sub: String,
        iat: i64,
        exp: i64,
    }

    fn claims_valid_for(secs: i64) -> TestClaims {
        let now = chrono::Utc::now().timestamp();
        TestClaims {
            sub: "subject".to_string(),
            iat: now,
            exp: now + secs,
        }
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let service = TokenService::new(b"test-secret-key");
        let claims = claims_valid_for(60);

        let token = service.issue(&claims).unwrap();
        let decoded: TestClaims = service.verify(&token).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = TokenService::new(b"test-secret-key");
        let claims = claims_valid_for(-60);

        let token = service.issue(&claims).unwrap();
        let err = service.verify::<TestClaims>(&token).unwrap_err();
        assert_eq!(err, TokenError::Expired);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = TokenService::new(b"right-secret");
        let verifier = TokenService::new(b"wrong-secret");

        let token = issuer.issue(&claims_valid_for(60)).unwrap();
        let err = verifier.verify::<TestClaims>(&token).unwrap_err();
        assert_eq!(err, TokenError::Invalid);
    }

    #[test]
    fn test_malformed_token_rejected() {
        let service = TokenService::new(b"test-secret-key");

        let err = service.verify::<TestClaims>("garbage").unwrap_err();
        assert_eq!(err, TokenError::Malformed);

        let err = service.verify::<TestClaims>("").unwrap_err();
        assert_eq!(err, TokenError::Malformed);
    }
}
