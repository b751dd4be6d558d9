//! Credential Verifier: bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying the caller-supplied claims (`email` plus
//! any extra fields, preserved verbatim), `iat`, and `exp = iat + 1h`.
//! Verification is deterministic in `(token, now, secret)`: signature and
//! structure are checked by `jsonwebtoken`, expiry is checked here against
//! an explicit `now` with zero leeway.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use swiftbite_core::Email;

use super::AuthError;

/// Validity window of an issued token, in seconds.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

/// Registered claims the service owns; never taken from the caller.
const RESERVED_CLAIMS: &[&str] = &["iat", "exp"];

/// Identity claims carried by a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The identity key.
    pub email: Email,
    /// Any other caller-supplied fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Claims carrying only an email.
    #[must_use]
    pub fn new(email: Email) -> Self {
        Self {
            email,
            extra: Map::new(),
        }
    }
}

/// Wire form of a token payload.
#[derive(Debug, Serialize, Deserialize)]
struct SignedClaims {
    #[serde(flatten)]
    claims: Claims,
    iat: i64,
    exp: i64,
}

/// An identity decoded from a token that passed verification.
///
/// Only [`TokenService`] can construct one, so holding a `VerifiedIdentity`
/// proves the Credential Verifier ran.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedIdentity {
    claims: Claims,
    expires_at: i64,
}

impl VerifiedIdentity {
    pub(super) const fn new(claims: Claims, expires_at: i64) -> Self {
        Self { claims, expires_at }
    }

    /// The verified email.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.claims.email
    }

    /// The full decoded claim set.
    #[must_use]
    pub const fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Expiry as a Unix timestamp.
    #[must_use]
    pub const fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// Self-scoped check: the caller must be the identity named by the request.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Forbidden` on mismatch.
    pub fn ensure_self(&self, email: &Email) -> Result<(), AuthError> {
        if &self.claims.email == email {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

/// Issues and verifies bearer tokens with one process-wide secret.
///
/// Built once at start-up from configuration; the secret never changes for
/// the life of the service.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a token service signing with `secret`.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let key = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an injected clock in `verify_at`.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            validation,
        }
    }

    /// Issue a token valid for one hour from now.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Signing` if encoding fails.
    pub fn issue(&self, claims: Claims) -> Result<String, AuthError> {
        self.issue_at(claims, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now` (Unix seconds).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Signing` if encoding fails.
    pub fn issue_at(&self, mut claims: Claims, now: i64) -> Result<String, AuthError> {
        for reserved in RESERVED_CLAIMS {
            claims.extra.remove(*reserved);
        }

        let payload = SignedClaims {
            claims,
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &payload, &self.encoding)
            .map_err(AuthError::Signing)
    }

    /// Verify a token against the wall clock.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` if the token is malformed, signed
    /// with another secret, or expired.
    pub fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify a token as if the current time were `now` (Unix seconds).
    ///
    /// A token is valid strictly before its `exp`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` if the token is malformed, signed
    /// with another secret, or expired.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<VerifiedIdentity, AuthError> {
        let data = jsonwebtoken::decode::<SignedClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "token rejected");
                AuthError::Unauthorized
            })?;

        let SignedClaims { claims, exp, .. } = data.claims;
        if now >= exp {
            tracing::debug!(exp, now, "token expired");
            return Err(AuthError::Unauthorized);
        }

        Ok(VerifiedIdentity::new(claims, exp))
    }

    /// Verify the raw value of an `Authorization` header.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` if the header is absent, is not of
    /// the form `Bearer <token>`, or the token fails verification.
    pub fn verify_header(&self, header: Option<&str>) -> Result<VerifiedIdentity, AuthError> {
        let token = header
            .and_then(bearer_token)
            .ok_or(AuthError::Unauthorized)?;
        self.verify(token)
    }
}

/// Extract the token from a `Bearer <token>` header value.
#[must_use]
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty() && !token.contains(' '))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const NOW: i64 = 1_790_000_000;

    fn service(secret: &str) -> TokenService {
        TokenService::new(&SecretString::from(secret.to_string()))
    }

    fn claims(email: &str) -> Claims {
        Claims::new(Email::parse(email).unwrap())
    }

    #[test]
    fn test_round_trip_preserves_claims() {
        let tokens = service("k3Jx9!pQ2@vL7#mW4$zR8%tY1^bN6&cF");
        let mut original = claims("ada@swiftbite.io");
        original
            .extra
            .insert("name".to_string(), Value::String("Ada".to_string()));
        original.extra.insert("tier".to_string(), Value::from(3));

        let token = tokens.issue_at(original.clone(), NOW).unwrap();
        let identity = tokens.verify_at(&token, NOW + 10).unwrap();

        assert_eq!(identity.claims(), &original);
        assert_eq!(identity.email().as_str(), "ada@swiftbite.io");
        assert_eq!(identity.expires_at(), NOW + TOKEN_TTL_SECS);
    }

    #[test]
    fn test_caller_cannot_extend_expiry() {
        let tokens = service("secret-one");
        let mut original = claims("ada@swiftbite.io");
        original
            .extra
            .insert("exp".to_string(), Value::from(NOW + 1_000_000));

        let token = tokens.issue_at(original, NOW).unwrap();
        let identity = tokens.verify_at(&token, NOW).unwrap();

        assert_eq!(identity.expires_at(), NOW + TOKEN_TTL_SECS);
        assert!(identity.claims().extra.is_empty());
    }

    #[test]
    fn test_valid_until_expiry_boundary() {
        let tokens = service("secret-one");
        let token = tokens.issue_at(claims("ada@swiftbite.io"), NOW).unwrap();

        assert!(tokens.verify_at(&token, NOW + TOKEN_TTL_SECS - 1).is_ok());
        assert!(matches!(
            tokens.verify_at(&token, NOW + TOKEN_TTL_SECS),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn test_rejects_mismatched_secret() {
        let token = service("secret-one")
            .issue_at(claims("ada@swiftbite.io"), NOW)
            .unwrap();

        let result = service("secret-two").verify_at(&token, NOW);
        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        let tokens = service("secret-one");
        for token in ["", "abc", "a.b.c", "eyJhbGciOiJIUzI1NiJ9.e30.AAAA"] {
            assert!(
                matches!(tokens.verify_at(token, NOW), Err(AuthError::Unauthorized)),
                "accepted {token:?}"
            );
        }
    }

    #[test]
    fn test_rejects_tampered_payload() {
        let tokens = service("secret-one");
        let token = tokens.issue_at(claims("ada@swiftbite.io"), NOW).unwrap();
        let forged = service("secret-one")
            .issue_at(claims("eve@swiftbite.io"), NOW)
            .unwrap();

        // Splice the forged payload onto the original signature.
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert!(matches!(
            tokens.verify_at(&spliced, NOW),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn test_rejects_token_without_expiry() {
        #[derive(Serialize)]
        struct NoExp<'a> {
            email: &'a str,
        }

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &NoExp {
                email: "ada@swiftbite.io",
            },
            &EncodingKey::from_secret(b"secret-one"),
        )
        .unwrap();

        assert!(matches!(
            service("secret-one").verify_at(&token, NOW),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn test_rejects_token_with_invalid_email_claim() {
        #[derive(Serialize)]
        struct BadEmail<'a> {
            email: &'a str,
            exp: i64,
        }

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &BadEmail {
                email: "not an email",
                exp: NOW + 60,
            },
            &EncodingKey::from_secret(b"secret-one"),
        )
        .unwrap();

        assert!(matches!(
            service("secret-one").verify_at(&token, NOW),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("abc.def.ghi"), None);
        assert_eq!(bearer_token("Bearer a b"), None);
    }

    #[test]
    fn test_verify_header_requires_bearer() {
        let tokens = service("secret-one");
        let token = tokens.issue(claims("ada@swiftbite.io")).unwrap();

        assert!(tokens.verify_header(None).is_err());
        assert!(tokens.verify_header(Some(token.as_str())).is_err());
        assert!(
            tokens
                .verify_header(Some(format!("Bearer {token}").as_str()))
                .is_ok()
        );
    }

    #[test]
    fn test_ensure_self() {
        let tokens = service("secret-one");
        let token = tokens.issue_at(claims("ada@swiftbite.io"), NOW).unwrap();
        let identity = tokens.verify_at(&token, NOW).unwrap();

        assert!(
            identity
                .ensure_self(&Email::parse("ada@swiftbite.io").unwrap())
                .is_ok()
        );
        assert!(matches!(
            identity.ensure_self(&Email::parse("eve@swiftbite.io").unwrap()),
            Err(AuthError::Forbidden)
        ));
    }
}
