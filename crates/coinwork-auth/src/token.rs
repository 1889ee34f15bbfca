//! JWT claims, configuration, and the token service.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use coinwork_core::{Identity, Role};

use crate::error::{AuthError, Result};

/// Default token validity. The marketplace issues week-long sessions.
const DEFAULT_EXPIRY_DAYS: i64 = 7;

/// Claims carried by a Coinwork access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account email.
    pub sub: String,
    /// Role the account held when the token was issued.
    pub role: Role,
    /// Issuer.
    pub iss: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Unique id for this token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    /// Creates claims for an account, expiring after the default validity.
    #[must_use]
    pub fn new(email: impl Into<String>, role: Role, issuer: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            sub: email.into(),
            role,
            iss: issuer.into(),
            exp: (now + Duration::days(DEFAULT_EXPIRY_DAYS)).timestamp(),
            iat: now.timestamp(),
            jti: Some(uuid::Uuid::new_v4().to_string()),
        }
    }

    /// Sets the expiry to a duration from now.
    #[must_use]
    pub fn with_expiry_duration(mut self, duration: Duration) -> Self {
        self.exp = (Utc::now() + duration).timestamp();
        self
    }

    /// Checks if the token has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// The acting principal these claims decode to.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::new(self.sub.clone(), self.role)
    }
}

/// Configuration for HS256 token signing and validation.
#[derive(Clone)]
pub struct AuthConfig {
    secret: Vec<u8>,
    issuer: String,
}

impl AuthConfig {
    /// Creates a new configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is shorter than 32 bytes.
    pub fn new(secret: impl AsRef<[u8]>, issuer: impl Into<String>) -> Result<Self> {
        let secret = secret.as_ref();
        if secret.len() < 32 {
            return Err(AuthError::Jwt {
                reason: "secret must be at least 32 bytes for HS256".to_string(),
            });
        }
        Ok(Self {
            secret: secret.to_vec(),
            issuer: issuer.into(),
        })
    }

    /// Returns the issuer.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.secret)
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.secret)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);
        validation.validate_aud = false;
        validation
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("issuer", &self.issuer)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Issues and verifies Coinwork access tokens.
#[derive(Debug)]
pub struct TokenService {
    config: AuthConfig,
}

impl TokenService {
    /// Creates a new token service.
    #[must_use]
    pub const fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Issues a token for an account.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn issue(&self, email: &str, role: Role) -> Result<String> {
        let claims = Claims::new(email, role, &self.config.issuer);
        self.encode(&claims)
    }

    /// Issues a token from pre-built claims.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn issue_with_claims(&self, claims: &Claims) -> Result<String> {
        self.encode(claims)
    }

    /// Verifies a token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is invalid or expired.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.config.decoding_key(), &self.config.validation())
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidToken {
                    reason: e.to_string(),
                },
                _ => AuthError::Jwt {
                    reason: e.to_string(),
                },
            })?;
        Ok(data.claims)
    }

    /// Verifies a token and returns the acting identity directly.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is invalid or expired.
    pub fn verify_identity(&self, token: &str) -> Result<Identity> {
        Ok(self.verify(token)?.identity())
    }

    fn encode(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.config.encoding_key()).map_err(|e| {
            AuthError::Jwt {
                reason: e.to_string(),
            }
        })
    }
}

/// Extracts a bearer token from an HTTP Authorization header.
///
/// Expected format: `Bearer <token>`
///
/// # Errors
///
/// Returns an error if the header format is invalid.
pub fn extract_bearer(header: &str) -> Result<&str> {
    let header = header.trim();
    if header.is_empty() {
        return Err(AuthError::InvalidToken {
            reason: "authorization header is empty".to_string(),
        });
    }
    header.strip_prefix("Bearer ").map(str::trim).ok_or(AuthError::InvalidToken {
        reason: "invalid authorization header format, expected 'Bearer <token>'".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn service() -> TokenService {
        TokenService::new(AuthConfig::new([7u8; 32], "coinwork").ok().unwrap())
    }

    #[test]
    fn config_rejects_short_secret() {
        assert!(AuthConfig::new([0u8; 16], "coinwork").is_err());
    }

    #[test]
    fn config_debug_redacts_secret() {
        let config = AuthConfig::new([7u8; 32], "coinwork").ok().unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn issue_and_verify_roundtrip() {
        let service = service();
        let token = service.issue("w@x.com", Role::Worker).ok().unwrap();
        let claims = service.verify(&token).ok().unwrap();
        assert_eq!(claims.sub, "w@x.com");
        assert_eq!(claims.role, Role::Worker);
        assert!(!claims.is_expired());
    }

    #[test]
    fn verify_identity_decodes_principal() {
        let service = service();
        let token = service.issue("a@x.com", Role::Admin).ok().unwrap();
        let identity = service.verify_identity(&token).ok().unwrap();
        assert_eq!(identity.email, "a@x.com");
        assert!(identity.is_admin());
    }

    #[test]
    fn expired_token_is_rejected() {
        let service = service();
        let claims = Claims::new("w@x.com", Role::Worker, "coinwork")
            .with_expiry_duration(Duration::hours(-1));
        let token = service.issue_with_claims(&claims).ok().unwrap();
        let result = service.verify(&token);
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issuing = service();
        let verifying = TokenService::new(AuthConfig::new([9u8; 32], "coinwork").ok().unwrap());
        let token = issuing.issue("w@x.com", Role::Worker).ok().unwrap();
        assert!(verifying.verify(&token).is_err());
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let issuing = service();
        let verifying = TokenService::new(AuthConfig::new([7u8; 32], "other").ok().unwrap());
        let token = issuing.issue("w@x.com", Role::Worker).ok().unwrap();
        assert!(verifying.verify(&token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(service().verify("not.a.token").is_err());
    }

    #[test]
    fn extract_bearer_happy_path() {
        let token = extract_bearer("Bearer abc.def.ghi").ok().unwrap();
        assert_eq!(token, "abc.def.ghi");
    }

    #[test_case(""; "empty header")]
    #[test_case("abc.def.ghi"; "missing scheme")]
    #[test_case("Basic abc"; "wrong scheme")]
    fn extract_bearer_rejects(header: &str) {
        assert!(extract_bearer(header).is_err());
    }

    #[test]
    fn extract_bearer_trims_whitespace() {
        let token = extract_bearer("  Bearer   abc.def.ghi  ").ok().unwrap();
        assert_eq!(token, "abc.def.ghi");
    }
}
