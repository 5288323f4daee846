use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tokens are valid for one hour; there is no refresh flow.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

/// Registered claims owned by the issuer; clients cannot supply them.
const RESERVED_CLAIMS: &[&str] = &["exp", "iat", "nbf"];

/// Identity payload posted to `/jwt`. Anything besides `email` rides along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Identity {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub identity: Identity,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("identity must include an email")]
    MissingEmail,

    #[error("token expired")]
    Expired,

    #[error("signature mismatch")]
    InvalidSignature,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token generation failed: {0}")]
    Generation(String),
}

/// Signs and verifies bearer tokens with a shared HS256 secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::seconds(TOKEN_TTL_SECS))
    }

    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, mut identity: Identity) -> Result<String, TokenError> {
        if identity.email.trim().is_empty() {
            return Err(TokenError::MissingEmail);
        }
        for claim in RESERVED_CLAIMS {
            identity.extra.remove(*claim);
        }

        let now = Utc::now();
        let claims = Claims {
            identity,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("unit-test-secret")
    }

    #[test]
    fn verify_returns_issued_identity() {
        let mut identity = Identity::new("guest@bistro.test");
        identity.extra.insert("name".into(), json!("Guest"));

        let token = issuer().issue(identity.clone()).unwrap();
        let claims = issuer().verify(&token).unwrap();

        assert_eq!(claims.identity, identity);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let stale = TokenIssuer::with_ttl("unit-test-secret", Duration::seconds(-5));
        let token = stale.issue(Identity::new("guest@bistro.test")).unwrap();

        assert!(matches!(issuer().verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn foreign_secret_is_rejected() {
        let other = TokenIssuer::new("someone-else");
        let token = other.issue(Identity::new("guest@bistro.test")).unwrap();

        assert!(matches!(issuer().verify(&token), Err(TokenError::InvalidSignature)));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(issuer().verify("not.a.jwt"), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn client_cannot_extend_expiry() {
        let mut identity = Identity::new("guest@bistro.test");
        identity.extra.insert("exp".into(), json!(i64::MAX));
        identity.extra.insert("iat".into(), json!(0));

        let token = issuer().issue(identity).unwrap();
        let claims = issuer().verify(&token).unwrap();

        assert!(claims.exp <= Utc::now().timestamp() + TOKEN_TTL_SECS);
        assert!(claims.identity.extra.is_empty());
    }

    #[test]
    fn empty_email_is_refused() {
        assert!(matches!(issuer().issue(Identity::new("  ")), Err(TokenError::MissingEmail)));
    }
}
