use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtService {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours.max(1)),
        }
    }

    /// Issue an HS256 token for the given user
    pub fn issue(&self, user_id: &str, email: &str) -> anyhow::Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("jwt encode error: {e}"))?;
        Ok(token)
    }

    /// Verify a token and return the decoded claims
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| anyhow::anyhow!("jwt verify error: {e}"))?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_service() -> JwtService {
        JwtService::new("test-secret-solace", 24)
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let svc = make_service();
        let token = svc.issue("user-1", "user@example.com").unwrap();
        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_expired_token_fails() {
        let svc = make_service();
        let past = Utc::now().timestamp() - 7200;
        let claims = Claims {
            sub: "user-2".into(),
            email: "expired@example.com".into(),
            iat: past - 86_400,
            exp: past,
        };
        let token = encode(&Header::default(), &claims, &svc.encoding_key).unwrap();
        assert!(svc.verify(&token).is_err(), "expired token must be rejected");
    }

    #[test]
    fn test_invalid_signature_fails() {
        let token = make_service().issue("user-3", "u3@example.com").unwrap();
        let other = JwtService::new("different-secret", 24);
        assert!(other.verify(&token).is_err(), "wrong-secret verification must fail");
    }

    #[test]
    fn test_garbage_token_fails() {
        assert!(make_service().verify("not-a-jwt").is_err());
    }
}
