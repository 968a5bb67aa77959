use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
}

pub struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub fn sign(&self, subject: &str, expires_at: DateTime<Utc>) -> jsonwebtoken::errors::Result<String> {
        let claims = Claims {
            sub: subject.to_string(),
            exp: expires_at.timestamp().max(0) as u64,
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// The claims of a well-formed, correctly signed and unexpired token.
    pub fn claims(&self, token: &str) -> Option<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_read_back() {
        let keys = Keys::new(b"secret");
        let token = keys
            .sign("subject", Utc::now() + chrono::Duration::hours(1))
            .unwrap();
        assert_eq!(keys.claims(&token).unwrap().sub, "subject");
        assert!(Keys::new(b"other").claims(&token).is_none());
        assert!(keys.claims("not.a.token").is_none());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let keys = Keys::new(b"secret");
        let token = keys
            .sign("subject", Utc::now() - chrono::Duration::hours(1))
            .unwrap();
        assert!(keys.claims(&token).is_none());
    }
}
