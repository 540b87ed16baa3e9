use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::state::AppState;

/// Session lifetime. Fixed at issuance, not configurable per call.
const TOKEN_TTL_HOURS: i64 = 24;

/// Claims carried by a session token. Validity is purely signature plus
/// expiry; nothing is stored server-side, so a token cannot be revoked
/// before `exp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: usize,
}

/// JWT signing and verification keys, derived once from the configured
/// secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::new(&state.config.jwt_secret)
    }
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn sign(&self, user_id: Uuid, email: &str) -> anyhow::Result<String> {
        let exp = OffsetDateTime::now_utc() + Duration::hours(TOKEN_TTL_HOURS);
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    /// Verify signature and expiry. Any failure is opaque: callers get an
    /// error, never partial claims.
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        JwtKeys::new("dev-secret")
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = make_keys();
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id, "a@x.com").expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "a@x.com");
    }

    #[test]
    fn expiry_is_24_hours_out() {
        let keys = make_keys();
        let before = OffsetDateTime::now_utc() + Duration::hours(TOKEN_TTL_HOURS);
        let token = keys.sign(Uuid::new_v4(), "a@x.com").expect("sign");
        let after = OffsetDateTime::now_utc() + Duration::hours(TOKEN_TTL_HOURS);
        let claims = keys.verify(&token).expect("verify");
        assert!(claims.exp >= before.unix_timestamp() as usize);
        assert!(claims.exp <= after.unix_timestamp() as usize);
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = make_keys();
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "a@x.com".into(),
            exp: (OffsetDateTime::now_utc() - Duration::hours(1)).unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = JwtKeys::new("secret-a")
            .sign(Uuid::new_v4(), "a@x.com")
            .expect("sign");
        assert!(JwtKeys::new("secret-b").verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_garbage() {
        let keys = make_keys();
        assert!(keys.verify("not-a-token").is_err());
        assert!(keys.verify("").is_err());
    }

    #[test]
    fn verify_rejects_tampered_payload() {
        let keys = make_keys();
        let token = keys.sign(Uuid::new_v4(), "a@x.com").expect("sign");
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        parts[1] = parts[1].chars().rev().collect();
        assert!(keys.verify(&parts.join(".")).is_err());
    }
}
