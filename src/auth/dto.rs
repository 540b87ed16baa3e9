use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: PublicUser,
}

impl TokenResponse {
    pub fn bearer(access_token: String, user: PublicUser) -> Self {
        Self {
            access_token,
            token_type: "bearer",
            user,
        }
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

/// Response for `GET /auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_regex_accepts_and_rejects() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("user.name+tag@sub.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("two@@x.com"));
        assert!(!is_valid_email("spaces in@x.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn token_response_shape() {
        let response = TokenResponse::bearer(
            "tok".into(),
            PublicUser {
                id: Uuid::new_v4(),
                email: "a@x.com".into(),
                name: None,
            },
        );
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["token_type"], "bearer");
        assert_eq!(json["access_token"], "tok");
        assert_eq!(json["user"]["email"], "a@x.com");
        assert!(json["user"]["name"].is_null());
    }

    #[test]
    fn me_response_uses_rfc3339_timestamps() {
        let response = MeResponse {
            id: Uuid::new_v4(),
            email: "a@x.com".into(),
            name: Some("Ana".into()),
            created_at: time::macros::datetime!(2024-05-01 12:00:00 UTC),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["created_at"], "2024-05-01T12:00:00Z");
    }
}
