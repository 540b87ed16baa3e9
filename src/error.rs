use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Every way a request can fail. Each variant maps to exactly one HTTP
/// status; the boundary (`IntoResponse`) owns that mapping, handlers only
/// return the variant.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input shape (bad email format, missing field).
    #[error("{0}")]
    Validation(String),

    /// Registration with an email that already has an account.
    #[error("Email já cadastrado")]
    EmailTaken,

    /// Unknown email or wrong password. Deliberately one variant for both
    /// so login failures do not reveal whether the email exists.
    #[error("Email ou senha inválidos")]
    InvalidCredentials,

    /// Login on a deactivated account. Only reachable after the password
    /// verified, so the distinction leaks nothing to guessers.
    #[error("Usuário inativo")]
    AccountInactive,

    /// Missing, malformed, expired, or otherwise unusable bearer token.
    #[error("Could not validate credentials")]
    Unauthenticated,

    /// The automation service answered with a non-success status; its
    /// status and message are propagated verbatim.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    /// The automation service did not answer within the call budget.
    #[error("Timeout ao conectar com serviço WhatsApp")]
    UpstreamTimeout,

    /// The automation service could not be reached at all.
    #[error("Serviço WhatsApp indisponível")]
    UpstreamUnavailable,

    /// Anything unexpected. The cause is logged server-side; the client
    /// only ever sees a generic message.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::EmailTaken => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::AccountInactive => StatusCode::FORBIDDEN,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Upstream { status, .. } => *status,
            ApiError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let mut response = (status, Json(json!({ "detail": detail }))).into_response();
        if matches!(self, ApiError::Unauthenticated) {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            ApiError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::EmailTaken.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::InvalidCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::AccountInactive.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::UpstreamTimeout.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            ApiError::UpstreamUnavailable.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn upstream_error_propagates_status_and_message() {
        let err = ApiError::Upstream {
            status: StatusCode::BAD_REQUEST,
            message: "bad phone".into(),
        };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "bad phone");
    }

    #[test]
    fn unauthenticated_response_carries_challenge_header() {
        let response = ApiError::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn internal_error_hides_the_cause() {
        let err = ApiError::Internal(anyhow::anyhow!("secret connection string"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
