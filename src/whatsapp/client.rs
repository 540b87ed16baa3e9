use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};
use crate::whatsapp::dto::{
    PairingCodeRequest, PairingCodeResponse, SendMessageRequest, WhatsAppStatus,
};

/// Pairing and send may wait on slow upstream work; status is a cheap
/// poll and gets a tighter budget.
const PAIRING_TIMEOUT: Duration = Duration::from_secs(30);
const STATUS_TIMEOUT: Duration = Duration::from_secs(10);
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the external WhatsApp automation service. One attempt
/// per call, no retries: failures surface immediately to the caller.
#[derive(Clone)]
pub struct WhatsAppClient {
    http: reqwest::Client,
    base_url: String,
    pairing_timeout: Duration,
    status_timeout: Duration,
    send_timeout: Duration,
}

impl WhatsAppClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            pairing_timeout: PAIRING_TIMEOUT,
            status_timeout: STATUS_TIMEOUT,
            send_timeout: SEND_TIMEOUT,
        }
    }

    #[cfg(test)]
    fn with_timeout(base_url: String, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            pairing_timeout: timeout,
            status_timeout: timeout,
            send_timeout: timeout,
        }
    }

    pub async fn pairing_code(&self, request: &PairingCodeRequest) -> ApiResult<PairingCodeResponse> {
        let response = self
            .http
            .post(format!("{}/whatsapp/pair", self.base_url))
            .json(request)
            .timeout(self.pairing_timeout)
            .send()
            .await
            .map_err(transport_error)?;
        parse_response(response, "Erro ao gerar código").await
    }

    pub async fn status(&self) -> ApiResult<WhatsAppStatus> {
        let response = self
            .http
            .get(format!("{}/whatsapp/status", self.base_url))
            .timeout(self.status_timeout)
            .send()
            .await
            .map_err(transport_error)?;
        parse_response(response, "Erro ao obter status").await
    }

    /// Forward a message send. The upstream body is opaque and returned
    /// to the caller unmodified.
    pub async fn send(&self, request: &SendMessageRequest) -> ApiResult<serde_json::Value> {
        let response = self
            .http
            .post(format!("{}/whatsapp/send", self.base_url))
            .json(request)
            .timeout(self.send_timeout)
            .send()
            .await
            .map_err(transport_error)?;
        parse_response(response, "Erro ao enviar mensagem").await
    }
}

fn transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        warn!(error = %e, "whatsapp service timed out");
        ApiError::UpstreamTimeout
    } else {
        warn!(error = %e, "whatsapp service unreachable");
        ApiError::UpstreamUnavailable
    }
}

/// Success bodies parse into the operation's response type. Non-success
/// bodies get a best-effort `error` field extracted, falling back to the
/// operation's fixed message; the upstream status is kept verbatim.
async fn parse_response<T: DeserializeOwned>(
    response: reqwest::Response,
    default_message: &str,
) -> ApiResult<T> {
    let status = response.status();
    if status.is_success() {
        debug!(%status, "whatsapp service responded");
        return response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Internal(e.into()));
    }

    let message = response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| default_message.to_string());
    warn!(%status, %message, "whatsapp service returned error");
    Err(ApiError::Upstream { status, message })
}
