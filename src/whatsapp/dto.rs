use serde::{Deserialize, Serialize};

/// Request a pairing code for linking a phone number.
#[derive(Debug, Serialize, Deserialize)]
pub struct PairingCodeRequest {
    pub phone: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PairingCodeResponse {
    pub code: String,
    pub message: String,
    #[serde(rename = "expiresIn")]
    pub expires_in: u64,
}

/// Connection state as reported by the automation service. Field names
/// follow its wire format.
#[derive(Debug, Serialize, Deserialize)]
pub struct WhatsAppStatus {
    pub connected: bool,
    pub timestamp: String,
    #[serde(rename = "reconnectAttempts")]
    pub reconnect_attempts: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub number: String,
    pub message: String,
}
