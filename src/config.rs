use serde::Deserialize;

const DEV_JWT_SECRET: &str = "your-secret-key-change-in-production";
const DEV_WHATSAPP_SERVICE_URL: &str = "http://localhost:3001";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// Shared HS256 signing secret. Rotating it invalidates every
    /// outstanding token.
    pub jwt_secret: String,
    /// Base URL of the external WhatsApp automation service.
    pub whatsapp_service_url: String,
    /// Allowed CORS origins; `["*"]` means permissive.
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using insecure development default");
            DEV_JWT_SECRET.into()
        });

        let whatsapp_service_url = std::env::var("WHATSAPP_SERVICE_URL")
            .unwrap_or_else(|_| DEV_WHATSAPP_SERVICE_URL.into());

        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            database_url,
            jwt_secret,
            whatsapp_service_url,
            cors_origins,
        })
    }
}
