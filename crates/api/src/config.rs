//! Application configuration loaded from environment variables.

/// Host configuration with development defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `DELIVERY_INTAKE_URL` — delivery intake endpoint
/// - `ESCALATION_URL` — escalation endpoint
/// - `RESERVATIONS_CHANNEL` — broker channel for warehouse events
/// - `PICTURE_BASE_URL` — base URL for composed picture URIs
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub delivery_intake_url: String,
    pub escalation_url: String,
    pub reservations_channel: String,
    pub picture_base_url: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            delivery_intake_url: std::env::var("DELIVERY_INTAKE_URL")
                .unwrap_or_else(|_| "http://localhost:7071/delivery".to_string()),
            escalation_url: std::env::var("ESCALATION_URL")
                .unwrap_or_else(|_| "http://localhost:7071/escalation".to_string()),
            reservations_channel: std::env::var("RESERVATIONS_CHANNEL")
                .unwrap_or_else(|_| fulfillment::RESERVATIONS_CHANNEL.to_string()),
            picture_base_url: std::env::var("PICTURE_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/pics".to_string()),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            delivery_intake_url: "http://localhost:7071/delivery".to_string(),
            escalation_url: "http://localhost:7071/escalation".to_string(),
            reservations_channel: fulfillment::RESERVATIONS_CHANNEL.to_string(),
            picture_base_url: "http://localhost:3000/pics".to_string(),
        }
    }
}
