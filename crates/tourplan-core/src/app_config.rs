#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Base URL of the safety API that stores itineraries.
    pub safety_api_url: String,
    /// Optional bearer token forwarded to the safety API.
    pub safety_api_token: Option<String>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// How long a successful save stays visible before it is reset.
    pub saved_flash_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("safety_api_url", &self.safety_api_url)
            .field(
                "safety_api_token",
                &self.safety_api_token.as_ref().map(|_| "[redacted]"),
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("saved_flash_ms", &self.saved_flash_ms)
            .finish()
    }
}
