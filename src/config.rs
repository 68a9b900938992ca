use std::env;
use std::fmt;
use std::str::FromStr;

use crate::models::Modality;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_JSON_LIMIT_BYTES: usize = 50 * 1024 * 1024;

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "https://ai-clothes-swap.web.app",
    "https://ai-clothes-swap.firebaseapp.com",
    "https://backend-ai-server--ai-clothes-swap.us-central1.hosted.app/",
];

/// Which transport the bridge uses to reach the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportKind {
    #[default]
    Direct,
    Relay,
    Callable,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Direct => "direct",
            TransportKind::Relay => "relay",
            TransportKind::Callable => "callable",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" | "gemini" => Ok(TransportKind::Direct),
            "relay" | "http" => Ok(TransportKind::Relay),
            "callable" | "function" => Ok(TransportKind::Callable),
            other => Err(format!("unknown transport '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub response_modalities: Vec<Modality>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            response_modalities: vec![Modality::Image, Modality::Text],
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = non_empty_var("GEMINI_API_KEY").or_else(|| non_empty_var("API_KEY"));
        let model = non_empty_var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into());
        let base_url =
            non_empty_var("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.into());
        let response_modalities = non_empty_var("GEMINI_RESPONSE_MODALITIES")
            .map(|raw| parse_modalities(&raw))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| vec![Modality::Image, Modality::Text]);

        GeminiConfig {
            api_key,
            model,
            base_url,
            response_modalities,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_response_modalities(mut self, modalities: Vec<Modality>) -> Self {
        self.response_modalities = modalities;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct RelayConfig {
    pub base_url: Option<String>,
}

impl RelayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        RelayConfig {
            base_url: non_empty_var("RELAY_URL"),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct CallableConfig {
    pub url: Option<String>,
    pub id_token: Option<String>,
}

impl CallableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        CallableConfig {
            url: non_empty_var("CALLABLE_URL"),
            id_token: non_empty_var("CALLABLE_ID_TOKEN"),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_id_token(mut self, token: impl Into<String>) -> Self {
        self.id_token = Some(token.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub allowed_origins: Vec<String>,
    pub json_limit_bytes: usize,
    pub transport: TransportKind,
    pub gemini: GeminiConfig,
    pub relay: RelayConfig,
    pub callable: CallableConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: None,
            host: None,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect(),
            json_limit_bytes: DEFAULT_JSON_LIMIT_BYTES,
            transport: TransportKind::Direct,
            gemini: GeminiConfig::default(),
            relay: RelayConfig::default(),
            callable: CallableConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let port = env::var("PORT").ok().and_then(|port| port.parse().ok());
        let host = non_empty_var("HOST");
        let allowed_origins = non_empty_var("ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect());
        let transport = match non_empty_var("SWAP_TRANSPORT") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                log::warn!("Ignoring SWAP_TRANSPORT: {}", e);
                TransportKind::Direct
            }),
            None => TransportKind::Direct,
        };

        Config {
            port,
            host,
            allowed_origins,
            json_limit_bytes: DEFAULT_JSON_LIMIT_BYTES,
            transport,
            gemini: GeminiConfig::from_env(),
            relay: RelayConfig::from_env(),
            callable: CallableConfig::from_env(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_allowed_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_transport(mut self, transport: TransportKind) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_relay(mut self, config: RelayConfig) -> Self {
        self.relay = config;
        self
    }

    pub fn with_callable(mut self, config: CallableConfig) -> Self {
        self.callable = config;
        self
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_modalities(raw: &str) -> Vec<Modality> {
    raw.split(',')
        .filter_map(|s| match s.trim().to_ascii_uppercase().as_str() {
            "IMAGE" => Some(Modality::Image),
            "TEXT" => Some(Modality::Text),
            _ => None,
        })
        .collect()
}
