use std::collections::HashMap;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::identity::AuthenticatedUser;
use crate::ledger::UserId;

const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub ledger: LedgerConfig,
    pub identity: IdentityConfig,
    pub assistant: AssistantConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "4000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let ansi = match non_empty_var("APP_LOG_ANSI") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag {
                name: "APP_LOG_ANSI",
                value: raw,
            })?,
            None => false,
        };

        let data_dir = non_empty_var("LEDGER_DATA_DIR").map(PathBuf::from);

        let user_url = non_empty_var("IDENTITY_USER_URL");
        let dev_tokens = match non_empty_var("IDENTITY_DEV_TOKENS") {
            Some(raw) => parse_dev_tokens(&raw)?,
            None => HashMap::new(),
        };

        let api_key = non_empty_var("GEMINI_API_KEY").or_else(|| non_empty_var("API_KEY"));
        let model =
            non_empty_var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let base_url = non_empty_var("GEMINI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, ansi },
            ledger: LedgerConfig { data_dir },
            identity: IdentityConfig {
                user_url,
                dev_tokens,
            },
            assistant: AssistantConfig {
                api_key,
                model,
                base_url,
            },
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parses `token=user_id:email` pairs separated by commas.
fn parse_dev_tokens(raw: &str) -> Result<HashMap<String, AuthenticatedUser>, ConfigError> {
    let mut tokens = HashMap::new();
    for entry in raw.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let invalid = || ConfigError::InvalidDevToken {
            entry: entry.to_string(),
        };
        let (token, identity) = entry.split_once('=').ok_or_else(invalid)?;
        let (user_id, email) = identity.split_once(':').unwrap_or((identity, ""));
        let token = token.trim();
        let user_id = user_id.trim();
        if token.is_empty() || user_id.is_empty() {
            return Err(invalid());
        }
        tokens.insert(
            token.to_string(),
            AuthenticatedUser {
                user_id: UserId(user_id.to_string()),
                email: email.trim().to_string(),
            },
        );
    }
    Ok(tokens)
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Where transactions are persisted. `None` keeps them in process memory.
#[derive(Debug, Clone, Default)]
pub struct LedgerConfig {
    pub data_dir: Option<PathBuf>,
}

/// Bearer token resolution. A hosted user endpoint takes precedence over the
/// static development table.
#[derive(Debug, Clone, Default)]
pub struct IdentityConfig {
    pub user_url: Option<String>,
    pub dev_tokens: HashMap<String, AuthenticatedUser>,
}

/// Gemini text generation settings.
#[derive(Clone)]
pub struct AssistantConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidFlag { name: &'static str, value: String },
    InvalidDevToken { entry: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be a boolean flag, found '{value}'")
            }
            ConfigError::InvalidDevToken { entry } => write!(
                f,
                "IDENTITY_DEV_TOKENS entry '{entry}' must look like token=user_id:email"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidFlag { .. }
            | ConfigError::InvalidDevToken { .. } => None,
        }
    }
}
