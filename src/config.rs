use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "RX Manager";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "info,rxmanager_lib=debug"
    } else {
        "info"
    }
}

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_STORES_PATH: &str = "data/stores.json";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_VISION_BASE_URL: &str = "https://vision.googleapis.com";
const DEFAULT_OPENFDA_BASE_URL: &str = "https://api.fda.gov/drug";
const DEFAULT_REGISTRY_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;
const DEFAULT_OCR_TIMEOUT_SECS: u64 = 30;
const DEFAULT_OCR_LANGUAGES: &str = "eng";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddress { var: &'static str, value: String },

    #[error("{var} must be a positive integer, got: {value}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Runtime configuration, resolved once at startup.
///
/// Every outbound service receives the slice it needs at construction time;
/// nothing reads the environment after `from_env()` returns.
#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub stores_path: PathBuf,
    pub cors_origins: Vec<String>,
    pub max_upload_bytes: usize,
    /// Shared credential for Gemini and Cloud Vision. Never logged.
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub vision_base_url: String,
    pub openfda_base_url: String,
    pub registry_timeout: Duration,
    pub llm_timeout: Duration,
    pub ocr_timeout: Duration,
    pub tessdata_dir: Option<PathBuf>,
    /// Tesseract language codes, e.g. `eng+hin`.
    pub ocr_languages: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("stores_path", &self.stores_path)
            .field("cors_origins", &self.cors_origins)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field(
                "google_api_key",
                &self.google_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("vision_base_url", &self.vision_base_url)
            .field("openfda_base_url", &self.openfda_base_url)
            .field("registry_timeout", &self.registry_timeout)
            .field("llm_timeout", &self.llm_timeout)
            .field("ocr_timeout", &self.ocr_timeout)
            .field("tessdata_dir", &self.tessdata_dir)
            .field("ocr_languages", &self.ocr_languages)
            .finish()
    }
}

impl AppConfig {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary key lookup.
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_raw = get("RXMANAGER_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidAddress {
                var: "RXMANAGER_BIND_ADDR",
                value: bind_raw.clone(),
            })?;

        let cors_origins = get("RXMANAGER_CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.into())
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        let number = |var: &'static str, default: u64| -> Result<u64, ConfigError> {
            match get(var) {
                None => Ok(default),
                Some(value) => value
                    .parse::<u64>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or(ConfigError::InvalidNumber { var, value }),
            }
        };

        let max_upload_bytes =
            number("RXMANAGER_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES as u64)? as usize;

        Ok(Self {
            bind_addr,
            stores_path: PathBuf::from(
                get("RXMANAGER_STORES_PATH").unwrap_or_else(|| DEFAULT_STORES_PATH.into()),
            ),
            cors_origins,
            max_upload_bytes,
            google_api_key: get("GOOGLE_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into()),
            gemini_base_url: get("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.into()),
            vision_base_url: get("VISION_BASE_URL")
                .unwrap_or_else(|| DEFAULT_VISION_BASE_URL.into()),
            openfda_base_url: get("OPENFDA_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENFDA_BASE_URL.into()),
            registry_timeout: Duration::from_secs(number(
                "RXMANAGER_REGISTRY_TIMEOUT_SECS",
                DEFAULT_REGISTRY_TIMEOUT_SECS,
            )?),
            llm_timeout: Duration::from_secs(number(
                "RXMANAGER_LLM_TIMEOUT_SECS",
                DEFAULT_LLM_TIMEOUT_SECS,
            )?),
            ocr_timeout: Duration::from_secs(number(
                "RXMANAGER_OCR_TIMEOUT_SECS",
                DEFAULT_OCR_TIMEOUT_SECS,
            )?),
            tessdata_dir: get("TESSDATA_PREFIX").map(PathBuf::from),
            ocr_languages: get("RXMANAGER_OCR_LANGUAGES")
                .unwrap_or_else(|| DEFAULT_OCR_LANGUAGES.into()),
        })
    }
}
