//! Application configuration. Service origin, output directory, timeouts.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Analysis service origin used when nothing is configured.
pub const DEFAULT_API_URL: &str = "http://resume-analyzer-backend.onrender.com";

/// Default per-request timeout. The hosted backend can cold-start slowly.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Base URL for every route (analyze, analyze-pdf, download-report). Read from RESUME_ANALYZER_API_URL.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Directory where downloaded reports are written. Read from RESUME_ANALYZER_OUTPUT_DIR.
    #[serde(default)]
    pub output_dir: Option<String>,

    /// Per-request timeout in seconds. Read from RESUME_ANALYZER_REQUEST_TIMEOUT_SECS.
    /// Malformed values read as unset.
    #[serde(default, deserialize_with = "loose_timeout")]
    pub request_timeout_secs: Option<u64>,

    /// Use canned results instead of the network (development). Read from RESUME_ANALYZER_USE_MOCK.
    /// Malformed values read as unset.
    #[serde(default, deserialize_with = "loose_flag")]
    pub use_mock: Option<bool>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        Self::from_env(None)
    }

    /// Builds from the optional config file plus `RESUME_ANALYZER_*` variables.
    /// `env` replaces the process environment when given.
    fn from_env(env: Option<config::Map<String, String>>) -> Result<Self, config::ConfigError> {
        let mut c = config::Config::builder();
        if let Ok(path) = std::env::var("RESUME_ANALYZER_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c = c.add_source(
            config::Environment::with_prefix("RESUME_ANALYZER")
                .try_parsing(true)
                .source(env),
        );
        c.build()?.try_deserialize()
    }

    /// Returns the service origin without a trailing slash. Defaults to DEFAULT_API_URL.
    pub fn api_url_or_default(&self) -> String {
        self.api_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string()
    }

    /// Returns the report output directory. Defaults to the current directory.
    pub fn output_dir_or_default(&self) -> String {
        self.output_dir.clone().unwrap_or_else(|| ".".to_string())
    }

    /// Returns the request timeout in seconds. Defaults to 120; zero is treated as unset.
    pub fn request_timeout_secs_or_default(&self) -> u64 {
        self.request_timeout_secs
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    /// Returns true if the mock analysis adapter should be used.
    pub fn is_mock(&self) -> bool {
        self.use_mock.unwrap_or(false)
    }
}

/// Raw scalar as produced by the env source with `try_parsing`.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseScalar {
    Bool(bool),
    Int(i64),
    Text(String),
    Other(IgnoredAny),
}

fn loose_timeout<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    Ok(match LooseScalar::deserialize(d)? {
        LooseScalar::Int(n) => u64::try_from(n).ok(),
        LooseScalar::Text(s) => s.trim().parse::<u64>().ok(),
        LooseScalar::Bool(_) | LooseScalar::Other(_) => None,
    })
}

fn loose_flag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(match LooseScalar::deserialize(d)? {
        LooseScalar::Bool(b) => Some(b),
        LooseScalar::Int(0) => Some(false),
        LooseScalar::Int(1) => Some(true),
        LooseScalar::Text(s) => parse_flag(&s),
        LooseScalar::Int(_) | LooseScalar::Other(_) => None,
    })
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
