use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::llm_client::{DEFAULT_API_BASE, DEFAULT_MODEL};

const API_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_API_KEY", "AI_GATEWAY_API_KEY"];

/// How the server treats model output whose arithmetic does not add up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScoreCheck {
    Off,
    #[default]
    Warn,
    Enforce,
}

impl FromStr for ScoreCheck {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(ScoreCheck::Off),
            "warn" => Ok(ScoreCheck::Warn),
            "enforce" => Ok(ScoreCheck::Enforce),
            other => bail!("unknown score check mode '{other}' (expected off, warn or enforce)"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if the model API key is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_api_base: String,
    pub gemini_model: String,
    pub llm_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub min_cv_chars: usize,
    pub score_check: ScoreCheck,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let gemini_api_key = API_KEY_VARS
            .iter()
            .find_map(|&key| get(key))
            .with_context(|| {
                format!(
                    "Required environment variable not set: one of {}",
                    API_KEY_VARS.join(", ")
                )
            })?;

        Ok(Config {
            gemini_api_key,
            gemini_api_base: get("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            llm_timeout_secs: parse_or(&get, "LLM_TIMEOUT_SECS", 120)?,
            max_upload_bytes: parse_or(&get, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            min_cv_chars: parse_or(&get, "MIN_CV_CHARS", 100)?,
            score_check: parse_or(&get, "SCORE_CHECK", ScoreCheck::default())?,
            port: parse_or(&get, "PORT", 8080)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::from_lookup(|key| (key == "GEMINI_API_KEY").then(|| "test-key".to_string()))
            .expect("test config")
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{key} has an invalid value '{raw}': {e}")),
        None => Ok(default),
    }
}
