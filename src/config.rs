//! Runtime settings read from the environment (and `.env`, if present).

use crate::domain::error::DomainError;
use crate::domain::values::response_format::ResponseFormat;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_LEDGER_PATH: &str = "processed_articles.txt";
pub const DEFAULT_KEYWORDS: [&str; 4] = ["stock market", "corporate earnings", "market trends", "finance"];
const DEFAULT_SMTP_PORT: u16 = 465;
const DEFAULT_PACING_SECS: u64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmtpTls {
    /// Implicit TLS, usually port 465.
    #[default]
    Tls,
    StartTls,
}

impl FromStr for SmtpTls {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tls" | "ssl" => Ok(SmtpTls::Tls),
            "starttls" => Ok(SmtpTls::StartTls),
            _ => Err(format!("Unknown SMTP_TLS mode: {s}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub tls: SmtpTls,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub news_api_key: String,
    pub gemini_api_key: String,
    pub gemini_model: Option<String>,
    /// Price enrichment is skipped when absent.
    pub alpha_vantage_api_key: Option<String>,
    pub smtp: SmtpSettings,
    pub recipients: Vec<String>,
    pub ledger_path: PathBuf,
    pub format: ResponseFormat,
    pub keywords: Vec<String>,
    pub pacing: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self, DomainError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup. Every missing
    /// required variable is reported in one error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut missing = Vec::new();
        let mut require = |key: &'static str| {
            get(key).unwrap_or_else(|| {
                missing.push(key);
                String::new()
            })
        };

        let news_api_key = require("NEWS_API_KEY");
        let gemini_api_key = require("GEMINI_API_KEY");
        let host = require("SMTP_HOST");
        let user = require("SMTP_USER");
        let password = require("EMAIL_PASSWORD");

        let recipients = split_list(get("RECIPIENT_EMAILS").as_deref().unwrap_or(""));
        if recipients.is_empty() {
            missing.push("RECIPIENT_EMAILS");
        }

        if !missing.is_empty() {
            return Err(DomainError::Config(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let keywords = match get("MARKETBRIEF_KEYWORDS") {
            Some(list) => split_list(&list),
            None => DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        };
        if keywords.is_empty() {
            return Err(DomainError::Config("MARKETBRIEF_KEYWORDS is empty".into()));
        }

        Ok(Self {
            news_api_key,
            gemini_api_key,
            gemini_model: get("GEMINI_MODEL"),
            alpha_vantage_api_key: get("ALPHA_VANTAGE_API_KEY"),
            smtp: SmtpSettings {
                host,
                port: parse_or("SMTP_PORT", get("SMTP_PORT"), DEFAULT_SMTP_PORT)?,
                user,
                password,
                tls: parse_or("SMTP_TLS", get("SMTP_TLS"), SmtpTls::default())?,
            },
            recipients,
            ledger_path: get("MARKETBRIEF_LEDGER")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LEDGER_PATH)),
            format: parse_or("MARKETBRIEF_FORMAT", get("MARKETBRIEF_FORMAT"), ResponseFormat::default())?,
            keywords,
            pacing: Duration::from_secs(parse_or(
                "MARKETBRIEF_PACING_SECS",
                get("MARKETBRIEF_PACING_SECS"),
                DEFAULT_PACING_SECS,
            )?),
        })
    }
}

/// Response format from the environment alone, for commands that need no
/// credentials.
pub fn response_format_from_env() -> Result<ResponseFormat, DomainError> {
    dotenvy::dotenv().ok();
    let value = std::env::var("MARKETBRIEF_FORMAT").ok().filter(|v| !v.trim().is_empty());
    parse_or("MARKETBRIEF_FORMAT", value, ResponseFormat::default())
}

/// Ledger path from the environment alone.
pub fn ledger_path_from_env() -> PathBuf {
    dotenvy::dotenv().ok();
    std::env::var("MARKETBRIEF_LEDGER")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LEDGER_PATH))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T, DomainError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|e| DomainError::Config(format!("Invalid {key} value {v:?}: {e}"))),
    }
}
