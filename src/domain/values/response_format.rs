use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format requested from the model. Selects both the prompt
/// instructions and the parser strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseFormat {
    #[default]
    FreeText,
    Json,
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseFormat::FreeText => write!(f, "free-text"),
            ResponseFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for ResponseFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free-text" | "freetext" | "text" | "markdown" => Ok(ResponseFormat::FreeText),
            "json" | "structured" => Ok(ResponseFormat::Json),
            _ => Err(format!("Unknown response format: {s}")),
        }
    }
}
