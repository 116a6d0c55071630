//! Ticker sentinel detection.
//!
//! The model writes placeholders such as "Private Company" or "N/A" where no
//! listed symbol exists. Those values are kept as data; this module only
//! decides whether a price lookup makes sense for them.

const UNLISTED_KEYWORDS: [&str; 3] = ["n/a", "not provided", "private"];

/// True when the ticker is absent, blank, or a private/unknown placeholder.
pub fn is_unlisted(ticker: Option<&str>) -> bool {
    match ticker.map(str::trim) {
        None | Some("") => true,
        Some(t) => {
            let lower = t.to_lowercase();
            UNLISTED_KEYWORDS.iter().any(|k| lower.contains(k))
        }
    }
}

/// Normalise a raw ticker field: trimmed, and `None` when empty.
pub fn normalize(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|t| !t.is_empty()).map(String::from)
}
