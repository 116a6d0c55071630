//! Parser for sectioned, markdown-flavoured model output.
//!
//! The response is walked line by line through a two-state machine. Lines
//! before the first section header form the overview block; after a header
//! every line belongs to that section until the next header. Inside a
//! section only lines shaped like
//!
//! ```text
//! * **Company Name (TICKER):** one-sentence justification
//! 1. **Company Name (TICKER):** one-sentence justification
//! ```
//!
//! produce an [`Opportunity`]; anything else is skipped. The parser never
//! fails: input it cannot make sense of yields [`MarketReport::parse_failure`].

use crate::domain::entities::report::{Horizon, MarketReport, Opportunity, ReportSection};
use crate::domain::error::DomainError;
use crate::domain::ports::report_parser::ReportParser;
use crate::domain::values::response_format::ResponseFormat;
use crate::domain::values::sentiment::Sentiment;
use crate::domain::values::ticker;
use tracing::{debug, warn};

const SENTIMENT_LABEL: &str = "market sentiment:";
const OVERVIEW_LABEL: &str = "overall market overview";
const SHORT_TERM_HEADERS: [&str; 2] = ["short-term opportunities", "short term opportunities"];
const LONG_TERM_HEADERS: [&str; 2] = ["long-term potential", "long term potential"];

pub struct FreeTextParser;

impl ReportParser for FreeTextParser {
    fn format(&self) -> ResponseFormat {
        ResponseFormat::FreeText
    }

    fn parse(&self, raw: &str) -> Result<MarketReport, DomainError> {
        match parse_sections(raw) {
            Ok(report) => Ok(report),
            Err(reason) => {
                warn!(%reason, raw, "Could not parse model response, using placeholder report");
                Ok(MarketReport::parse_failure())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Overview,
    Section(Horizon),
}

#[derive(Default)]
struct Accumulator {
    overview: Vec<String>,
    sentiment: Option<Sentiment>,
    short_term: Vec<Opportunity>,
    long_term: Vec<Opportunity>,
}

impl Accumulator {
    fn push_overview_line(&mut self, line: &str) {
        let line = strip_overview_label(line);
        let (sentiment, rest) = take_sentiment(line);
        let text = match sentiment {
            Some(found) => {
                if self.sentiment.is_none() {
                    self.sentiment = Some(found);
                }
                rest.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '.' | ',' | ';' | ':' | '-'))
                    .to_string()
            }
            None => rest,
        };
        let text = text.replace("**", "");
        let text = text.trim();
        if !is_markup_only(text) {
            self.overview.push(text.to_string());
        }
    }

    fn push_opportunity(&mut self, horizon: Horizon, opportunity: Opportunity) {
        match horizon {
            Horizon::LongTerm => self.long_term.push(opportunity),
            _ => self.short_term.push(opportunity),
        }
    }

    fn into_report(self) -> MarketReport {
        MarketReport::new(
            self.overview.join("\n"),
            self.sentiment.unwrap_or_default(),
            vec![
                ReportSection::new(Horizon::ShortTerm, self.short_term),
                ReportSection::new(Horizon::LongTerm, self.long_term),
            ],
        )
    }
}

fn parse_sections(raw: &str) -> Result<MarketReport, String> {
    if looks_like_json(raw) {
        return Err("response is a JSON document, expected sectioned text".into());
    }

    let mut state = State::Overview;
    let mut acc = Accumulator::default();

    for line in raw.lines() {
        if let Some(horizon) = section_header(line) {
            state = State::Section(horizon);
            continue;
        }
        match state {
            State::Overview => acc.push_overview_line(line),
            State::Section(horizon) => match parse_opportunity_line(line) {
                Some(opportunity) => acc.push_opportunity(horizon, opportunity),
                None if !line.trim().is_empty() => debug!(line, "Skipping non-opportunity line"),
                None => {}
            },
        }
    }

    Ok(acc.into_report())
}

fn looks_like_json(raw: &str) -> bool {
    let trimmed = raw.trim_start();
    trimmed.starts_with('{') || trimmed.to_ascii_lowercase().starts_with("```json")
}

/// Strip heading decoration: whitespace, `#`, bold/italic markers, ordinals.
fn strip_heading_markup(line: &str) -> &str {
    line.trim_start_matches(|c: char| {
        c.is_whitespace() || c.is_ascii_digit() || matches!(c, '#' | '*' | '_' | '.' | ')')
    })
}

fn section_header(line: &str) -> Option<Horizon> {
    let lower = strip_heading_markup(line).to_ascii_lowercase();
    let matches = |headers: &[&str]| {
        headers.iter().any(|h| {
            lower.strip_prefix(h).is_some_and(|tail| {
                let tail = tail.trim_start();
                // "Short-Term Opportunities Fund (SOF)" is a company, not a header.
                tail.is_empty() || tail.starts_with(['(', ':', '*', '_', '-'])
            })
        })
    };
    if matches(&SHORT_TERM_HEADERS) {
        Some(Horizon::ShortTerm)
    } else if matches(&LONG_TERM_HEADERS) {
        Some(Horizon::LongTerm)
    } else {
        None
    }
}

fn strip_overview_label(line: &str) -> &str {
    let stripped = strip_heading_markup(line);
    if stripped.to_ascii_lowercase().starts_with(OVERVIEW_LABEL) {
        stripped[OVERVIEW_LABEL.len()..]
            .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '*' | '_'))
    } else {
        line
    }
}

/// Pull the token after "Market Sentiment:" out of a line, returning the
/// line with the label and token removed.
fn take_sentiment(line: &str) -> (Option<Sentiment>, String) {
    // ASCII lowercasing keeps byte offsets aligned with `line`.
    let lower = line.to_ascii_lowercase();
    let Some(pos) = lower.find(SENTIMENT_LABEL) else {
        return (None, line.to_string());
    };

    let start = line[..pos].trim_end_matches(['*', '_']).len();
    let after = line[pos + SENTIMENT_LABEL.len()..]
        .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '*' | '_'));
    let token_len = after.find(|c: char| !c.is_alphabetic()).unwrap_or(after.len());
    let token = &after[..token_len];
    let tail = after[token_len..].trim_start_matches(['*', '_']);

    let sentiment = Sentiment::parse_lenient(token);
    (Some(sentiment), format!("{}{}", &line[..start], tail))
}

fn is_markup_only(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_whitespace() || matches!(c, '*' | '#' | '-' | '_' | '=' | '>'))
}

/// Remove a leading bullet (`*`, `-`, `+`, `•` followed by a space) or
/// ordinal (`1.`, `2)`). Lines without a marker are not records.
fn strip_list_marker(line: &str) -> Option<&str> {
    let line = line.trim_start();
    let first = line.chars().next()?;
    if matches!(first, '*' | '-' | '+' | '•') {
        let rest = &line[first.len_utf8()..];
        return rest.starts_with(char::is_whitespace).then_some(rest);
    }
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == line.len() {
        return None;
    }
    rest.strip_prefix('.').or_else(|| rest.strip_prefix(')'))
}

fn parse_opportunity_line(line: &str) -> Option<Opportunity> {
    let rest = strip_list_marker(line)?.trim_start();
    if !rest.starts_with("**") {
        return None;
    }
    let plain = rest.replace("**", "");
    let (name, raw_ticker, justification) = split_company(&plain)?;
    if name.is_empty() || justification.is_empty() {
        return None;
    }
    Some(Opportunity::new(
        name,
        ticker::normalize(Some(raw_ticker)),
        justification,
    ))
}

/// Split `Name (TICKER): justification` on the first `)` that is followed
/// by a colon, so names containing their own parentheses survive.
fn split_company(plain: &str) -> Option<(&str, &str, &str)> {
    for (i, c) in plain.char_indices() {
        if c != ')' {
            continue;
        }
        let Some(justification) = plain[i + 1..].trim_start().strip_prefix(':') else {
            continue;
        };
        let Some(open) = plain[..i].rfind('(') else {
            continue;
        };
        return Some((plain[..open].trim(), &plain[open + 1..i], justification.trim()));
    }
    None
}
