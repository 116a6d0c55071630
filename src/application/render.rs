//! HTML email rendering for a [`MarketReport`].

use crate::application::enrich::EnrichmentContext;
use crate::domain::entities::report::{MarketReport, Opportunity, ReportSection};
use crate::domain::values::ticker;
use crate::domain::values::trend_status::TrendStatus;
use chrono::NaiveDate;

const CHART_ENDPOINT: &str = "https://quickchart.io/chart";
const RISING_COLOR: &str = "#28a745";
const FALLING_COLOR: &str = "#dc3545";
const EMPTY_SECTION: &str = "No specific opportunities identified in this category.";
const TREND_UNAVAILABLE: &str = "Trend unavailable";

const STYLE: &str = "\
body { font-family: 'Poppins', sans-serif; background-color: #f0f2f5; margin: 0; padding: 0; }
.email-container { max-width: 800px; margin: 20px auto; background-color: #ffffff; border-radius: 12px; box-shadow: 0 4px 10px rgba(0,0,0,0.05); }
.header { background-color: #4a69bd; color: #ffffff; padding: 25px; text-align: center; border-radius: 12px 12px 0 0; }
.warning-banner { background-color: #fff3cd; color: #856404; padding: 15px; text-align: center; font-size: 14px; }
.content { padding: 20px 30px; } .section { margin-bottom: 25px; }
.section h2 { color: #1e272e; font-weight: 600; font-size: 20px; border-bottom: 2px solid #eef2f7; padding-bottom: 8px; }
.overview-box { background-color: #f8f9fa; border: 1px solid #e9ecef; border-radius: 8px; padding: 20px; }
.overview-box p { margin: 0; font-size: 15px; line-height: 1.6; color: #495057; }
.sentiment-badge { display: inline-block; padding: 5px 15px; border-radius: 15px; color: #fff; font-weight: 600; margin-bottom: 10px; }
.opportunity-card { display: flex; align-items: center; justify-content: space-between; border: 1px solid #e9ecef; border-radius: 8px; padding: 20px; margin-bottom: 15px; }
.opportunity-text { flex: 1; padding-right: 20px; }
.opportunity-text h3 { margin: 0 0 5px 0; color: #2c3e50; font-size: 18px; }
.opportunity-text h3 span { color: #7f8c8d; font-weight: 400; font-size: 16px; }
.opportunity-text p { margin: 0; color: #576574; font-size: 14px; line-height: 1.5; }
.opportunity-chart { flex-shrink: 0; } .no-chart { font-size: 12px; color: #95a5a6; text-align: center; width: 150px; }
.footer { color: #95a5a6; padding: 20px; text-align: center; font-size: 12px; }";

pub fn subject(date: NaiveDate) -> String {
    format!("Your AI Market Briefing - {}", date.format("%Y-%m-%d"))
}

/// Full HTML document for the report.
pub fn render_html(report: &MarketReport, trends: &EnrichmentContext, date: NaiveDate) -> String {
    let mut banners = String::new();
    if trends.is_rate_limited() {
        banners.push_str(
            r#"<div class="warning-banner"><strong>Alert:</strong> The daily limit for the stock data API was reached. Some trend charts may be unavailable until the limit resets tomorrow.</div>"#,
        );
    }
    if report.degraded {
        banners.push_str(
            r#"<div class="warning-banner"><strong>Notice:</strong> The AI response could not be parsed, so no opportunities are listed in this briefing.</div>"#,
        );
    }

    let sections: String = report
        .sections
        .iter()
        .map(|s| render_section(s, trends))
        .collect();

    format!(
        r#"<!DOCTYPE html><html><head><meta charset="utf-8"><style>
{STYLE}
</style></head><body><div class="email-container"><div class="header"><h1>Daily AI Market Briefing</h1></div>{banners}
<div class="content"><div class="section"><h2>Market Overview</h2><div class="overview-box">
<div class="sentiment-badge" style="background-color: {color};">{sentiment}</div><p>{overview}</p></div></div>
{sections}</div>
<div class="footer">Automated report for {long_date}. This is not financial advice.</div>
</div></body></html>"#,
        color = report.sentiment.color(),
        sentiment = report.sentiment,
        overview = escape_html(&report.overview).replace('\n', "<br>"),
        long_date = date.format("%B %d, %Y"),
    )
}

fn render_section(section: &ReportSection, trends: &EnrichmentContext) -> String {
    let body = if section.opportunities.is_empty() {
        format!("<p>{EMPTY_SECTION}</p>")
    } else {
        section
            .opportunities
            .iter()
            .map(|o| render_card(o, trends))
            .collect()
    };
    format!(
        r#"<div class="section"><h2>{}</h2>{body}</div>"#,
        section.horizon.title()
    )
}

fn render_card(opportunity: &Opportunity, trends: &EnrichmentContext) -> String {
    let chart = match trend_visual(opportunity.ticker.as_deref(), trends) {
        Ok(url) => format!(r#"<img src="{}" alt="30-day trend">"#, escape_html(&url)),
        Err(fallback) => format!(r#"<p class="no-chart">{}</p>"#, escape_html(&fallback)),
    };
    format!(
        r#"<div class="opportunity-card"><div class="opportunity-text"><h3>{} <span>({})</span></h3><p>{}</p></div><div class="opportunity-chart">{chart}</div></div>"#,
        escape_html(&opportunity.company_name),
        escape_html(opportunity.ticker.as_deref().unwrap_or("N/A")),
        escape_html(&opportunity.justification),
    )
}

/// Chart URL for the ticker's trend, or the fallback text to show instead.
fn trend_visual(symbol: Option<&str>, trends: &EnrichmentContext) -> Result<String, String> {
    let Some(symbol) = symbol.filter(|t| !ticker::is_unlisted(Some(*t))) else {
        return Err(TrendStatus::PrivateOrNA.to_string());
    };
    let Some(trend) = trends.trend(symbol) else {
        return Err(TREND_UNAVAILABLE.to_string());
    };
    match trend.prices.as_deref() {
        Some(prices) => chart_url(prices).ok_or_else(|| TREND_UNAVAILABLE.to_string()),
        None => Err(trend.status.to_string()),
    }
}

/// QuickChart sparkline for a price series; `None` below two points.
pub fn chart_url(prices: &[f64]) -> Option<String> {
    let (first, last) = match prices {
        [first, .., last] => (*first, *last),
        _ => return None,
    };
    let color = if last >= first { RISING_COLOR } else { FALLING_COLOR };
    let config = serde_json::json!({
        "type": "line",
        "data": {
            "labels": vec![""; prices.len()],
            "datasets": [{
                "data": prices,
                "borderColor": color,
                "borderWidth": 2,
                "pointRadius": 0,
                "fill": false
            }]
        },
        "options": {
            "plugins": { "legend": { "display": false } },
            "scales": { "x": { "display": false }, "y": { "display": false } },
            "layout": { "padding": 5 }
        }
    });
    reqwest::Url::parse_with_params(
        CHART_ENDPOINT,
        &[
            ("c", config.to_string().as_str()),
            ("width", "150"),
            ("height", "50"),
            ("backgroundColor", "transparent"),
            ("v", "4"),
        ],
    )
    .ok()
    .map(String::from)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
