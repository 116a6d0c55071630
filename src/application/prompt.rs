use crate::domain::entities::article::ArticleRef;
use crate::domain::values::response_format::ResponseFormat;

pub const ARTICLE_SEPARATOR: &str = "\n---\n";

const PERSONA: &str = "**Act as an expert market analyst.** Analyze the following financial news to identify potential investment opportunities.";

const SELECTION_RULES: &str = "\
**IMPORTANT RULES FOR COMPANY SELECTION:**
* **Prioritize publicly traded companies.** Your main goal is to find opportunities that can be invested in via the stock market.
* For each company you **MUST** provide the ticker symbol. Example: NVIDIA (NVDA).
* If the news is about a private company, you may include it but write **(Private Company)** in place of the ticker.
* Provide a concise, one-sentence justification.";

const FREE_TEXT_STRUCTURE: &str = "\
**Report Structure:**
1.  **Overall Market Overview:** A brief, 2-3 sentence summary of market sentiment. Start with \"Market Sentiment:\" followed by Bullish, Bearish, or Neutral.
2.  **Short-Term Opportunities (1-6 months):** List up to 5 companies, one per bullet, as `* **Company Name (TICKER):** justification`.
3.  **Long-Term Potential (1+ years):** List up to 5 companies in the same form.";

const JSON_STRUCTURE: &str = "\
**Response Format:**
Respond with a single JSON object and nothing else, using exactly this schema:
{
  \"market_overview\": \"2-3 sentence summary of the market\",
  \"overall_sentiment\": \"Bullish | Bearish | Neutral\",
  \"opportunities\": [
    {
      \"company_name\": \"Company name\",
      \"ticker_symbol\": \"Ticker, or Private Company\",
      \"justification\": \"One sentence\",
      \"sentiment\": \"Bullish | Bearish | Neutral\"
    }
  ]
}
List at most 10 opportunities. Use an empty array when nothing qualifies.";

/// Article block fed to the model: title and description per article.
pub fn format_articles(articles: &[ArticleRef]) -> String {
    articles
        .iter()
        .map(|a| format!("Title: {}\nDesc: {}", a.title, a.description))
        .collect::<Vec<_>>()
        .join(ARTICLE_SEPARATOR)
}

/// Complete analysis prompt for `format`.
pub fn build_prompt(format: ResponseFormat, articles: &[ArticleRef]) -> String {
    let structure = match format {
        ResponseFormat::FreeText => FREE_TEXT_STRUCTURE,
        ResponseFormat::Json => JSON_STRUCTURE,
    };
    format!(
        "{PERSONA}\n\n{structure}\n\n{SELECTION_RULES}\n\n**--- NEWS ARTICLES TO ANALYZE ---**\n{}",
        format_articles(articles)
    )
}
