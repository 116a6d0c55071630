use crate::domain::entities::article::ArticleRef;
use std::collections::HashSet;

/// Articles whose URL is not in `seen`, in fetch order. Repeats of the same
/// URL within the batch are collapsed to the first occurrence.
pub fn fresh_articles(all: Vec<ArticleRef>, seen: &HashSet<String>) -> Vec<ArticleRef> {
    let mut batch = HashSet::new();
    all.into_iter()
        .filter(|a| !seen.contains(&a.url))
        .filter(|a| batch.insert(a.url.clone()))
        .collect()
}

/// URLs to record once the batch has been reported.
pub fn batch_urls(articles: &[ArticleRef]) -> Vec<String> {
    articles.iter().map(|a| a.url.clone()).collect()
}
