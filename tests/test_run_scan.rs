mod common;

use common::*;
use marketbrief::application::run_scan::RunOutcome;
use marketbrief::domain::error::DomainError;
use marketbrief::domain::values::response_format::ResponseFormat;

const URLS: [&str; 3] = ["https://n/1", "https://n/2", "https://n/3"];

#[tokio::test]
async fn test_first_run_delivers_and_records_batch() {
    let h = HarnessBuilder::new(
        FakeNews::returning(articles(&URLS)),
        FakeModel::replying(FREE_TEXT_RESPONSE),
    )
    .build();

    let outcome = h.brief.run_on(today()).await.unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Delivered {
            articles: 3,
            opportunities: 3,
            price_lookups: 2,
            rate_limited: false,
            degraded: false,
            recorded: true,
        }
    );
    assert_eq!(h.delivery.count(), 1);
    assert_eq!(h.ledger_lines(), URLS.to_vec());

    let (subject, html) = h.delivery.sent.lock().unwrap()[0].clone();
    assert_eq!(subject, "Your AI Market Briefing - 2024-03-05");
    assert!(html.contains("NVIDIA"));
    assert!(html.contains("quickchart.io"));
    assert!(html.contains("Private Company / N/A"));
}

#[tokio::test]
async fn test_second_run_with_same_articles_sends_nothing() {
    let h = HarnessBuilder::new(
        FakeNews::returning(articles(&URLS)),
        FakeModel::replying(FREE_TEXT_RESPONSE),
    )
    .build();

    h.brief.run_on(today()).await.unwrap();
    let second = h.brief.run_on(today()).await.unwrap();

    assert_eq!(second, RunOutcome::NoNewArticles { fetched: 3 });
    assert_eq!(h.model.calls(), 1);
    assert_eq!(h.delivery.count(), 1);
    assert_eq!(h.ledger_lines().len(), 3);
}

#[tokio::test]
async fn test_only_unseen_articles_reach_the_model() {
    let dir = tempfile::TempDir::new().unwrap();
    let ledger_path = dir.path().join("processed_articles.txt");
    std::fs::write(&ledger_path, "https://n/1\nhttps://n/2\n").unwrap();

    let h = HarnessBuilder::new(
        FakeNews::returning(articles(&URLS)),
        FakeModel::replying(FREE_TEXT_RESPONSE),
    )
    .build_in(dir, ledger_path);

    let outcome = h.brief.run_on(today()).await.unwrap();
    assert!(matches!(outcome, RunOutcome::Delivered { articles: 1, .. }));

    let prompt = h.model.prompts.lock().unwrap()[0].clone();
    assert!(prompt.contains("Headline for https://n/3"));
    assert!(!prompt.contains("Headline for https://n/1"));
    assert_eq!(h.ledger_lines(), vec!["https://n/1", "https://n/2", "https://n/3"]);
}

#[tokio::test]
async fn test_no_articles_ends_quietly() {
    let h = HarnessBuilder::new(FakeNews::returning(vec![]), FakeModel::replying("unused")).build();

    assert_eq!(h.brief.run_on(today()).await.unwrap(), RunOutcome::NoArticles);
    assert_eq!(h.model.calls(), 0);
    assert_eq!(h.delivery.count(), 0);
    assert!(!h.ledger_path.exists());
}

#[tokio::test]
async fn test_news_failure_counts_as_no_articles() {
    let h = HarnessBuilder::new(FakeNews::failing("HTTP 500"), FakeModel::replying("unused")).build();

    assert_eq!(h.brief.run_on(today()).await.unwrap(), RunOutcome::NoArticles);
    assert_eq!(h.model.calls(), 0);
}

#[tokio::test]
async fn test_model_failure_leaves_ledger_untouched() {
    let h = HarnessBuilder::new(FakeNews::returning(articles(&URLS)), FakeModel::failing("quota")).build();

    let err = h.brief.run_on(today()).await.unwrap_err();
    assert!(matches!(err, DomainError::Model(_)));
    assert_eq!(h.delivery.count(), 0);
    assert!(h.ledger_lines().is_empty());
}

#[tokio::test]
async fn test_empty_model_response_is_a_failure() {
    let h = HarnessBuilder::new(FakeNews::returning(articles(&URLS)), FakeModel::replying("  \n")).build();

    assert!(matches!(
        h.brief.run_on(today()).await,
        Err(DomainError::Model(_))
    ));
    assert_eq!(h.delivery.count(), 0);
    assert!(h.ledger_lines().is_empty());
}

#[tokio::test]
async fn test_delivery_failure_leaves_ledger_untouched() {
    let h = HarnessBuilder::new(
        FakeNews::returning(articles(&URLS)),
        FakeModel::replying(FREE_TEXT_RESPONSE),
    )
    .delivery(RecordingDelivery::failing())
    .build();

    let err = h.brief.run_on(today()).await.unwrap_err();
    assert!(matches!(err, DomainError::Delivery(_)));
    assert!(h.ledger_lines().is_empty());
}

#[tokio::test]
async fn test_failed_run_is_retried_next_time() {
    let dir = tempfile::TempDir::new().unwrap();
    let ledger_path = dir.path().join("processed_articles.txt");

    let failing = HarnessBuilder::new(
        FakeNews::returning(articles(&URLS)),
        FakeModel::replying(FREE_TEXT_RESPONSE),
    )
    .delivery(RecordingDelivery::failing())
    .build_in(dir, ledger_path.clone());
    assert!(failing.brief.run_on(today()).await.is_err());

    let retry = HarnessBuilder::new(
        FakeNews::returning(articles(&URLS)),
        FakeModel::replying(FREE_TEXT_RESPONSE),
    )
    .build_in(failing.dir, ledger_path);
    let outcome = retry.brief.run_on(today()).await.unwrap();
    assert!(matches!(outcome, RunOutcome::Delivered { articles: 3, .. }));
    assert_eq!(retry.ledger_lines().len(), 3);
}

#[tokio::test]
async fn test_malformed_json_response_is_not_delivered() {
    let h = HarnessBuilder::new(
        FakeNews::returning(articles(&URLS)),
        FakeModel::replying("{ not json"),
    )
    .format(ResponseFormat::Json)
    .build();

    let err = h.brief.run_on(today()).await.unwrap_err();
    assert!(matches!(err, DomainError::Parse(_)));
    assert_eq!(h.delivery.count(), 0);
    assert!(h.ledger_lines().is_empty());
}

#[tokio::test]
async fn test_json_with_no_opportunities_renders_placeholder() {
    let response = r#"{"market_overview": "Flat session.", "overall_sentiment": "Neutral", "opportunities": []}"#;
    let h = HarnessBuilder::new(FakeNews::returning(articles(&URLS)), FakeModel::replying(response))
        .format(ResponseFormat::Json)
        .build();

    let outcome = h.brief.run_on(today()).await.unwrap();
    assert!(matches!(
        outcome,
        RunOutcome::Delivered {
            opportunities: 0,
            price_lookups: 0,
            ..
        }
    ));
    assert!(h.prices.calls().is_empty());
    let html = h.delivery.last_html().unwrap();
    assert!(html.contains("No specific opportunities identified in this category."));
    assert!(html.contains("Flat session."));
    assert_eq!(h.ledger_lines().len(), 3);
}

#[tokio::test]
async fn test_unparseable_free_text_is_still_delivered() {
    let h = HarnessBuilder::new(
        FakeNews::returning(articles(&URLS)),
        FakeModel::replying(r#"{"unexpected": "json"}"#),
    )
    .build();

    let outcome = h.brief.run_on(today()).await.unwrap();
    assert!(matches!(
        outcome,
        RunOutcome::Delivered {
            degraded: true,
            opportunities: 0,
            ..
        }
    ));
    assert!(h.delivery.last_html().unwrap().contains("could not be parsed"));
    assert_eq!(h.ledger_lines().len(), 3);
}

#[tokio::test]
async fn test_preview_run_does_not_record() {
    let h = HarnessBuilder::new(
        FakeNews::returning(articles(&URLS)),
        FakeModel::replying(FREE_TEXT_RESPONSE),
    )
    .record(false)
    .build();

    let outcome = h.brief.run_on(today()).await.unwrap();
    assert!(matches!(outcome, RunOutcome::Delivered { recorded: false, .. }));
    assert_eq!(h.delivery.count(), 1);
    assert!(!h.ledger_path.exists());
}
