mod support;

use std::sync::Arc;

use pricesync::application::summary::SourceOutcome;
use pricesync::domain::{ItemKey, PriceWithSupply};
use pricesync::error::{ConversionError, Error};
use pricesync::port::{ItemStore, SourceAdapter};
use pricesync::testkit::adapter::{ScriptedSource, StaticRates};
use pricesync::testkit::domain::{at, item, item_in, listing, listing_unknown_qty, source, APP};

use support::services::{price_sync, store_with};

fn now() -> chrono::DateTime<chrono::Utc> {
    at(2024, 3, 1, 12)
}

#[tokio::test]
async fn lots_collapse_to_min_price_and_summed_supply() {
    let store = store_with(vec![item("Case"), item("Knife")]);
    let skinport: Arc<dyn SourceAdapter> = Arc::new(
        ScriptedSource::new("skinport", "EUR")
            .then_listings(vec![listing("Case", 500, "EUR", 2), listing("Case", 480, "EUR", 3)]),
    );

    let sync = price_sync(vec![skinport], StaticRates::standard(), &store);
    let summary = sync.run(APP, now()).await.unwrap();

    let case = store.get(APP, &ItemKey::new("Case")).unwrap();
    // 480 EUR / 0.9137 = 525.33 USD
    assert_eq!(
        case.buy_prices.get(&source("skinport")),
        Some(&PriceWithSupply::new(525, Some(5)))
    );
    let knife = store.get(APP, &ItemKey::new("Knife")).unwrap();
    assert!(knife.buy_prices.is_empty());

    assert_eq!(summary.items, 2);
    assert_eq!(summary.saved, 1);
    match summary.source(&source("skinport")) {
        Some(SourceOutcome::Reconciled { report, .. }) => {
            assert_eq!(report.added, 1);
            assert_eq!(report.unchanged, 1);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn identical_feed_twice_writes_nothing_the_second_time() {
    let store = store_with(vec![item("Case")]);
    let feed = vec![listing("Case", 300, "USD", 4)];
    let market: Arc<dyn SourceAdapter> = Arc::new(
        ScriptedSource::new("market", "USD")
            .then_listings(feed.clone())
            .then_listings(feed),
    );
    let sync = price_sync(vec![market], StaticRates::standard(), &store);

    let first = sync.run(APP, now()).await.unwrap();
    let second = sync.run(APP, now()).await.unwrap();

    assert_eq!(first.saved, 1);
    assert_eq!(second.saved, 0);
    assert_eq!(store.batches_saved(), 1);
    assert_ne!(first.batch_id, second.batch_id);
}

#[tokio::test]
async fn key_missing_from_successful_feed_removes_entry() {
    let store = store_with(vec![item("Case")]);
    let market: Arc<dyn SourceAdapter> = Arc::new(
        ScriptedSource::new("market", "USD")
            .then_listings(vec![listing("Case", 300, "USD", 4)])
            .then_listings(vec![]),
    );
    let sync = price_sync(vec![market], StaticRates::standard(), &store);

    sync.run(APP, now()).await.unwrap();
    let summary = sync.run(APP, now()).await.unwrap();

    let case = store.get(APP, &ItemKey::new("Case")).unwrap();
    assert!(case.buy_prices.is_empty());
    match &summary.sources[0] {
        SourceOutcome::Reconciled { report, .. } => assert_eq!(report.removed, 1),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn zero_supply_group_is_treated_as_absent() {
    let store = store_with(vec![item("Case")]);
    let market: Arc<dyn SourceAdapter> = Arc::new(
        ScriptedSource::new("market", "USD")
            .then_listings(vec![listing("Case", 300, "USD", 4)])
            .then_listings(vec![listing("Case", 290, "USD", 0)]),
    );
    let sync = price_sync(vec![market], StaticRates::standard(), &store);

    sync.run(APP, now()).await.unwrap();
    sync.run(APP, now()).await.unwrap();

    let case = store.get(APP, &ItemKey::new("Case")).unwrap();
    assert!(case.buy_prices.get(&source("market")).is_none());
}

#[tokio::test]
async fn failed_fetch_preserves_existing_entries() {
    let store = store_with(vec![item("Case")]);
    let flaky = Arc::new(
        ScriptedSource::new("flaky", "USD")
            .then_listings(vec![listing("Case", 300, "USD", 4)])
            .then_failure("HTTP 503"),
    );
    let steady: Arc<dyn SourceAdapter> = Arc::new(
        ScriptedSource::new("steady", "USD")
            .then_listings(vec![listing("Case", 310, "USD", 1)])
            .then_listings(vec![listing("Case", 305, "USD", 1)]),
    );
    let sync = price_sync(
        vec![Arc::clone(&flaky) as Arc<dyn SourceAdapter>, steady],
        StaticRates::standard(),
        &store,
    );

    sync.run(APP, now()).await.unwrap();
    let summary = sync.run(APP, now()).await.unwrap();

    assert_eq!(flaky.calls(), 2);
    assert_eq!(summary.failed_sources(), vec![&source("flaky")]);
    assert!(matches!(summary.sources[0], SourceOutcome::FetchFailed { .. }));
    assert!(summary.sources[1].is_reconciled());

    let case = store.get(APP, &ItemKey::new("Case")).unwrap();
    assert_eq!(
        case.buy_prices.get(&source("flaky")),
        Some(&PriceWithSupply::new(300, Some(4)))
    );
    assert_eq!(
        case.buy_prices.get(&source("steady")),
        Some(&PriceWithSupply::new(305, Some(1)))
    );
}

#[tokio::test]
async fn missing_source_rate_fails_items_but_other_sources_commit() {
    let store = store_with(vec![item("Case")]);
    let pounds: Arc<dyn SourceAdapter> = Arc::new(
        ScriptedSource::new("pounds", "GBP").then_listings(vec![listing("Case", 200, "GBP", 1)]),
    );
    let dollars: Arc<dyn SourceAdapter> = Arc::new(
        ScriptedSource::new("dollars", "USD").then_listings(vec![listing("Case", 250, "USD", 1)]),
    );
    let sync = price_sync(vec![pounds, dollars], StaticRates::standard(), &store);

    let summary = sync.run(APP, now()).await.unwrap();

    match summary.source(&source("pounds")) {
        Some(SourceOutcome::Reconciled { report, .. }) => {
            assert_eq!(report.failures.len(), 1);
            assert_eq!(report.failures[0].key, ItemKey::new("Case"));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    let case = store.get(APP, &ItemKey::new("Case")).unwrap();
    assert!(case.buy_prices.get(&source("pounds")).is_none());
    assert_eq!(case.buy_prices.get(&source("dollars")).map(|p| p.price), Some(250));
}

#[tokio::test]
async fn malformed_listings_are_rejected_individually() {
    let store = store_with(vec![item("Case"), item("Knife")]);
    let market: Arc<dyn SourceAdapter> = Arc::new(ScriptedSource::new("market", "USD").then_listings(vec![
        listing("Case", -5, "USD", 1),
        listing("Knife", 900, "EUR", 1),
        listing("", 100, "USD", 1),
        listing("Knife", 950, "USD", 2),
        listing("Gloves", 10, "USD", 1),
    ]));
    let sync = price_sync(vec![market], StaticRates::standard(), &store);

    let summary = sync.run(APP, now()).await.unwrap();

    let SourceOutcome::Reconciled { report, .. } = &summary.sources[0] else {
        panic!("expected reconciled outcome");
    };
    assert_eq!(report.rejected.len(), 3);
    assert_eq!(report.added, 1);
    assert_eq!(report.unmatched, 1);

    let knife = store.get(APP, &ItemKey::new("Knife")).unwrap();
    assert_eq!(knife.buy_prices.get(&source("market")).map(|p| p.price), Some(950));
}

#[tokio::test]
async fn missing_pivot_rate_stops_the_batch_before_fetching() {
    let store = store_with(vec![item("Case")]);
    let market = Arc::new(ScriptedSource::new("market", "USD").then_listings(vec![listing("Case", 1, "USD", 1)]));
    let rates = StaticRates::new().with_live("EUR", rust_decimal_macros::dec!(0.9));
    let sync = price_sync(vec![Arc::clone(&market) as Arc<dyn SourceAdapter>], rates, &store);

    let result = sync.run(APP, now()).await;

    assert!(matches!(
        result,
        Err(Error::Conversion(ConversionError::PivotUnavailable { .. }))
    ));
    assert_eq!(market.calls(), 0);
    assert_eq!(store.batches_saved(), 0);
}

#[tokio::test]
async fn rate_provider_failure_is_batch_fatal() {
    let store = store_with(vec![item("Case")]);
    let sync = price_sync(vec![], StaticRates::failing(), &store);

    assert!(sync.run(APP, now()).await.is_err());
    assert_eq!(store.load_items(APP).await.unwrap().len(), 1);
}

#[tokio::test]
async fn outcomes_follow_registration_order() {
    let store = store_with(vec![item("Case")]);
    let names = ["c", "a", "b"];
    let sources: Vec<Arc<dyn SourceAdapter>> = names
        .iter()
        .map(|name| Arc::new(ScriptedSource::new(name, "USD")) as Arc<dyn SourceAdapter>)
        .collect();
    let sync = price_sync(sources, StaticRates::standard(), &store);

    let summary = sync.run(APP, now()).await.unwrap();

    let order: Vec<&str> = summary.sources.iter().map(|o| o.source().as_str()).collect();
    assert_eq!(order, names);
}

#[tokio::test]
async fn prices_land_in_item_currency_with_unknown_supply() {
    let store = store_with(vec![item_in("Sticker", "EUR")]);
    let buff: Arc<dyn SourceAdapter> = Arc::new(
        ScriptedSource::new("buff", "CNY").then_listings(vec![listing_unknown_qty("Sticker", 1000, "CNY")]),
    );

    let sync = price_sync(vec![buff], StaticRates::standard(), &store);
    let summary = sync.run(APP, now()).await.unwrap();

    let sticker = store.get(APP, &ItemKey::new("Sticker")).unwrap();
    // 1000 CNY -> 138.06 USD -> 126.15 EUR
    assert_eq!(
        sticker.buy_prices.get(&source("buff")),
        Some(&PriceWithSupply::new(126, None))
    );
    match summary.source(&source("buff")) {
        Some(SourceOutcome::Reconciled { report, .. }) => assert_eq!(report.changed(), 1),
        other => panic!("unexpected outcome {other:?}"),
    }
}
