use anyhow::Result;
use httpmock::prelude::*;
use seat_tracker::{CheckOutcome, SeatCount, SeatTracker, TrackerSettings};

fn catalog_body(cap: u64, total: u64) -> serde_json::Value {
    serde_json::json!({
        "classes": [
            {
                "CLAS": { "CLASSNBR": "10001", "SUBJECT": "CSE", "CATALOGNBR": "486" },
                "seatInfo": { "ENRL_CAP": 100, "ENRL_TOT": 12 }
            },
            {
                "CLAS": { "CLASSNBR": "28482", "SUBJECT": "CSE", "CATALOGNBR": "486" },
                "seatInfo": { "ENRL_CAP": cap, "ENRL_TOT": total }
            }
        ]
    })
}

fn settings_for(server: &MockServer) -> TrackerSettings {
    let mut settings = TrackerSettings::default();
    settings.catalog.url = server.url("/catalog/search/classes");
    settings.catalog.token = Some("test-token".to_string());
    settings.notify.ntfy_url = server.url("/ntfy");
    settings.notify.ntfy_topic = "cse486".to_string();
    settings
}

/// 有空位時送出 ntfy 與 webhook 通知
#[tokio::test]
async fn test_open_seat_triggers_both_notifications() -> Result<()> {
    let server = MockServer::start_async().await;

    let catalog = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/catalog/search/classes")
                .header("authorization", "Bearer test-token");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(catalog_body(80, 77));
        })
        .await;

    let ntfy = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/ntfy/cse486")
                .header("title", "Class Seat Alert")
                .header("priority", "high")
                .body("FOUND IT! Class 28482 has 3 seat(s) open. Enroll NOW!");
            then.status(200);
        })
        .await;

    let webhook = server
        .mock_async(|when, then| {
            when.method(POST).path("/webhook").body_contains("28482");
            then.status(204);
        })
        .await;

    let mut settings = settings_for(&server);
    settings.notify.webhook_url = Some(server.url("/webhook"));

    let tracker = SeatTracker::from_settings(&settings);
    let outcome = tracker.run().await;

    assert_eq!(outcome, CheckOutcome::SeatsOpen { seats: SeatCount(3) });
    catalog.assert_async().await;
    ntfy.assert_async().await;
    webhook.assert_async().await;

    Ok(())
}

#[tokio::test]
async fn test_full_section_single_check_sends_nothing() -> Result<()> {
    let server = MockServer::start_async().await;

    let catalog = server
        .mock_async(|when, then| {
            when.method(GET).path("/catalog/search/classes");
            then.status(200).json_body(catalog_body(80, 80));
        })
        .await;

    let ntfy = server
        .mock_async(|when, then| {
            when.method(POST).path("/ntfy/cse486");
            then.status(200);
        })
        .await;

    let mut settings = settings_for(&server);
    settings.poll.run_once = true;

    let outcome = SeatTracker::from_settings(&settings).run().await;

    assert_eq!(outcome, CheckOutcome::Full);
    catalog.assert_hits_async(1).await;
    assert_eq!(ntfy.hits_async().await, 0);

    Ok(())
}

#[tokio::test]
async fn test_expired_token_is_reported_not_fatal() -> Result<()> {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/catalog/search/classes");
            then.status(401).body("Unauthorized");
        })
        .await;

    let ntfy = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/ntfy/cse486")
                .body_contains("Token rejected (401)");
            then.status(200);
        })
        .await;

    let settings = settings_for(&server);
    let tracker = SeatTracker::from_settings(&settings);

    assert_eq!(tracker.check_once().await, CheckOutcome::Failed);
    assert_eq!(tracker.check_once().await, CheckOutcome::Failed);
    ntfy.assert_hits_async(1).await;

    Ok(())
}

#[tokio::test]
async fn test_class_missing_from_results() -> Result<()> {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/catalog/search/classes");
            then.status(200).json_body(serde_json::json!({ "classes": [] }));
        })
        .await;

    let mut settings = settings_for(&server);
    settings.poll.run_once = true;

    let outcome = SeatTracker::from_settings(&settings).check_once().await;
    assert_eq!(outcome, CheckOutcome::NotFound);

    Ok(())
}

/// ntfy 掛掉時仍回報找到空位
#[tokio::test]
async fn test_notification_failure_still_reports_seat() -> Result<()> {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/catalog/search/classes");
            then.status(200).json_body(catalog_body(30, 29));
        })
        .await;

    let ntfy = server
        .mock_async(|when, then| {
            when.method(POST).path("/ntfy/cse486");
            then.status(502);
        })
        .await;

    let settings = settings_for(&server);
    let outcome = SeatTracker::from_settings(&settings).check_once().await;

    assert_eq!(outcome, CheckOutcome::SeatsOpen { seats: SeatCount(1) });
    ntfy.assert_async().await;

    Ok(())
}

#[tokio::test]
async fn test_non_object_body_counts_as_failed_check() -> Result<()> {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/catalog/search/classes");
            then.status(200).json_body(serde_json::json!([1, 2]));
        })
        .await;

    let mut settings = settings_for(&server);
    settings.poll.run_once = true;

    let outcome = SeatTracker::from_settings(&settings).run().await;
    assert_eq!(outcome, CheckOutcome::Failed);

    Ok(())
}

/// 超過 timeout_secs 的回應視為失敗，不會一直卡住
#[tokio::test]
async fn test_slow_catalog_times_out() -> Result<()> {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/catalog/search/classes");
            then.status(200)
                .delay(std::time::Duration::from_secs(4))
                .json_body(catalog_body(80, 70));
        })
        .await;

    let mut settings = settings_for(&server);
    settings.catalog.timeout_secs = Some(1);

    let started = std::time::Instant::now();
    let outcome = SeatTracker::from_settings(&settings).check_once().await;

    assert_eq!(outcome, CheckOutcome::Failed);
    assert!(started.elapsed() < std::time::Duration::from_secs(4));

    Ok(())
}
