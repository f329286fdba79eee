//! Bulk submission behaviour against the stub list service

use serde_json::json;
use slack_lists_core::environment::Clock;
use slack_lists_core::{
    BulkSubmissionSequencer, FieldInput, ListItemRequest, ListsError, RejectedItem,
};
use slack_lists_testing::{ManualClock, StubListService, init_tracing, test_clock};
use std::sync::Arc;
use std::time::Duration;

fn harness(service: StubListService) -> (BulkSubmissionSequencer, Arc<StubListService>, ManualClock) {
    let clock = test_clock();
    let service = Arc::new(service.with_clock(Arc::new(clock.clone())));
    let sequencer = BulkSubmissionSequencer::new(service.clone(), Arc::new(clock.clone()));
    (sequencer, service, clock)
}

fn titled(titles: &[&str]) -> Vec<Result<ListItemRequest, RejectedItem>> {
    titles.iter().map(|t| Ok(ListItemRequest::new(*t))).collect()
}

#[tokio::test]
async fn test_results_match_input_order() {
    let (sequencer, service, _) = harness(StubListService::new());

    let results = sequencer
        .submit("F1", titled(&["one", "two", "three"]), Duration::ZERO)
        .await;

    assert_eq!(results.len(), 3);
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.index, i);
        assert!(result.succeeded);
    }
    let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["one", "two", "three"]);
    assert_eq!(results[0].item_id.as_deref(), Some("Rec0001"));
    assert_eq!(service.create_calls(), 3);
}

#[tokio::test]
async fn test_empty_title_never_reaches_service() {
    let (sequencer, service, _) = harness(StubListService::new());

    let results = sequencer.submit("F1", titled(&["   "]), Duration::ZERO).await;

    assert_eq!(results.len(), 1);
    assert!(!results[0].succeeded);
    assert_eq!(results[0].error_kind.as_deref(), Some("validation_error"));
    assert_eq!(service.create_calls(), 0);
}

#[tokio::test]
async fn test_invalid_field_fails_only_that_item() {
    let (sequencer, service, _) = harness(StubListService::new());
    let requests = vec![
        Ok(ListItemRequest::new("good")),
        Ok(ListItemRequest::new("bad date")
            .with_fields(vec![FieldInput::new("Col2", "date", json!("31/12/2024"))])),
        Ok(ListItemRequest::new("also good")
            .with_fields(vec![FieldInput::new("Col3", "checkbox", json!(true))])),
    ];

    let results = sequencer.submit("F1", requests, Duration::ZERO).await;

    let outcome: Vec<bool> = results.iter().map(|r| r.succeeded).collect();
    assert_eq!(outcome, vec![true, false, true]);
    assert_eq!(service.create_calls(), 2);
}

#[tokio::test]
async fn test_rejected_entry_keeps_its_index() {
    let (sequencer, service, clock) = harness(StubListService::new());
    let delay = Duration::from_millis(500);
    let requests = vec![
        Ok(ListItemRequest::new("first")),
        Err(RejectedItem::new(
            "broken",
            ListsError::validation("fields[0].column_id: expected a string"),
        )),
        Ok(ListItemRequest::new("third")),
    ];

    let results = sequencer.submit("F1", requests, delay).await;

    let outcome: Vec<bool> = results.iter().map(|r| r.succeeded).collect();
    assert_eq!(outcome, vec![true, false, true]);
    assert_eq!(results[1].index, 1);
    assert_eq!(results[1].title, "broken");
    assert_eq!(results[1].error_kind.as_deref(), Some("validation_error"));
    assert_eq!(service.create_calls(), 2);
    assert_eq!(clock.sleeps(), vec![delay; 2]);
}

#[tokio::test]
async fn test_service_failure_does_not_halt_batch() {
    init_tracing();
    let stub = StubListService::new().fail_create_call(
        1,
        ListsError::RateLimit {
            retry_after_secs: Some(3),
        },
    );
    let (sequencer, service, _) = harness(stub);

    let results = sequencer
        .submit("F1", titled(&["a", "b", "c"]), Duration::from_millis(10))
        .await;

    assert!(results[0].succeeded);
    assert!(!results[1].succeeded);
    assert_eq!(results[1].error_kind.as_deref(), Some("rate_limit_error"));
    assert!(
        results[1]
            .error_message
            .as_deref()
            .is_some_and(|m| m.contains("retry after 3s"))
    );
    assert!(results[2].succeeded);
    assert_eq!(service.create_calls(), 3);
}

#[tokio::test]
async fn test_submissions_are_spaced_by_delay() {
    let (sequencer, service, clock) = harness(StubListService::new());
    let delay = Duration::from_millis(1200);

    sequencer
        .submit("F1", titled(&["a", "b", "c", "d"]), delay)
        .await;

    assert_eq!(clock.sleeps(), vec![delay; 3]);
    let times = service.create_times();
    assert_eq!(times.len(), 4);
    for pair in times.windows(2) {
        assert!((pair[1] - pair[0]).num_milliseconds() >= 1200);
    }
}

#[tokio::test]
async fn test_single_item_does_not_sleep() {
    let (sequencer, _, clock) = harness(StubListService::new());
    let start = clock.now();

    sequencer
        .submit("F1", titled(&["only"]), Duration::from_secs(5))
        .await;

    assert!(clock.sleeps().is_empty());
    assert_eq!(clock.now(), start);
}

#[tokio::test]
async fn test_title_and_parent_are_sent() {
    let (sequencer, service, _) = harness(StubListService::new());
    let request = ListItemRequest::new("Subtask")
        .with_title_column("Col99")
        .with_parent(Some("Rec0".to_string()));

    sequencer.submit("F1", vec![Ok(request)], Duration::ZERO).await;

    let sent = service.created_requests();
    assert_eq!(sent[0].list_id, "F1");
    assert_eq!(sent[0].parent_item_id.as_deref(), Some("Rec0"));
    assert_eq!(sent[0].initial_fields[0].column_id, "Col99");
}

#[tokio::test]
async fn test_empty_batch() {
    let (sequencer, service, _) = harness(StubListService::new());
    let results = sequencer.submit("F1", Vec::new(), Duration::from_secs(1)).await;
    assert!(results.is_empty());
    assert_eq!(service.create_calls(), 0);
}
