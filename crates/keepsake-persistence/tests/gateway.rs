//! Integration tests for the persistence gateway.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use keepsake_model::{Article, Probability};
use keepsake_persistence::{
    AutoSaveConfig, ConnectionReport, LoadOutcome, MemoryEndpoint, PersistenceError,
    PersistenceGateway, RawResponse, RemoteEndpoint, Result, SaveOutcome,
};
use keepsake_store::{NoticeKind, NoticeLog, StateKey, StateValue, Store};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::Notify;

// =============================================================================
// Scripted endpoint
// =============================================================================

/// Records every request and answers from a script.
#[derive(Default)]
struct Scripted {
    log: Mutex<Vec<&'static str>>,
    fetch_replies: Mutex<VecDeque<Result<RawResponse>>>,
    posted: Mutex<Vec<Value>>,
    fetch_gate: Option<Arc<Notify>>,
    post_gate: Option<Arc<Notify>>,
}

impl Scripted {
    fn serving(document: Value) -> Self {
        let s = Self::default();
        s.push_fetch(Ok(RawResponse::ok_json(
            json!({ "success": true, "data": document }).to_string(),
        )));
        s
    }

    fn push_fetch(&self, reply: Result<RawResponse>) {
        self.fetch_replies.lock().push_back(reply);
    }

    fn log(&self) -> Vec<&'static str> {
        self.log.lock().clone()
    }

    fn posts(&self) -> Vec<Value> {
        self.posted.lock().clone()
    }
}

#[async_trait]
impl RemoteEndpoint for Scripted {
    async fn fetch(&self) -> Result<RawResponse> {
        if let Some(gate) = &self.fetch_gate {
            gate.notified().await;
        }
        self.log.lock().push("GET");
        self.fetch_replies.lock().pop_front().unwrap_or_else(|| {
            Ok(RawResponse::ok_json(
                json!({ "success": true, "data": {}, "message": "defaults" }).to_string(),
            ))
        })
    }

    async fn replace(&self, body: String) -> Result<RawResponse> {
        if let Some(gate) = &self.post_gate {
            gate.notified().await;
        }
        self.log.lock().push("POST");
        self.posted.lock().push(serde_json::from_str(&body).unwrap());
        Ok(RawResponse::ok_json(
            json!({ "success": true, "message": "ok", "timestamp": "t", "fileSize": body.len() })
                .to_string(),
        ))
    }

    fn describe(&self) -> String {
        "scripted".into()
    }
}

fn document_with_articles(n: usize) -> Value {
    let articles: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "id": i as i64 + 1,
                "title": format!("Article {i}"),
                "concept": "symbols",
                "content": "text",
                "date": "1/1/2024",
            })
        })
        .collect();
    json!({
        "articles": articles,
        "confessionHistory": [
            { "confession": "I ate the last cookie", "sent": true, "probability": 30, "date": "1/2/2024" }
        ],
        "pointsAccumulated": 7.0,
        "concepts": ["symbols", "tide pools"],
        "suggestions": { "forSaleen": [], "forEmran": [], "forUs": [] },
        "grievances": [],
    })
}

struct Harness<E> {
    store: Store,
    endpoint: Arc<E>,
    notices: Arc<NoticeLog>,
    gateway: PersistenceGateway,
}

fn harness<E: RemoteEndpoint + 'static>(endpoint: E) -> Harness<E> {
    let store = Store::new();
    let endpoint = Arc::new(endpoint);
    let notices = Arc::new(NoticeLog::new());
    let gateway = PersistenceGateway::new(
        store.clone(),
        Arc::clone(&endpoint) as Arc<dyn RemoteEndpoint>,
        Arc::clone(&notices) as Arc<dyn keepsake_store::Notifier>,
        AutoSaveConfig::default(),
    );
    Harness {
        store,
        endpoint,
        notices,
        gateway,
    }
}

// =============================================================================
// Load
// =============================================================================

#[tokio::test]
async fn test_load_merges_document() {
    let h = harness(Scripted::serving(document_with_articles(2)));

    assert!(h.gateway.load().await.is_loaded());

    assert!(h.store.data_loaded());
    assert!(!h.store.is_loading());
    let snapshot = h.store.get_snapshot();
    assert_eq!(snapshot.articles.len(), 2);
    assert_eq!(snapshot.articles[1].title, "Article 1");
    assert_eq!(snapshot.confession_history.len(), 1);
    assert_eq!(snapshot.points_accumulated, 7.0);
    assert_eq!(snapshot.concepts, vec!["symbols", "tide pools"]);
    assert!(h.notices.is_empty());
}

#[tokio::test]
async fn test_load_round_trips_persisted_fields() {
    let document = document_with_articles(3);
    let h = harness(Scripted::serving(document.clone()));
    h.gateway.load().await;

    let round_tripped = serde_json::to_value(h.store.get_snapshot().to_document()).unwrap();
    assert_eq!(round_tripped, document);
}

#[tokio::test]
async fn test_load_fills_missing_fields() {
    let h = harness(Scripted::serving(json!({ "articles": null })));
    let before = h.store.concepts().get_all();

    assert!(h.gateway.load().await.is_loaded());
    assert!(h.store.articles().is_empty());
    assert_eq!(h.store.points(), 0.0);
    assert_eq!(h.store.concepts().get_all(), before);
}

#[tokio::test]
async fn test_html_page_degrades_without_touching_state() {
    let endpoint = Scripted::default();
    endpoint.push_fetch(Ok(RawResponse::ok_json("<!DOCTYPE html><h1>Not Found</h1>")));
    let h = harness(endpoint);
    h.store.articles().add(Article::new("local", "", "draft"));

    match h.gateway.load().await {
        LoadOutcome::Degraded(PersistenceError::Protocol { status: 200, .. }) => {}
        other => panic!("unexpected {other:?}"),
    }
    assert!(h.store.data_loaded());
    assert_eq!(h.store.articles().len(), 1);
    let notice = h.notices.last().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert!(notice.message.starts_with("Load failed"));
}

#[tokio::test]
async fn test_load_accepts_text_probability_then_saves_everything() {
    let mut document = document_with_articles(3);
    document["confessionHistory"][0]["probability"] = json!("30");
    let h = harness(Scripted::serving(document));

    assert!(h.gateway.load().await.is_loaded());
    assert_eq!(h.store.articles().len(), 3);
    assert_eq!(h.store.get_snapshot().confession_history[0].probability, 30);

    h.store.confessions().add_points(1.0);
    assert!(h.gateway.save().await.is_saved());
    let posted = &h.endpoint.posts()[0];
    assert_eq!(posted["articles"].as_array().unwrap().len(), 3);
    assert_eq!(posted["confessionHistory"][0]["probability"], json!(30));
}

#[tokio::test]
async fn test_unreadable_document_blocks_saves_until_forced() {
    let mut document = document_with_articles(3);
    document["confessionHistory"][0]["probability"] = json!("often");
    let h = harness(Scripted::serving(document));

    assert!(matches!(
        h.gateway.load().await,
        LoadOutcome::Degraded(PersistenceError::Protocol { status: 200, .. })
    ));
    assert!(h.store.data_loaded());
    assert!(h.store.articles().is_empty());

    h.store.confessions().add_points(1.0);
    match h.gateway.save().await {
        SaveOutcome::Blocked(PersistenceError::RemoteUnreadable { .. }) => {}
        other => panic!("unexpected {other:?}"),
    }
    assert!(h.endpoint.posts().is_empty());
    assert_eq!(h.notices.last().unwrap().kind, NoticeKind::Warning);

    assert!(h.gateway.save_forced().await.is_saved());
    assert_eq!(h.endpoint.posts().len(), 1);
    assert!(h.gateway.save().await.is_saved());
}

#[tokio::test]
async fn test_server_error_then_good_load_unblocks_saves() {
    let endpoint = Scripted::default();
    endpoint.push_fetch(Ok(RawResponse::ok_json(
        r#"{"success":false,"error":"Invalid JSON in data file"}"#,
    )));
    endpoint.push_fetch(Ok(RawResponse::ok_json(
        json!({ "success": true, "data": document_with_articles(2) }).to_string(),
    )));
    let h = harness(endpoint);

    h.gateway.load().await;
    assert!(matches!(
        h.gateway.save().await,
        SaveOutcome::Blocked(PersistenceError::RemoteUnreadable { .. })
    ));

    assert!(h.gateway.load().await.is_loaded());
    assert!(h.gateway.save().await.is_saved());
    assert_eq!(h.endpoint.log(), vec!["GET", "GET", "POST"]);
}

#[tokio::test]
async fn test_unreachable_endpoint_still_allows_local_saves() {
    let endpoint = Scripted::default();
    endpoint.push_fetch(Err(PersistenceError::Connectivity {
        reason: "connection refused".into(),
    }));
    let h = harness(endpoint);

    h.gateway.load().await;
    h.store.articles().add(Article::new("offline", "", "draft"));
    assert!(h.gateway.save().await.is_saved());
}

#[tokio::test]
async fn test_unreachable_and_server_errors_degrade() {
    let endpoint = Scripted::default();
    endpoint.push_fetch(Err(PersistenceError::Connectivity {
        reason: "connection refused".into(),
    }));
    let h = harness(endpoint);
    assert!(matches!(
        h.gateway.load().await,
        LoadOutcome::Degraded(PersistenceError::Connectivity { .. })
    ));

    let endpoint = Scripted::default();
    endpoint.push_fetch(Ok(RawResponse::ok_json(
        r#"{"success":false,"error":"Invalid JSON in data file"}"#,
    )));
    let h = harness(endpoint);
    assert!(matches!(
        h.gateway.load().await,
        LoadOutcome::Degraded(PersistenceError::Server { .. })
    ));
    assert!(h.store.data_loaded());
}

#[tokio::test]
async fn test_second_load_while_loading_is_rejected() {
    let gate = Arc::new(Notify::new());
    let endpoint = Scripted {
        fetch_gate: Some(Arc::clone(&gate)),
        ..Scripted::serving(document_with_articles(1))
    };
    let h = harness(endpoint);

    let gateway = h.gateway.clone();
    let first = tokio::spawn(async move { gateway.load().await });
    tokio::task::yield_now().await;
    assert!(h.store.is_loading());

    assert!(matches!(h.gateway.load().await, LoadOutcome::AlreadyLoading));

    gate.notify_one();
    assert!(first.await.unwrap().is_loaded());
    assert_eq!(h.endpoint.log(), vec!["GET"]);
}

// =============================================================================
// Save
// =============================================================================

#[tokio::test]
async fn test_save_before_load_loads_first() {
    let h = harness(Scripted::serving(document_with_articles(2)));

    assert!(h.gateway.save().await.is_saved());
    assert_eq!(h.endpoint.log(), vec!["GET", "POST"]);
    assert_eq!(h.endpoint.posts()[0]["articles"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_save_during_slow_load_waits_for_it() {
    let gate = Arc::new(Notify::new());
    let endpoint = Scripted {
        fetch_gate: Some(Arc::clone(&gate)),
        ..Scripted::serving(document_with_articles(2))
    };
    let h = harness(endpoint);

    let gateway = h.gateway.clone();
    let load = tokio::spawn(async move { gateway.load().await });
    tokio::task::yield_now().await;

    let gateway = h.gateway.clone();
    let save = tokio::spawn(async move { gateway.save().await });
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    assert!(h.endpoint.log().is_empty(), "no request may complete before the load");

    gate.notify_one();
    assert!(load.await.unwrap().is_loaded());
    assert!(save.await.unwrap().is_saved());
    assert_eq!(h.endpoint.log(), vec!["GET", "POST"]);
    // The save carried the loaded data, not the defaults.
    assert_eq!(h.endpoint.posts()[0]["articles"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_save_omits_ephemeral_fields() {
    let h = harness(MemoryEndpoint::new());
    h.gateway.load().await;
    h.store.set(StateValue::Probability(Probability::new(50).unwrap()));
    h.store.concepts().toggle_selection("symbols");
    h.store.confessions().add_points(2.0);

    assert!(h.gateway.save().await.is_saved());
    let stored = h.endpoint.document().unwrap();
    assert!(stored.get("probability").is_none());
    assert!(stored.get("selectedConcepts").is_none());
    assert_eq!(stored["pointsAccumulated"], json!(2.0));
    assert!(stored["lastSaved"].is_string());
}

#[tokio::test]
async fn test_wipe_guard_blocks_then_force_saves() {
    let h = harness(Scripted::serving(document_with_articles(3)));
    h.gateway.load().await;
    h.store.set(StateValue::Articles(vec![]));

    match h.gateway.save().await {
        SaveOutcome::Blocked(PersistenceError::SuspiciousWipe { previous_articles: 3 }) => {}
        other => panic!("unexpected {other:?}"),
    }
    assert!(h.endpoint.posts().is_empty());
    assert_eq!(h.notices.last().unwrap().kind, NoticeKind::Warning);

    assert!(h.gateway.save_forced().await.is_saved());
    assert_eq!(h.endpoint.posts().len(), 1);
    // The empty list is now the baseline.
    assert!(h.gateway.save().await.is_saved());
}

#[tokio::test]
async fn test_saves_during_a_save_are_coalesced() {
    let gate = Arc::new(Notify::new());
    let endpoint = Scripted {
        post_gate: Some(Arc::clone(&gate)),
        ..Scripted::serving(document_with_articles(1))
    };
    let h = harness(endpoint);
    h.gateway.load().await;

    let gateway = h.gateway.clone();
    let first = tokio::spawn(async move { gateway.save().await });
    tokio::task::yield_now().await;
    assert!(h.gateway.is_saving());

    h.store.confessions().add_points(1.0);
    assert!(matches!(h.gateway.save().await, SaveOutcome::Coalesced));
    assert!(matches!(h.gateway.save().await, SaveOutcome::Coalesced));

    gate.notify_one();
    tokio::task::yield_now().await;
    gate.notify_one();
    assert!(first.await.unwrap().is_saved());

    let posts = h.endpoint.posts();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[1]["pointsAccumulated"], json!(8.0));
    assert!(!h.gateway.is_saving());
}

// =============================================================================
// Autosave
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_autosave_burst_produces_one_post() {
    let h = harness(MemoryEndpoint::new());
    let _autosave = h.gateway.attach_auto_save();
    h.gateway.load().await;

    for i in 0..10 {
        h.store.concepts().add(format!("concept {i}"));
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    assert_eq!(h.endpoint.replace_count(), 0);
    assert!(h.gateway.has_unsaved_changes());

    tokio::time::sleep(Duration::from_millis(3100)).await;
    assert_eq!(h.endpoint.replace_count(), 1);
    assert!(!h.gateway.has_unsaved_changes());

    let stored = h.endpoint.document().unwrap();
    assert_eq!(stored["concepts"].as_array().unwrap().len(), 16);
}

#[tokio::test(start_paused = true)]
async fn test_spaced_changes_each_save() {
    let h = harness(MemoryEndpoint::new());
    let _autosave = h.gateway.attach_auto_save();
    h.gateway.load().await;

    for _ in 0..3 {
        h.store.confessions().add_points(1.0);
        tokio::time::sleep(Duration::from_millis(3500)).await;
    }
    assert_eq!(h.endpoint.replace_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_load_and_ui_state_do_not_schedule_saves() {
    let h = harness(MemoryEndpoint::new());
    let _autosave = h.gateway.attach_auto_save();

    h.gateway.load().await;
    h.store.set(StateValue::Probability(Probability::new(40).unwrap()));
    h.store.concepts().toggle_selection("symbols");
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(h.endpoint.replace_count(), 0);
    assert!(!h.gateway.autosave_pending());
}

#[tokio::test(start_paused = true)]
async fn test_unsubscribed_autosave_stops() {
    let h = harness(MemoryEndpoint::new());
    let autosave = h.gateway.attach_auto_save();
    h.gateway.load().await;
    assert!(autosave.unsubscribe());

    h.store.confessions().add_points(1.0);
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(h.endpoint.replace_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_flush_saves_pending_changes_now() {
    let h = harness(MemoryEndpoint::new());
    let _autosave = h.gateway.attach_auto_save();
    h.gateway.load().await;
    assert!(h.gateway.flush().await.is_none());

    h.store.confessions().add_points(4.0);
    assert!(h.gateway.autosave_pending());

    let outcome = h.gateway.flush().await.unwrap();
    assert!(outcome.is_saved());
    assert!(!h.gateway.autosave_pending());

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(h.endpoint.replace_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_disabled_autosave_never_fires() {
    let store = Store::new();
    let endpoint = Arc::new(MemoryEndpoint::new());
    let gateway = PersistenceGateway::new(
        store.clone(),
        Arc::clone(&endpoint) as Arc<dyn RemoteEndpoint>,
        Arc::new(NoticeLog::new()),
        AutoSaveConfig::disabled(),
    );
    let _autosave = gateway.attach_auto_save();
    gateway.load().await;

    store.confessions().add_points(1.0);
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(endpoint.replace_count(), 0);
    assert!(gateway.has_unsaved_changes());
}

#[tokio::test]
async fn test_flush_waits_for_running_save_and_saves_the_rest() {
    let gate = Arc::new(Notify::new());
    let endpoint = Scripted {
        post_gate: Some(Arc::clone(&gate)),
        ..Scripted::serving(document_with_articles(1))
    };
    let h = harness(endpoint);
    let _autosave = h.gateway.attach_auto_save();
    h.gateway.load().await;

    let gateway = h.gateway.clone();
    let running = tokio::spawn(async move { gateway.save().await });
    tokio::task::yield_now().await;
    assert!(h.gateway.is_saving());

    h.store.confessions().add_points(1.0);
    let gateway = h.gateway.clone();
    let flush = tokio::spawn(async move { gateway.flush().await });
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    assert!(!flush.is_finished());
    assert!(h.endpoint.posts().is_empty());

    gate.notify_one();
    assert!(running.await.unwrap().is_saved());
    gate.notify_one();
    let outcome = flush.await.unwrap();
    assert!(outcome.is_some_and(|outcome| outcome.is_saved()));

    let posts = h.endpoint.posts();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["pointsAccumulated"], json!(7.0));
    assert_eq!(posts[1]["pointsAccumulated"], json!(8.0));
    assert!(!h.gateway.is_saving());
    assert!(!h.gateway.has_unsaved_changes());
}

// =============================================================================
// Diagnostics
// =============================================================================

#[tokio::test]
async fn test_connection_report() {
    let endpoint = Scripted::default();
    endpoint.push_fetch(Ok(RawResponse {
        status: 200,
        content_type: Some("text/plain".into()),
        body: "<?php echo 'hi'; ?>".into(),
    }));
    let h = harness(endpoint);

    let report = h.gateway.test_connection().await;
    assert_eq!(report, ConnectionReport::PhpNotExecuting { status: 200 });
    assert_eq!(h.notices.last().unwrap().kind, NoticeKind::Error);
    assert!(!h.store.data_loaded());

    let report = h.gateway.test_connection().await;
    assert!(report.is_ok());
}

#[tokio::test]
async fn test_store_key_is_untouched_by_diagnostics() {
    let h = harness(MemoryEndpoint::new());
    h.gateway.test_connection().await;
    assert_eq!(
        h.store.get(StateKey::Articles),
        StateValue::Articles(Vec::new())
    );
}
