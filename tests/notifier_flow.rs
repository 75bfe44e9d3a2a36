use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use eventbell::config::Config;
use eventbell::error::{AppResult, Error};
use eventbell::handlers::run_handler;
use eventbell::notifier::run_notification_pass;
use eventbell::slack::MessageSender;
use eventbell::startup::AppState;
use eventbell::store::{EventRow, EventStore};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

fn test_config() -> Config {
    Config {
        db_host: "localhost".to_string(),
        db_database: "scheduler".to_string(),
        db_username: "eventbell".to_string(),
        db_password: String::new(),
        db_port: 3306,
        port: 3000,
        lead_minutes: 15,
        utc_offset_hours: 9,
    }
}

fn event_at(start: NaiveDateTime, summary: &str) -> EventRow {
    EventRow {
        summary: summary.to_string(),
        link: format!("https://cal.example/ev/{}", summary.len()),
        start_time: start,
        end_time: start + chrono::Duration::hours(1),
    }
}

/// Scripted store: a fixed target minute with per-user rows, plus an
/// optional connectivity failure
#[derive(Default)]
struct ScriptedStore {
    target: String,
    users: Vec<String>,
    tokens: HashMap<String, String>,
    channels: HashMap<String, String>,
    events: HashMap<String, EventRow>,
    broken: bool,
}

impl ScriptedStore {
    fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            ..Default::default()
        }
    }

    fn add_user(&mut self, user_id: &str, channel: &str, event: EventRow) {
        self.users.push(user_id.to_string());
        self.tokens
            .insert(user_id.to_string(), format!("xoxb-{}", user_id));
        self.channels.insert(user_id.to_string(), channel.to_string());
        self.events.insert(user_id.to_string(), event);
    }
}

#[async_trait]
impl EventStore for ScriptedStore {
    async fn any_event_starting_at(&self, target: &str) -> AppResult<bool> {
        if self.broken {
            return Err(Error::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(target == self.target && !self.users.is_empty())
    }

    async fn users_with_event_at(&self, target: &str) -> AppResult<Vec<String>> {
        if target == self.target {
            Ok(self.users.clone())
        } else {
            Ok(Vec::new())
        }
    }

    async fn bot_token_for_user(&self, user_id: &str) -> AppResult<String> {
        self.tokens.get(user_id).cloned().ok_or_else(|| Error::MissingRow {
            table: "slacks",
            user: user_id.to_string(),
        })
    }

    async fn event_for_user_at(&self, user_id: &str, _target: &str) -> AppResult<EventRow> {
        self.events.get(user_id).cloned().ok_or_else(|| Error::MissingRow {
            table: "events",
            user: user_id.to_string(),
        })
    }

    async fn channel_for_user(&self, user_id: &str) -> AppResult<String> {
        self.channels.get(user_id).cloned().ok_or_else(|| Error::MissingRow {
            table: "webhooks",
            user: user_id.to_string(),
        })
    }
}

/// Recording sender, optionally failing for one channel
struct MockSender {
    sent: Mutex<Vec<(String, Value)>>,
    fail_channel: Option<String>,
}

impl MockSender {
    fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_channel: None,
        }
    }

    fn failing_for(channel: &str) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_channel: Some(channel.to_string()),
        }
    }
}

#[async_trait]
impl MessageSender for MockSender {
    async fn send(&self, bot_token: &str, payload: &Value) -> AppResult<()> {
        let channel = payload["channel"].as_str().unwrap_or("").to_string();
        if self.fail_channel.as_deref() == Some(channel.as_str()) {
            return Err(Error::SlackApi("chat.postMessage failed: channel_not_found".to_string()));
        }
        let mut sent = self.sent.lock().await;
        sent.push((bot_token.to_string(), payload.clone()));
        Ok(())
    }
}

// 00:45 UTC on the +9 wall clock is 09:45; plus the 15-minute lead the
// target minute is 10:00.
fn now_for_target_10_00() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 45, 0).unwrap()
}

fn ten_oclock() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

#[tokio::test]
async fn no_matching_events_is_a_quiet_success() {
    let store = ScriptedStore::new("2024-06-30 08:00");
    let sender = MockSender::new();

    let attempted = run_notification_pass(&store, &sender, &test_config(), now_for_target_10_00())
        .await
        .expect("pass should succeed");

    assert_eq!(attempted, 0);
    assert!(sender.sent.lock().await.is_empty());
}

#[tokio::test]
async fn each_matching_user_gets_one_message() {
    let mut store = ScriptedStore::new("2024-01-01 10:00");
    store.add_user("U001", "C001", event_at(ten_oclock(), "주간 회의"));
    store.add_user("U002", "C002", event_at(ten_oclock(), "디자인 리뷰"));
    store.add_user("U003", "C003", event_at(ten_oclock(), "면담"));
    let sender = MockSender::new();

    let attempted = run_notification_pass(&store, &sender, &test_config(), now_for_target_10_00())
        .await
        .expect("pass should succeed");

    assert_eq!(attempted, 3);
    let sent = sender.sent.lock().await;
    assert_eq!(sent.len(), 3);

    // Sequential loop preserves user order, and each message is addressed
    // with that user's own token and channel
    assert_eq!(sent[0].0, "xoxb-U001");
    assert_eq!(sent[0].1["channel"], "C001");
    assert_eq!(sent[1].1["channel"], "C002");
    assert_eq!(sent[2].1["channel"], "C003");

    // Body carries the formatted start and end times
    let body = sent[0].1["attachments"][0]["blocks"][1]["text"]["text"]
        .as_str()
        .unwrap();
    assert_eq!(body, "일정 시작 : 10시 00분\n일정 종료 : 11시 00분");
}

#[tokio::test]
async fn one_failed_dispatch_does_not_stop_the_rest() {
    let mut store = ScriptedStore::new("2024-01-01 10:00");
    store.add_user("U001", "C001", event_at(ten_oclock(), "주간 회의"));
    store.add_user("U002", "C002", event_at(ten_oclock(), "디자인 리뷰"));
    let sender = MockSender::failing_for("C001");

    let attempted = run_notification_pass(&store, &sender, &test_config(), now_for_target_10_00())
        .await
        .expect("a dispatch failure must not fail the pass");

    // Both dispatches were attempted, only the second was delivered
    assert_eq!(attempted, 2);
    let sent = sender.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1["channel"], "C002");
}

#[tokio::test]
async fn store_failure_aborts_the_pass() {
    let mut store = ScriptedStore::new("2024-01-01 10:00");
    store.add_user("U001", "C001", event_at(ten_oclock(), "주간 회의"));
    store.broken = true;
    let sender = MockSender::new();

    let err = run_notification_pass(&store, &sender, &test_config(), now_for_target_10_00())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Database(_)));
    assert!(!err.to_string().is_empty());
    assert!(sender.sent.lock().await.is_empty());
}

#[tokio::test]
async fn trigger_handler_answers_200_when_nothing_matches() {
    // An empty store never matches the wall-clock target of the handler
    let state = AppState {
        config: test_config(),
        store: Arc::new(ScriptedStore::new("1970-01-01 00:00")),
        sender: Arc::new(MockSender::new()),
    };

    let response = run_handler(State(state)).await.into_response();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn trigger_handler_maps_store_failure_to_500() {
    let mut store = ScriptedStore::new("1970-01-01 00:00");
    store.broken = true;
    let state = AppState {
        config: test_config(),
        store: Arc::new(store),
        sender: Arc::new(MockSender::new()),
    };

    let response = run_handler(State(state)).await.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn missing_channel_row_fails_the_pass() {
    let mut store = ScriptedStore::new("2024-01-01 10:00");
    store.add_user("U001", "C001", event_at(ten_oclock(), "주간 회의"));
    store.add_user("U002", "C002", event_at(ten_oclock(), "디자인 리뷰"));
    store.channels.remove("U002");
    let sender = MockSender::new();

    let err = run_notification_pass(&store, &sender, &test_config(), now_for_target_10_00())
        .await
        .unwrap_err();

    match err {
        Error::MissingRow { table, user } => {
            assert_eq!(table, "webhooks");
            assert_eq!(user, "U002");
        }
        other => panic!("Expected MissingRow, got {:?}", other),
    }

    // The first user was already notified before the pass aborted
    let sent = sender.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1["channel"], "C001");
}
