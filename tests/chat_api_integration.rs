//! Integration tests for the chat REST API.
//!
//! Each test spins up an Axum server on a random port with an in-memory
//! database and a recording notification sink, then exercises the real
//! HTTP contract with a `reqwest` client.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use food_assist::api::{AppState, chat_routes, cors_layer};
use food_assist::error::WebhookError;
use food_assist::flow::ConversationFlow;
use food_assist::store::{LibSqlBackend, SessionStore};
use food_assist::webhook::{IntakePayload, NotificationSink};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Sink that records every payload instead of calling out over HTTP.
#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<IntakePayload>>,
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify(&self, payload: &IntakePayload) -> Result<(), WebhookError> {
        self.sent.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

/// Start a server on a random port, return (base_url, sink).
async fn start_server() -> (String, Arc<RecordingSink>) {
    let store: Arc<dyn SessionStore> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
    let sink = Arc::new(RecordingSink::default());
    let flow = Arc::new(ConversationFlow::new(
        Arc::clone(&store),
        Arc::clone(&sink) as Arc<dyn NotificationSink>,
    ));

    let app = chat_routes(
        AppState { flow, store },
        cors_layer(&["http://localhost:5173".to_string()]),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (format!("http://127.0.0.1:{port}"), sink)
}

/// POST /chat and return the parsed JSON body.
async fn send_chat(base: &str, message: &str, session_id: Option<&str>) -> Value {
    let client = reqwest::Client::new();
    let body = match session_id {
        Some(id) => json!({"message": message, "session_id": id}),
        None => json!({"message": message}),
    };

    let response = client
        .post(format!("{base}/chat"))
        .json(&body)
        .send()
        .await
        .expect("chat request failed");
    assert!(response.status().is_success());
    response.json().await.expect("invalid JSON from server")
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    timeout(TEST_TIMEOUT, async {
        let (base, _sink) = start_server().await;

        let body: Value = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "food-assist");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn first_message_mints_a_session_id() {
    timeout(TEST_TIMEOUT, async {
        let (base, _sink) = start_server().await;

        let body = send_chat(&base, "hello, I could use some help", None).await;

        let session_id = body["session_id"].as_str().unwrap();
        assert!(!session_id.is_empty());
        assert!(body["response"].as_str().unwrap().contains("your name"));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn full_intake_over_http() {
    timeout(TEST_TIMEOUT, async {
        let (base, sink) = start_server().await;

        let body = send_chat(&base, "I need emergency food, no food available", None).await;
        let sid = body["session_id"].as_str().unwrap().to_string();
        assert!(
            body["response"]
                .as_str()
                .unwrap()
                .contains("Emergency Food Aid")
        );

        let body = send_chat(&base, "My name is Ana", Some(&sid)).await;
        assert_eq!(body["session_id"], sid.as_str());
        assert!(body["response"].as_str().unwrap().contains("your age"));

        let body = send_chat(&base, "I'm 34 years old", Some(&sid)).await;
        assert!(
            body["response"]
                .as_str()
                .unwrap()
                .contains("food assistance needs")
        );

        let body = send_chat(
            &base,
            "I need help for my family of 5 after the flood",
            Some(&sid),
        )
        .await;
        assert!(
            body["response"]
                .as_str()
                .unwrap()
                .contains("registered your request")
        );

        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].beneficiary_name, "Ana");
        assert_eq!(sent[0].beneficiary_age, 34);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn session_status_endpoint() {
    timeout(TEST_TIMEOUT, async {
        let (base, _sink) = start_server().await;
        let client = reqwest::Client::new();

        // Unknown session is a 404.
        let response = client
            .get(format!("{base}/api/sessions/missing"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 404);

        // After two turns, the status reflects the collected fields.
        let body = send_chat(&base, "we are starving, please help us", None).await;
        let sid = body["session_id"].as_str().unwrap().to_string();
        send_chat(&base, "My name is Ana", Some(&sid)).await;

        let status: Value = client
            .get(format!("{base}/api/sessions/{sid}"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(status["session_id"], sid.as_str());
        assert_eq!(status["program"], "emergency_food_aid");
        assert_eq!(status["beneficiary_name"], "Ana");
        assert_eq!(status["beneficiary_age"], Value::Null);
        assert_eq!(status["intake_complete"], false);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn sessions_are_independent() {
    timeout(TEST_TIMEOUT, async {
        let (base, _sink) = start_server().await;

        let a = send_chat(&base, "no food available here", None).await;
        let b = send_chat(&base, "advice on child nutrition please", None).await;

        let sid_a = a["session_id"].as_str().unwrap();
        let sid_b = b["session_id"].as_str().unwrap();
        assert_ne!(sid_a, sid_b);

        assert!(a["response"].as_str().unwrap().contains("Emergency Food Aid"));
        assert!(
            b["response"]
                .as_str()
                .unwrap()
                .contains("Nutrition Support Program")
        );
    })
    .await
    .expect("test timed out");
}
