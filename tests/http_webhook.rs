//! Integration tests for the reqwest webhook transport.
//!
//! Each test spins up an Axum server on a random port that records what it
//! receives, then drives `HttpWebhook` against it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Json;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use vision_assess::config::AssessmentConfig;
use vision_assess::error::SubmissionError;
use vision_assess::submission::{HttpWebhook, Webhook, WebhookRequest};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

const SLOW_ROUTE_DELAY: Duration = Duration::from_millis(200);

#[derive(Clone, Default)]
struct Received {
    requests: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
}

impl Received {
    fn snapshot(&self) -> Vec<(HeaderMap, Value)> {
        self.requests.lock().unwrap().clone()
    }
}

async fn record(
    State(received): State<Received>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    received.requests.lock().unwrap().push((headers, body));
    Json(json!({ "message": "Custom result" }))
}

/// Records the body only after a delay, so a caller that gives up early
/// cannot have seen it land.
async fn record_slowly(
    State(received): State<Received>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    tokio::time::sleep(SLOW_ROUTE_DELAY).await;
    received.requests.lock().unwrap().push((headers, body));
    Json(json!({ "message": "Late result" }))
}

async fn unavailable() -> StatusCode {
    StatusCode::SERVICE_UNAVAILABLE
}

/// Start an Axum server on a random port, return (base url, received log).
async fn start_server() -> (String, Received) {
    let received = Received::default();
    let app = Router::new()
        .route("/hook", post(record))
        .route("/slow", post(record_slowly))
        .route("/down", post(unavailable))
        .with_state(received.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (format!("http://127.0.0.1:{port}"), received)
}

fn webhook() -> HttpWebhook {
    HttpWebhook::new(&AssessmentConfig::default()).unwrap()
}

#[tokio::test]
async fn standard_send_posts_json_with_extra_headers() {
    let (base, received) = start_server().await;
    let request = WebhookRequest::new(format!("{base}/hook"), json!({ "path": "DryEye" }));

    let reply = timeout(TEST_TIMEOUT, webhook().send(request))
        .await
        .expect("send timed out")
        .unwrap();

    let reply: Value = serde_json::from_str(&reply).unwrap();
    assert_eq!(reply["message"], "Custom result");

    let requests = received.snapshot();
    assert_eq!(requests.len(), 1);
    let (headers, body) = &requests[0];
    assert_eq!(body["path"], "DryEye");
    assert_eq!(headers["content-type"], "application/json");
    assert_eq!(headers["ngrok-skip-browser-warning"], "true");
}

#[tokio::test]
async fn keep_alive_send_still_returns_the_reply() {
    let (base, received) = start_server().await;
    let request = WebhookRequest::new(format!("{base}/hook"), json!({ "stage": "phone_captured" }))
        .keep_alive();

    let reply = timeout(TEST_TIMEOUT, webhook().send(request))
        .await
        .expect("send timed out")
        .unwrap();

    assert!(reply.contains("Custom result"));
    assert_eq!(received.snapshot()[0].1["stage"], "phone_captured");
}

#[tokio::test]
async fn keep_alive_send_survives_a_dropped_caller() {
    let (base, received) = start_server().await;
    let request = WebhookRequest::new(format!("{base}/slow"), json!({ "stage": "phone_captured" }))
        .keep_alive();

    // The caller gives up long before the server answers.
    let abandoned = timeout(Duration::from_millis(20), webhook().send(request)).await;
    assert!(abandoned.is_err(), "slow route answered within 20ms");
    assert!(received.snapshot().is_empty());

    let delivered = timeout(TEST_TIMEOUT, async {
        loop {
            if let Some((_, body)) = received.snapshot().into_iter().next() {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("keep-alive request was abandoned with its caller");

    assert_eq!(delivered["stage"], "phone_captured");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let (base, _received) = start_server().await;
    let request = WebhookRequest::new(format!("{base}/down"), json!({}));

    let err = timeout(TEST_TIMEOUT, webhook().send(request))
        .await
        .expect("send timed out")
        .unwrap_err();

    assert!(matches!(err, SubmissionError::Status { status: 503, .. }));
}

#[tokio::test]
async fn unreachable_host_is_request_failure() {
    // Bind then drop to get a port nobody listens on.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };
    let request = WebhookRequest::new(format!("http://127.0.0.1:{port}/hook"), json!({}));

    let err = timeout(TEST_TIMEOUT, webhook().send(request))
        .await
        .expect("send timed out")
        .unwrap_err();

    assert!(matches!(err, SubmissionError::RequestFailed { .. }));
}

#[tokio::test]
async fn beacon_returns_immediately_and_is_delivered() {
    let (base, received) = start_server().await;

    webhook()
        .beacon(&format!("{base}/hook"), json!({ "intent": "abandon_nurture" }))
        .unwrap();

    let delivered = timeout(TEST_TIMEOUT, async {
        loop {
            if let Some((_, body)) = received.snapshot().into_iter().next() {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("beacon never arrived");

    assert_eq!(delivered["intent"], "abandon_nurture");
}
