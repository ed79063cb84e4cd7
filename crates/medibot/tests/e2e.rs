// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the webhook pipeline.
//!
//! Requests go through the real axum router in-process. Most tests use mock
//! collaborators; the last ones wire the real gateway client, remote
//! retriever and SQLite directory against wiremock servers and a temp file.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use medibot_config::model::{GatewayConfig, GatewayFlavor, HandlerConfig};
use medibot_core::{DeliveryError, UserDirectory};
use medibot_gateway::{GatewayState, WebhookHandler, build_router, replies};
use medibot_rag::RemoteRetriever;
use medibot_storage::SqliteUserDirectory;
use medibot_test_utils::{MockMessenger, MockRetriever, Scripted};
use medibot_whatsapp::GatewayMessenger;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SENDER: &str = "2348012345678@s.whatsapp.net";

fn wasender_event(text: &str) -> Value {
    json!({
        "event": "messages.received",
        "data": { "messages": {
            "key": { "id": "3EB0C4", "fromMe": false, "remoteJid": SENDER },
            "pushName": "Ada",
            "message": { "conversation": text }
        } }
    })
}

fn app(
    messenger: Arc<MockMessenger>,
    retriever: Arc<MockRetriever>,
    config: HandlerConfig,
) -> Router {
    let handler = WebhookHandler::new(messenger, retriever, config);
    build_router(GatewayState::new(handler), "/webhook")
}

async fn deliver(app: &Router, payload: &Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::post("/webhook")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ---- Scenario 1: greeting ----

#[tokio::test]
async fn greeting_gets_welcome_message() {
    let messenger = Arc::new(MockMessenger::new());
    let app = app(messenger.clone(), Arc::new(MockRetriever::new()), HandlerConfig::default());

    let (status, body) = deliver(&app, &wasender_event("hello")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let sent = messenger.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, SENDER);
    assert!(sent[0].text.contains("Hello Ada!"));
}

// ---- Scenario 2: medical question answered ----

#[tokio::test]
async fn medical_question_gets_rag_answer() {
    let messenger = Arc::new(MockMessenger::new());
    let retriever = Arc::new(MockRetriever::answering(
        "Rest and hydrate; see a doctor if fever persists.",
    ));
    let app = app(messenger.clone(), retriever.clone(), HandlerConfig::default());

    let (status, body) =
        deliver(&app, &wasender_event("I have a fever and cough, what should I do?")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(
        retriever.questions().await,
        vec!["I have a fever and cough, what should I do?"]
    );

    let sent = messenger.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, "Rest and hydrate; see a doctor if fever persists.");
}

// ---- Scenario 3: non-medical message, both policies ----

#[tokio::test]
async fn non_medical_message_is_rejected_politely() {
    let messenger = Arc::new(MockMessenger::new());
    let app = app(messenger.clone(), Arc::new(MockRetriever::new()), HandlerConfig::default());

    let (status, body) = deliver(&app, &wasender_event("what's the weather")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ignored");
    assert_eq!(messenger.sent_messages().await[0].text, replies::REJECTION);
}

#[tokio::test]
async fn non_medical_message_is_silently_ignored_when_configured() {
    let messenger = Arc::new(MockMessenger::new());
    let config = HandlerConfig {
        reject_non_medical: false,
        ..HandlerConfig::default()
    };
    let app = app(messenger.clone(), Arc::new(MockRetriever::new()), config);

    let (status, body) = deliver(&app, &wasender_event("what's the weather")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ignored");
    assert_eq!(messenger.sent_count().await, 0);
}

// ---- Scenario 4: retrieval failure ----

#[tokio::test]
async fn retrieval_failure_sends_single_maintenance_notice() {
    let messenger = Arc::new(MockMessenger::new());
    let retriever = Arc::new(MockRetriever::failing("connection refused"));
    let app = app(messenger.clone(), retriever, HandlerConfig::default());

    let (status, body) = deliver(&app, &wasender_event("symptoms of malaria")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");

    let sent = messenger.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, replies::MAINTENANCE);
}

#[tokio::test]
async fn failed_maintenance_notice_still_acknowledged() {
    let messenger = Arc::new(MockMessenger::failing(DeliveryError::Http {
        status: 401,
        body: "session logged out".into(),
    }));
    let retriever = Arc::new(MockRetriever::failing("timeout"));
    let app = app(messenger.clone(), retriever, HandlerConfig::default());

    let (status, body) = deliver(&app, &wasender_event("symptoms of malaria")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert_eq!(messenger.sent_count().await, 1);
}

#[tokio::test]
async fn panicking_retriever_still_acknowledged() {
    let messenger = Arc::new(MockMessenger::new());
    let retriever = Arc::new(MockRetriever::with_script(vec![Scripted::Panic("bug".into())]));
    let app = app(messenger.clone(), retriever, HandlerConfig::default());

    let (status, body) = deliver(&app, &wasender_event("symptoms of malaria")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert_eq!(messenger.sent_messages().await[0].text, replies::GENERIC_ERROR);
}

// ---- Ignorable input ----

#[tokio::test]
async fn ignorable_events_send_nothing() {
    let messenger = Arc::new(MockMessenger::new());
    let retriever = Arc::new(MockRetriever::new());
    let app = app(messenger.clone(), retriever.clone(), HandlerConfig::default());

    let payloads = [
        json!({ "event": "messages.update", "data": { "messages": {} } }),
        json!({ "event": "messages.received", "data": {} }),
        json!({ "event": "messages.received", "data": { "messages": {
            "key": { "fromMe": true, "remoteJid": SENDER },
            "message": { "conversation": "I have a fever" }
        } } }),
        json!({ "event": "messages.received", "data": { "messages": {
            "key": { "remoteJid": "120363040000000000@g.us" },
            "message": { "conversation": "hello" }
        } } }),
        json!({ "event": "messages.received", "data": { "messages": {
            "key": { "remoteJid": SENDER },
            "message": { "stickerMessage": {} }
        } } }),
    ];

    for payload in &payloads {
        let (status, body) = deliver(&app, payload).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ignored", "payload: {payload}");
    }
    assert_eq!(messenger.sent_count().await, 0);
    assert_eq!(retriever.call_count().await, 0);
}

#[tokio::test]
async fn whapi_self_message_sends_nothing() {
    let messenger = Arc::new(MockMessenger::new());
    let retriever = Arc::new(MockRetriever::new());
    let app = app(messenger.clone(), retriever.clone(), HandlerConfig::default());

    for text in ["hello", "What causes high blood pressure?"] {
        let payload = json!({
            "event": { "type": "messages", "event": "post" },
            "messages": [{
                "id": "wamid.self",
                "from_me": true,
                "chat_id": SENDER,
                "text": { "body": text }
            }]
        });
        let (status, body) = deliver(&app, &payload).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ignored", "reason": "self" }));
    }
    assert_eq!(messenger.sent_count().await, 0);
    assert_eq!(retriever.call_count().await, 0);
}

// ---- No deduplication ----

#[tokio::test]
async fn redelivered_payload_replies_again() {
    let messenger = Arc::new(MockMessenger::new());
    let app = app(messenger.clone(), Arc::new(MockRetriever::new()), HandlerConfig::default());

    let payload = wasender_event("hi");
    deliver(&app, &payload).await;
    deliver(&app, &payload).await;
    assert_eq!(messenger.sent_count().await, 2);
}

// ---- Real collaborators over HTTP ----

#[tokio::test]
async fn whapi_payload_through_real_clients() {
    let gateway = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages/text"))
        .and(body_json(json!({
            "to": SENDER,
            "body": "Malaria spreads through mosquito bites.",
            "typing_time": 0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sent": true })))
        .expect(1)
        .mount(&gateway)
        .await;

    let rag = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .and(body_json(json!({ "question": "How is malaria spread?" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("Malaria spreads through mosquito bites."),
        )
        .expect(1)
        .mount(&rag)
        .await;

    let messenger = GatewayMessenger::from_config(&GatewayConfig {
        api_url: Some(gateway.uri()),
        token: Some("test-token".into()),
        flavor: GatewayFlavor::Whapi,
        ..GatewayConfig::default()
    })
    .unwrap();
    let retriever = RemoteRetriever::new(format!("{}/ask", rag.uri())).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let directory = Arc::new(
        SqliteUserDirectory::open(&format!("sqlite://{}", dir.path().join("users.db").display()))
            .await
            .unwrap(),
    );

    let handler =
        WebhookHandler::new(Arc::new(messenger), Arc::new(retriever), HandlerConfig::default())
            .with_directory(directory.clone());
    let app = build_router(GatewayState::new(handler), "/webhook");

    let payload = json!({
        "event": { "type": "messages", "event": "post" },
        "messages": [{
            "id": "wamid.HBgN",
            "from_me": false,
            "type": "text",
            "chat_id": SENDER,
            "from": "2348012345678",
            "from_name": "Chinedu",
            "text": { "body": "How is malaria spread?" }
        }]
    });
    let (status, body) = deliver(&app, &payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "reason": "answer sent" }));

    let user = directory.get_user("2348012345678").await.unwrap().unwrap();
    assert_eq!(user.display_name.as_deref(), Some("Chinedu"));
    assert_eq!(user.message_count, 1);
}

#[tokio::test]
async fn expired_gateway_session_is_reported_as_error() {
    let gateway = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("{\"error\":\"session expired\"}"))
        .expect(1)
        .mount(&gateway)
        .await;

    let messenger = GatewayMessenger::from_config(&GatewayConfig {
        api_url: Some(gateway.uri()),
        token: Some("stale".into()),
        ..GatewayConfig::default()
    })
    .unwrap();
    let handler = WebhookHandler::new(
        Arc::new(messenger),
        Arc::new(MockRetriever::new()),
        HandlerConfig::default(),
    );
    let app = build_router(GatewayState::new(handler), "/webhook");

    let (status, body) = deliver(&app, &wasender_event("hello")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
}
