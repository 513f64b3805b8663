//! Integration tests for [`botkit_telegram::TelegramGateway`] against a mock Bot API server.
//!
//! teloxide and raw calls both hit `/bot<token>/<method>` on the server URL; method names are
//! matched case-insensitively.

use std::sync::Arc;
use std::time::Duration;

use bot_runtime::Client;
use botkit_core::{
    BotError, Button, Callback, Gateway, IncomingKind, IncomingMessage, Markup, OutgoingMessage,
};
use botkit_telegram::{dispatch_update, TelegramGateway};
use handler_chain::{handler_fn, HandlerChain, HandlerTable};
use mockito::Matcher;

const TEST_BOT_TOKEN: &str = "test_bot_token_12345";

const MESSAGE_BODY: &str = r#"{
    "ok": true,
    "result": {
        "message_id": 42,
        "date": 1706529600,
        "chat": {"id": 123, "type": "private", "first_name": "Test"},
        "from": {"id": 123456789, "is_bot": true, "first_name": "TestBot", "username": "testbot"},
        "text": "hi"
    }
}"#;

fn method_path(method: &str) -> Matcher {
    Matcher::Regex(format!("(?i)^/bot{}/{}$", TEST_BOT_TOKEN, method))
}

fn gateway_for(server: &mockito::ServerGuard) -> TelegramGateway {
    TelegramGateway::new(TEST_BOT_TOKEN).with_api_url(server.url().parse().unwrap())
}

/// **Test: a text message with a keyboard is sent and the platform id returned.**
#[tokio::test]
async fn test_send_message_returns_platform_id() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", method_path("sendMessage"))
        .match_body(Matcher::Regex("callback_data".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(MESSAGE_BODY)
        .create_async()
        .await;
    let gateway = gateway_for(&server);

    let message = OutgoingMessage::text(123, 1, "hi").with_markup(
        Markup::new().row(vec![Button::callback("Buy", &Callback::new("buy", "42", 7))]),
    );
    let id = gateway.send_message(&message).await.unwrap();

    assert_eq!(id, 42);
    mock.assert_async().await;
}

/// **Test: edits return the edited message id.**
#[tokio::test]
async fn test_edit_message() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", method_path("editMessageText"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(MESSAGE_BODY)
        .create_async()
        .await;
    let gateway = gateway_for(&server);

    let message = OutgoingMessage::edit(123, 1, 42, "updated");
    assert_eq!(gateway.edit_message(&message, 42).await.unwrap(), 42);
    mock.assert_async().await;
}

/// **Test: a platform error on delete surfaces as an error.**
#[tokio::test]
async fn test_delete_message_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", method_path("deleteMessage"))
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": false, "error_code": 400, "description": "Bad Request: message to delete not found"}"#)
        .create_async()
        .await;
    let gateway = gateway_for(&server);

    assert!(gateway.delete_message(123, 42).await.is_err());
}

/// **Test: file ids resolve to `<api>/file/bot<token>/<file_path>`.**
#[tokio::test]
async fn test_file_url() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", method_path("getFile"))
        .match_body(Matcher::UrlEncoded("file_id".to_string(), "abc".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": true, "result": {"file_id": "abc", "file_unique_id": "u1", "file_size": 3, "file_path": "photos/a.jpg"}}"#)
        .create_async()
        .await;
    let gateway = gateway_for(&server);

    let url = gateway.file_url("abc").await.unwrap();

    assert_eq!(
        url,
        format!("{}/file/bot{}/photos/a.jpg", server.url(), TEST_BOT_TOKEN)
    );
}

/// **Test: a non-OK raw response is returned as-is; `into_result` turns it into an API error.**
#[tokio::test]
async fn test_raw_request_not_ok() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", method_path("sendInvoice"))
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": false, "error_code": 400, "description": "Bad Request: chat not found"}"#)
        .create_async()
        .await;
    let gateway = gateway_for(&server);

    let params = vec![("chat_id".to_string(), "123".to_string())];
    let response = gateway.raw_request("sendInvoice", &params).await.unwrap();

    assert!(!response.ok);
    match response.into_result() {
        Err(BotError::Api(description)) => assert_eq!(description, "Bad Request: chat not found"),
        other => panic!("expected api error, got {other:?}"),
    }
}

/// **Test: polling decodes updates into the raw model and skips ones that do not decode.**
#[tokio::test]
async fn test_updates_skip_undecodable() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", method_path("getUpdates"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"ok": true, "result": [
                {"update_id": 7, "message": {"message_id": "not-a-number"}},
                {"update_id": 8, "message": {
                    "message_id": 10,
                    "date": 1706529600,
                    "chat": {"id": 456, "type": "private"},
                    "from": {"id": 123, "is_bot": false, "first_name": "Test"},
                    "text": "/start"
                }}
            ]}"#,
        )
        .create_async()
        .await;
    let gateway = gateway_for(&server);

    let mut updates = gateway.updates(0).await.unwrap();
    let first = tokio::time::timeout(Duration::from_secs(5), updates.recv())
        .await
        .expect("update received")
        .expect("stream open");

    assert_eq!(first.update_id, 8);
    let message = first.message.expect("message");
    assert_eq!(message.chat_id(), 456);
    assert_eq!(message.text.as_deref(), Some("/start"));
}

/// **Test: a teloxide update fed in directly is classified, routed and answered.**
#[tokio::test]
async fn test_dispatch_update_from_teloxide() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", method_path("sendMessage"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(MESSAGE_BODY)
        .create_async()
        .await;
    let table = HandlerTable::new().on_message(handler_fn(|msg: IncomingMessage| async move {
        vec![OutgoingMessage::reply(&msg, "hi")]
    }));
    let client = Client::new(Arc::new(gateway_for(&server)), HandlerChain::new(table));

    let update: teloxide::types::Update = serde_json::from_str(
        r#"{
            "update_id": 3,
            "message": {
                "message_id": 10,
                "date": 1706529600,
                "chat": {"id": 123, "type": "private", "first_name": "Test"},
                "from": {"id": 77, "is_bot": false, "first_name": "Test"},
                "text": "hello"
            }
        }"#,
    )
    .unwrap();

    let dispatch = dispatch_update(&client, &update).await.unwrap();

    assert_eq!(dispatch.message.kind, IncomingKind::Text);
    assert_eq!(dispatch.message.user_id, 77);
    assert_eq!(dispatch.failed, 0);
    assert_eq!(dispatch.sent[0].id, 42);
    mock.assert_async().await;
}
