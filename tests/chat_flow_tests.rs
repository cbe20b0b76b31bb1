//! Chat flow tests against a scripted transport

mod common;

use common::MockTransport;
use omnimind::modes::chat::{ChatMode, EMPTY_REPLY, FAILURE_NOTICE, GREETING};
use omnimind::session::{Role, Turn};
use omnimind::{OmniError, TransportError};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_first_message_sends_no_prior_turns() {
    let transport = Arc::new(MockTransport::new().with_text_reply(Ok("Hi there".into())));
    let chat = ChatMode::new(transport.clone());

    let reply = chat.send("Hello").await.unwrap();
    assert_eq!(reply.content, "Hi there");

    let calls = transport.text_calls.lock();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "Hello");
    assert!(calls[0].1.is_empty());

    let transcript: Vec<(Role, String)> = chat
        .history()
        .all()
        .into_iter()
        .map(|m| (m.role, m.content))
        .collect();
    assert_eq!(
        transcript,
        vec![
            (Role::Assistant, GREETING.to_string()),
            (Role::User, "Hello".to_string()),
            (Role::Assistant, "Hi there".to_string()),
        ]
    );
    assert!(!chat.is_busy());
}

#[tokio::test]
async fn test_follow_up_replays_dialogue() {
    let transport = Arc::new(MockTransport::new().with_text_reply(Ok("Sure".into())));
    let chat = ChatMode::new(transport.clone());

    chat.send("Hello").await.unwrap();
    chat.send("Tell me more").await.unwrap();

    let calls = transport.text_calls.lock();
    assert_eq!(
        calls[1].1,
        vec![
            Turn::new(Role::User, "Hello"),
            Turn::new(Role::Assistant, "Sure"),
        ]
    );
}

#[tokio::test]
async fn test_failure_appends_notice() {
    let transport = Arc::new(
        MockTransport::new().with_text_reply(Err(TransportError::Status {
            status: 401,
            message: "API key not valid".into(),
        })),
    );
    let chat = ChatMode::new(transport.clone());

    let result = chat.send("Hello").await;
    assert!(matches!(
        result,
        Err(OmniError::Transport(TransportError::Status { status: 401, .. }))
    ));

    let messages = chat.history().all();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].content, "Hello");
    assert_eq!(messages[2].content, FAILURE_NOTICE);
    assert!(messages[2].local);
    assert!(!chat.is_busy());

    // The notice never reaches the service
    assert!(chat.prior_turns().iter().all(|t| t.content != FAILURE_NOTICE));
}

#[tokio::test]
async fn test_empty_reply_becomes_local_notice() {
    let transport = Arc::new(MockTransport::new().with_text_reply(Ok("   ".into())));
    let chat = ChatMode::new(transport);

    let reply = chat.send("Hello").await.unwrap();
    assert_eq!(reply.content, EMPTY_REPLY);
    assert!(reply.local);
}

#[tokio::test]
async fn test_blank_input_is_rejected() {
    let transport = Arc::new(MockTransport::new());
    let chat = ChatMode::new(transport.clone());

    assert!(matches!(chat.send("  \n ").await, Err(OmniError::EmptyInput)));
    assert!(transport.text_calls.lock().is_empty());
    assert_eq!(chat.history().len(), 1);
}

#[tokio::test]
async fn test_second_send_while_busy_is_rejected() {
    let transport = Arc::new(
        MockTransport::new()
            .with_text_reply(Ok("Hi there".into()))
            .with_delay(Duration::from_millis(50)),
    );
    let chat = ChatMode::new(transport.clone());

    let (first, second) = futures::future::join(chat.send("Hello"), chat.send("Again")).await;

    assert!(first.is_ok());
    assert!(matches!(second, Err(OmniError::Busy)));
    assert_eq!(transport.text_calls.lock().len(), 1);
    assert_eq!(chat.history().len(), 3);
    assert!(!chat.is_busy());
}

#[tokio::test]
async fn test_busy_while_request_in_flight() {
    let transport = Arc::new(
        MockTransport::new()
            .with_text_reply(Ok("Hi there".into()))
            .with_delay(Duration::from_millis(100)),
    );
    let chat = ChatMode::new(transport);

    let task = tokio::spawn({
        let chat = chat.clone();
        async move { chat.send("Hello").await }
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(chat.is_busy());

    task.await.unwrap().unwrap();
    assert!(!chat.is_busy());
}
