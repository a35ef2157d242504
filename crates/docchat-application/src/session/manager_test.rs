use super::*;
use crate::test_support::MockGateway;
use docchat_core::chat::{ChatSender, ChatSource};
use docchat_core::gateway::AnswerSource;
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;

fn manager() -> (Arc<CategorySessionManager>, Arc<MockGateway>) {
    let gateway = Arc::new(MockGateway::new());
    let manager = Arc::new(CategorySessionManager::new(gateway.clone()));
    (manager, gateway)
}

fn drain(rx: &mut broadcast::Receiver<SessionTransition>) -> Vec<SessionTransition> {
    let mut seen = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(transition) => seen.push(transition),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return seen,
            Err(TryRecvError::Lagged(_)) => continue,
        }
    }
}

#[tokio::test]
async fn test_select_category_activates_with_welcome() {
    let (manager, gateway) = manager();

    let session_id = manager.select_category("Taxes").await.unwrap();

    assert_eq!(session_id, "session-1");
    assert_eq!(
        manager.phase(),
        SessionPhase::Active {
            category_id: "Taxes".to_string(),
            session_id: "session-1".to_string(),
        }
    );
    let messages = manager.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].sender, ChatSender::Assistant);
    assert_eq!(
        messages[0].text,
        "Session started for folder: Taxes. You can now ask questions about its content."
    );
    assert_eq!(gateway.count("start_chat_session"), 1);
}

#[tokio::test]
async fn test_select_blank_category_is_rejected() {
    let (manager, gateway) = manager();

    let err = manager.select_category("  ").await.unwrap_err();

    assert!(err.is_validation());
    assert!(gateway.calls().is_empty());
    assert!(manager.phase().is_idle());
}

#[tokio::test]
async fn test_start_failure_returns_to_idle() {
    let (manager, gateway) = manager();
    gateway.fail("start_chat_session");
    let mut transitions = manager.subscribe_transitions();

    let err = manager.select_category("Taxes").await.unwrap_err();

    assert!(err.is_network());
    assert!(manager.phase().is_idle());
    assert!(manager.messages().is_empty());
    let seen = drain(&mut transitions);
    assert_eq!(seen.len(), 2);
    assert!(matches!(&seen[1], SessionTransition::StartFailed { category_id, .. } if category_id == "Taxes"));
}

#[tokio::test]
async fn test_phase_is_starting_while_in_flight() {
    let (manager, gateway) = manager();
    let gate = gateway.hold("start_chat_session");

    let task = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.select_category("Taxes").await })
    };
    let mut phases = manager.subscribe_phase();
    while !matches!(phases.next().await, Some(SessionPhase::Starting { .. })) {}

    gate.notify_one();
    task.await.unwrap().unwrap();
    assert!(manager.phase().is_active());
}

#[tokio::test]
async fn test_send_while_idle_is_rejected_without_network() {
    let (manager, gateway) = manager();

    let err = manager.send_message("hi").await.unwrap_err();

    assert!(matches!(err, DocChatError::InvalidState(_)));
    assert!(err.is_validation());
    assert!(gateway.calls().is_empty());
    assert!(manager.messages().is_empty());
}

#[tokio::test]
async fn test_send_blank_is_rejected() {
    let (manager, gateway) = manager();
    manager.select_category("Taxes").await.unwrap();

    let err = manager.send_message(" \n").await.unwrap_err();

    assert!(matches!(err, DocChatError::Validation(_)));
    assert_eq!(gateway.count("send_chat_message"), 0);
}

#[tokio::test]
async fn test_send_appends_user_then_answer_with_source() {
    let (manager, gateway) = manager();
    manager.select_category("Taxes").await.unwrap();
    gateway.push_answer(
        "Your wages were $1,234.",
        vec![
            AnswerSource::Detailed {
                source: "w2.pdf".to_string(),
                page: 0,
                text: Some("Wages, tips".to_string()),
            },
            AnswerSource::Name("other.pdf".to_string()),
        ],
    );

    let outcome = manager.send_message("What were my wages?").await.unwrap();

    assert!(outcome.is_answered());
    let messages = manager.messages();
    assert_eq!(messages.len(), 3);
    assert!(messages[1].is_from_user());
    assert_eq!(messages[1].text, "What were my wages?");
    assert_eq!(messages[2].text, "Your wages were $1,234.");
    assert_eq!(
        messages[2].source,
        Some(ChatSource::new("w2.pdf", 1).with_matched_text("Wages, tips"))
    );
}

#[tokio::test]
async fn test_send_failure_is_message_scoped() {
    let (manager, gateway) = manager();
    manager.select_category("Taxes").await.unwrap();
    gateway.fail("send_chat_message");

    let outcome = manager.send_message("hello?").await.unwrap();

    match &outcome {
        SendOutcome::Failed { notice, error } => {
            assert_eq!(notice.text, CATEGORY_ERROR_REPLY);
            assert!(error.is_network());
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(manager.phase().is_active());
    let messages = manager.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2].text, CATEGORY_ERROR_REPLY);
    assert_eq!(messages[2].source, None);

    gateway.recover("send_chat_message");
    assert!(manager.send_message("again").await.unwrap().is_answered());
}

#[tokio::test]
async fn test_reselect_clears_exactly_once_before_starting() {
    let (manager, _) = manager();
    manager.select_category("Taxes").await.unwrap();
    let mut transitions = manager.subscribe_transitions();

    manager.select_category("Travel").await.unwrap();

    assert_eq!(
        drain(&mut transitions),
        vec![
            SessionTransition::Cleared {
                category_id: "Taxes".to_string()
            },
            SessionTransition::Starting {
                category_id: "Travel".to_string()
            },
            SessionTransition::Activated {
                category_id: "Travel".to_string(),
                session_id: "session-2".to_string()
            },
        ]
    );
    assert_eq!(manager.messages().len(), 1);
}

#[tokio::test]
async fn test_clear_resets_and_is_noop_when_idle() {
    let (manager, gateway) = manager();
    let mut transitions = manager.subscribe_transitions();

    manager.clear();
    assert!(drain(&mut transitions).is_empty());

    manager.select_category("Taxes").await.unwrap();
    manager.send_message("hi").await.unwrap();
    manager.clear();

    assert!(manager.phase().is_idle());
    assert!(manager.messages().is_empty());
    assert_eq!(gateway.count("delete_chat_history"), 0);
    assert_eq!(
        drain(&mut transitions).last(),
        Some(&SessionTransition::Cleared {
            category_id: "Taxes".to_string()
        })
    );
}

#[tokio::test]
async fn test_stale_start_is_discarded() {
    let (manager, gateway) = manager();
    let gate = gateway.hold("start_chat_session");

    let task = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.select_category("Taxes").await })
    };
    let mut phases = manager.subscribe_phase();
    while !matches!(phases.next().await, Some(SessionPhase::Starting { .. })) {}

    manager.clear();
    gate.notify_one();

    let err = task.await.unwrap().unwrap_err();
    assert!(err.is_cancelled());
    assert!(manager.phase().is_idle());
    assert!(manager.messages().is_empty());
}

#[tokio::test]
async fn test_dropping_subscription_cancels_inflight_send() {
    let (manager, gateway) = manager();
    manager.select_category("Taxes").await.unwrap();
    let subscription = manager.subscribe_messages();
    let _gate = gateway.hold("send_chat_message");

    let task = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.send_message("slow question").await })
    };
    while gateway.count("send_chat_message") == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    drop(subscription);

    let err = task.await.unwrap().unwrap_err();
    assert!(err.is_cancelled());
    let messages = manager.messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[1].is_from_user());
    assert!(manager.phase().is_active());
}

#[tokio::test]
async fn test_clear_cancels_inflight_send() {
    let (manager, gateway) = manager();
    manager.select_category("Taxes").await.unwrap();
    let _gate = gateway.hold("send_chat_message");

    let task = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.send_message("slow question").await })
    };
    while gateway.count("send_chat_message") == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    manager.clear();

    assert!(task.await.unwrap().unwrap_err().is_cancelled());
    assert!(manager.messages().is_empty());
}

#[tokio::test]
async fn test_message_subscription_replays_transcript() {
    let (manager, _) = manager();
    manager.select_category("Taxes").await.unwrap();

    let mut subscription = manager.subscribe_messages();
    assert_eq!(subscription.next().await.unwrap().len(), 1);

    manager.send_message("hi").await.unwrap();
    assert_eq!(subscription.current().len(), 3);
}

#[tokio::test]
async fn test_stale_start_failure_is_cancelled() {
    let (manager, gateway) = manager();
    gateway.fail("start_chat_session");
    let gate = gateway.hold("start_chat_session");
    let mut transitions = manager.subscribe_transitions();

    let task = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.select_category("Taxes").await })
    };
    let mut phases = manager.subscribe_phase();
    while !matches!(phases.next().await, Some(SessionPhase::Starting { .. })) {}

    manager.clear();
    gate.notify_one();

    let err = task.await.unwrap().unwrap_err();
    assert!(err.is_cancelled());
    assert!(manager.phase().is_idle());
    assert!(
        !drain(&mut transitions)
            .iter()
            .any(|t| matches!(t, SessionTransition::StartFailed { .. }))
    );
}

#[tokio::test]
async fn test_dropping_one_of_two_subscriptions_keeps_send_alive() {
    let (manager, gateway) = manager();
    manager.select_category("Taxes").await.unwrap();
    let live_view = manager.subscribe_messages();
    let peek = manager.subscribe_messages();
    let gate = gateway.hold("send_chat_message");

    let task = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.send_message("slow question").await })
    };
    while gateway.count("send_chat_message") == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    drop(peek);
    gate.notify_one();

    let outcome = task.await.unwrap().unwrap();
    assert!(outcome.is_answered());
    assert_eq!(live_view.current().len(), 3);
}
