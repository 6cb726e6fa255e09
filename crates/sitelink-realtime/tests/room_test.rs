//! Integration tests for project and conversation room streams.

mod helpers;

use helpers::{chat_message, settle, task_update, TestHarness};
use sitelink_core::config::realtime::RealtimeConfig;
use sitelink_core::events::TypingSignal;
use sitelink_core::types::id::{ConversationId, ProjectId, UserId};
use sitelink_realtime::room::project::ProjectEvent;
use sitelink_realtime::transport::ClientFrame;
use sitelink_realtime::{ConversationStream, ProjectStream};

#[tokio::test]
async fn opening_a_project_stream_joins_the_room_once() {
    let harness = TestHarness::new();
    harness.connect().await;

    let project_id = ProjectId::new();
    let _stream = ProjectStream::open(&harness.manager, project_id);
    harness.manager.join_project(project_id);
    settle().await;

    let joins = harness
        .server
        .frames()
        .iter()
        .filter(|frame| {
            matches!(
                frame,
                ClientFrame::Join { room } if *room == format!("project:{project_id}")
            )
        })
        .count();
    assert_eq!(joins, 1);
    assert_eq!(harness.manager.joined_room_count(), 1);
}

#[tokio::test]
async fn project_events_arrive_newest_first() {
    let harness = TestHarness::new();
    harness.connect().await;

    let project_id = ProjectId::new();
    let stream = ProjectStream::open(&harness.manager, project_id);

    harness.push(task_update(project_id, "Pour foundation")).await;
    harness.push(task_update(project_id, "Frame walls")).await;
    harness.push(task_update(project_id, "Install roofing")).await;

    let titles: Vec<String> = stream
        .recent()
        .into_iter()
        .filter_map(|event| match event {
            ProjectEvent::Task(task) => Some(task.title),
            _ => None,
        })
        .collect();
    assert_eq!(titles, vec!["Install roofing", "Frame walls", "Pour foundation"]);
}

#[tokio::test]
async fn project_buffer_discards_oldest_beyond_capacity() {
    let config = RealtimeConfig {
        room_buffer_capacity: 5,
        ..helpers::fast_config()
    };
    let harness = TestHarness::with_config(config);
    harness.connect().await;

    let project_id = ProjectId::new();
    let stream = ProjectStream::open(&harness.manager, project_id);

    for n in 0..8 {
        harness.push(task_update(project_id, &format!("Task {n}"))).await;
    }

    assert_eq!(stream.len(), 5);
    let titles: Vec<String> = stream
        .recent()
        .into_iter()
        .filter_map(|event| match event {
            ProjectEvent::Task(task) => Some(task.title),
            _ => None,
        })
        .collect();
    assert_eq!(titles.first().map(String::as_str), Some("Task 7"));
    assert_eq!(titles.last().map(String::as_str), Some("Task 3"));
}

#[tokio::test]
async fn project_streams_do_not_cross_talk() {
    let harness = TestHarness::new();
    harness.connect().await;

    let site_a = ProjectId::new();
    let site_b = ProjectId::new();
    let stream_a = ProjectStream::open(&harness.manager, site_a);
    let stream_b = ProjectStream::open(&harness.manager, site_b);

    harness.push(task_update(site_a, "Grade the lot")).await;
    harness.push(task_update(site_b, "Set footings")).await;

    assert_eq!(stream_a.len(), 1);
    assert_eq!(stream_b.len(), 1);
    assert!(matches!(
        stream_a.recent().first(),
        Some(ProjectEvent::Task(task)) if task.title == "Grade the lot"
    ));
}

#[tokio::test]
async fn dropping_a_stream_leaves_the_room() {
    let harness = TestHarness::new();
    harness.connect().await;

    let project_id = ProjectId::new();
    let stream = ProjectStream::open(&harness.manager, project_id);
    settle().await;
    drop(stream);
    settle().await;

    assert_eq!(harness.manager.joined_room_count(), 0);
    let leaves = harness
        .server
        .frames()
        .iter()
        .filter(|frame| {
            matches!(
                frame,
                ClientFrame::Leave { room } if *room == format!("project:{project_id}")
            )
        })
        .count();
    assert_eq!(leaves, 1);
}

#[tokio::test]
async fn conversation_stream_collects_scoped_messages() {
    let harness = TestHarness::new();
    harness.connect().await;

    let conversation_id = ConversationId::new();
    let other = ConversationId::new();
    let stream = ConversationStream::open(&harness.manager, conversation_id);

    harness.push(chat_message(conversation_id, "Concrete truck is here")).await;
    harness.push(chat_message(other, "Wrong thread")).await;

    let messages = stream.recent_messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].body, "Concrete truck is here");
}

#[tokio::test]
async fn sending_through_a_conversation_reaches_the_wire() {
    let harness = TestHarness::new();
    harness.connect().await;

    let conversation_id = ConversationId::new();
    let stream = ConversationStream::open(&harness.manager, conversation_id);

    stream.send_message("Rebar delivery at 2pm").await.unwrap();
    settle().await;

    let bodies: Vec<String> = harness
        .server
        .frames()
        .into_iter()
        .filter_map(|frame| match frame {
            ClientFrame::Message { payload } => Some(payload.body),
            _ => None,
        })
        .collect();
    assert_eq!(bodies, vec!["Rebar delivery at 2pm"]);

    assert_eq!(harness.manager.metrics().messages_sent, 1);
}

#[tokio::test]
async fn typing_signals_round_through_the_tracker() {
    let harness = TestHarness::new();
    harness.connect().await;

    let conversation_id = ConversationId::new();
    let stream = ConversationStream::open(&harness.manager, conversation_id);
    let foreman = UserId::new();

    harness
        .push(sitelink_realtime::ServerEvent::Typing(TypingSignal {
            conversation_id,
            user_id: foreman,
            is_typing: true,
        }))
        .await;
    assert!(stream.is_typing(foreman));
    assert_eq!(stream.typing_users(), vec![foreman]);

    harness
        .push(sitelink_realtime::ServerEvent::Typing(TypingSignal {
            conversation_id,
            user_id: foreman,
            is_typing: false,
        }))
        .await;
    assert!(!stream.is_typing(foreman));
    assert!(stream.typing_users().is_empty());

    stream.start_typing();
    stream.stop_typing();
    settle().await;

    let signals: Vec<bool> = harness
        .server
        .frames()
        .into_iter()
        .filter_map(|frame| match frame {
            ClientFrame::Typing { is_typing, .. } => Some(is_typing),
            _ => None,
        })
        .collect();
    assert_eq!(signals, vec![true, false]);
}
