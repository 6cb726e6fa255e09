//! Integration tests for the workflow alert stream.

mod helpers;

use helpers::{workflow_alert, RecordingNotifier, TestHarness};
use sitelink_core::events::{AlertPriority, WorkflowAlertPatch};
use sitelink_core::traits::notifier::NotificationPermission;
use sitelink_core::types::id::AlertId;
use sitelink_realtime::{ServerEvent, WorkflowAlertStream};

#[tokio::test]
async fn alerts_accumulate_newest_first() {
    let harness = TestHarness::new();
    harness.connect().await;
    let notifier = RecordingNotifier::new(NotificationPermission::Denied);
    let stream = WorkflowAlertStream::attach(&harness.manager, notifier);

    let first = workflow_alert(AlertPriority::Low);
    let second = workflow_alert(AlertPriority::Medium);
    let second_id = second.id;
    harness.push(ServerEvent::WorkflowAlert(first)).await;
    harness.push(ServerEvent::WorkflowAlert(second)).await;

    assert_eq!(stream.active_count(), 2);
    assert_eq!(stream.alerts()[0].id, second_id);
}

#[tokio::test]
async fn acknowledge_flags_but_retains_the_alert() {
    let harness = TestHarness::new();
    harness.connect().await;
    let notifier = RecordingNotifier::new(NotificationPermission::Denied);
    let stream = WorkflowAlertStream::attach(&harness.manager, notifier);

    let alert = workflow_alert(AlertPriority::Medium);
    let id = alert.id;
    harness.push(ServerEvent::WorkflowAlert(alert)).await;

    assert!(stream.acknowledge(id));
    assert_eq!(stream.active_count(), 1);
    assert!(stream.alerts()[0].acknowledged);

    assert!(!stream.acknowledge(AlertId::new()));
}

#[tokio::test]
async fn dismiss_removes_the_alert_locally() {
    let harness = TestHarness::new();
    harness.connect().await;
    let notifier = RecordingNotifier::new(NotificationPermission::Denied);
    let stream = WorkflowAlertStream::attach(&harness.manager, notifier);

    let alert = workflow_alert(AlertPriority::High);
    let id = alert.id;
    harness.push(ServerEvent::WorkflowAlert(alert)).await;

    assert!(stream.dismiss(id));
    assert_eq!(stream.active_count(), 0);

    // Dismissing an unknown id leaves state unchanged.
    assert!(!stream.dismiss(id));
    assert_eq!(stream.active_count(), 0);
}

#[tokio::test]
async fn server_patch_merges_into_the_matching_alert() {
    let harness = TestHarness::new();
    harness.connect().await;
    let notifier = RecordingNotifier::new(NotificationPermission::Denied);
    let stream = WorkflowAlertStream::attach(&harness.manager, notifier);

    let alert = workflow_alert(AlertPriority::Low);
    let id = alert.id;
    harness.push(ServerEvent::WorkflowAlert(alert)).await;

    harness
        .push(ServerEvent::WorkflowAlertUpdate(WorkflowAlertPatch {
            id,
            step_title: Some("Final walkthrough".to_string()),
            priority: Some(AlertPriority::Urgent),
            acknowledged: None,
        }))
        .await;

    let alerts = stream.alerts();
    assert_eq!(alerts[0].step_title, "Final walkthrough");
    assert_eq!(alerts[0].priority, AlertPriority::Urgent);
    assert!(!alerts[0].acknowledged);

    // A patch for an alert we never saw is dropped quietly.
    harness
        .push(ServerEvent::WorkflowAlertUpdate(WorkflowAlertPatch {
            id: AlertId::new(),
            step_title: Some("Ghost".to_string()),
            priority: None,
            acknowledged: None,
        }))
        .await;
    assert_eq!(stream.active_count(), 1);
}

#[tokio::test]
async fn server_dismissal_removes_the_alert() {
    let harness = TestHarness::new();
    harness.connect().await;
    let notifier = RecordingNotifier::new(NotificationPermission::Denied);
    let stream = WorkflowAlertStream::attach(&harness.manager, notifier);

    let alert = workflow_alert(AlertPriority::Medium);
    let id = alert.id;
    harness.push(ServerEvent::WorkflowAlert(alert)).await;
    harness.push(ServerEvent::WorkflowAlertDismissed { id }).await;

    assert_eq!(stream.active_count(), 0);
}

#[tokio::test]
async fn urgent_alerts_raise_a_desktop_notification() {
    let harness = TestHarness::new();
    harness.connect().await;
    let notifier = RecordingNotifier::new(NotificationPermission::Granted);
    let _stream = WorkflowAlertStream::attach(&harness.manager, notifier.clone());

    let urgent = workflow_alert(AlertPriority::Urgent);
    let id = urgent.id;
    harness.push(ServerEvent::WorkflowAlert(urgent)).await;
    harness.push(ServerEvent::WorkflowAlert(workflow_alert(AlertPriority::Low))).await;
    harness.push(ServerEvent::WorkflowAlert(workflow_alert(AlertPriority::Medium))).await;

    let raised = notifier.raised();
    assert_eq!(raised.len(), 1);
    assert_eq!(raised[0].tag, id.to_string());
    assert!(raised[0].body.contains("Inspection sign-off"));
}

#[tokio::test]
async fn high_priority_respects_denied_permission() {
    let harness = TestHarness::new();
    harness.connect().await;
    let notifier = RecordingNotifier::new(NotificationPermission::Denied);
    let stream = WorkflowAlertStream::attach(&harness.manager, notifier.clone());

    harness.push(ServerEvent::WorkflowAlert(workflow_alert(AlertPriority::High))).await;

    assert!(notifier.raised().is_empty());
    assert_eq!(stream.active_count(), 1);
}
