//! Gateway behavior tests
//!
//! Drives the router with hand-built frames and asserts on the outbound
//! frames and recorded REST calls.

use integration_tests::{
    dispatch_frame, hello_frame, member_add_payload, message_payload, ApiCall, Harness,
    TEST_CHANNEL, TEST_GUILD,
};
use fieldbot_gateway::commands::RoleTable;
use fieldbot_gateway::protocol::OpCode;
use fieldbot_gateway::session::SessionState;
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;

async fn recv_frame(
    harness: &mut Harness,
) -> fieldbot_gateway::protocol::GatewayFrame {
    timeout(Duration::from_secs(1), harness.outbound.recv())
        .await
        .expect("timed out waiting for outbound frame")
        .expect("outbound channel closed")
}

fn role_id(keyword: &str) -> String {
    RoleTable::new()
        .resolve(keyword)
        .expect("known keyword")
        .to_string()
}

// === Handshake ===

#[tokio::test]
async fn test_hello_sends_heartbeat_and_identify() {
    let mut harness = Harness::new();

    harness.router.handle_frame(hello_frame(45_000)).await.unwrap();

    // One immediate heartbeat from the scheduler plus the identify; the
    // two come from different tasks, so the order is not fixed.
    let first = recv_frame(&mut harness).await;
    let second = recv_frame(&mut harness).await;
    let mut ops = [first.op, second.op];
    ops.sort_by_key(|op| op.as_u8());
    assert_eq!(ops, [OpCode::Heartbeat, OpCode::Identify]);

    let heartbeat = if first.op == OpCode::Heartbeat { first } else { second };
    assert_eq!(heartbeat.d, Some(Value::Null));

    assert_eq!(harness.session.state().await, SessionState::Identified);
    assert_eq!(
        harness.session.heartbeat_interval(),
        Some(Duration::from_millis(45_000))
    );

    harness.session.stop_heartbeat().await;
}

#[tokio::test]
async fn test_duplicate_hello_does_not_reidentify() {
    let mut harness = Harness::new();

    harness.router.handle_frame(hello_frame(45_000)).await.unwrap();
    recv_frame(&mut harness).await;
    recv_frame(&mut harness).await;

    harness.router.handle_frame(hello_frame(45_000)).await.unwrap();
    let extra = timeout(Duration::from_millis(100), harness.outbound.recv()).await;
    assert!(extra.is_err(), "duplicate Hello produced an outbound frame");

    harness.session.stop_heartbeat().await;
}

// === Sequence bookkeeping ===

#[tokio::test]
async fn test_dispatch_sequence_recorded() {
    let harness = Harness::new();

    harness
        .router
        .handle_frame(dispatch_frame("READY", 5, Value::Null))
        .await
        .unwrap();
    assert_eq!(harness.session.sequence(), Some(5));

    harness
        .router
        .handle_frame(dispatch_frame("READY", 9, Value::Null))
        .await
        .unwrap();
    assert_eq!(harness.session.sequence(), Some(9));
}

#[tokio::test]
async fn test_frame_without_sequence_leaves_it_unchanged() {
    let harness = Harness::new();

    harness
        .router
        .handle_frame(dispatch_frame("READY", 7, Value::Null))
        .await
        .unwrap();

    // Ack frames carry no sequence
    let ack = fieldbot_gateway::protocol::GatewayFrame::from_json(r#"{"op":11}"#).unwrap();
    harness.router.handle_frame(ack).await.unwrap();
    assert_eq!(harness.session.sequence(), Some(7));
}

#[tokio::test]
async fn test_unknown_opcode_still_records_sequence() {
    let harness = Harness::new();

    let frame =
        fieldbot_gateway::protocol::GatewayFrame::from_json(r#"{"op":9,"s":12}"#).unwrap();
    harness.router.handle_frame(frame).await.unwrap();
    assert_eq!(harness.session.sequence(), Some(12));
}

// === Heartbeats ===

#[tokio::test]
async fn test_server_heartbeat_request_answered_immediately() {
    let mut harness = Harness::new();
    harness.session.record_sequence(33);

    let request =
        fieldbot_gateway::protocol::GatewayFrame::from_json(r#"{"op":1}"#).unwrap();
    harness.router.handle_frame(request).await.unwrap();

    let beat = recv_frame(&mut harness).await;
    assert_eq!(beat.op, OpCode::Heartbeat);
    assert_eq!(beat.d, Some(Value::from(33)));
}

#[tokio::test]
async fn test_heartbeat_ack_clears_pending_flag() {
    let harness = Harness::new();
    harness.session.mark_heartbeat_sent();
    assert!(!harness.session.is_heartbeat_acked());

    let ack = fieldbot_gateway::protocol::GatewayFrame::from_json(r#"{"op":11}"#).unwrap();
    harness.router.handle_frame(ack).await.unwrap();
    assert!(harness.session.is_heartbeat_acked());
}

// === Field role command ===

#[tokio::test]
async fn test_field_command_assigns_role_and_confirms() {
    let harness = Harness::new();

    let payload = message_payload(TEST_CHANNEL, "!field comsci", "u1", "newbie", None, &[]);
    harness
        .router
        .handle_frame(dispatch_frame("MESSAGE_CREATE", 1, payload))
        .await
        .unwrap();

    let calls = harness.api.calls();
    assert_eq!(calls.len(), 2);
    match &calls[0] {
        ApiCall::MemberPatch {
            guild_id,
            user_id,
            nick,
            roles,
        } => {
            assert_eq!(guild_id, TEST_GUILD);
            assert_eq!(user_id, "u1");
            assert!(nick.is_none());
            assert_eq!(roles.as_deref(), Some(&[role_id("comsci")][..]));
        }
        other => panic!("expected member patch, got {other:?}"),
    }
    match &calls[1] {
        ApiCall::Message {
            channel_id,
            content,
        } => {
            assert_eq!(channel_id, TEST_CHANNEL);
            assert_eq!(content, "Set newbie's role to comsci.");
        }
        other => panic!("expected channel message, got {other:?}"),
    }
}

#[tokio::test]
async fn test_field_command_is_noop_when_role_already_held() {
    let harness = Harness::new();
    let comsci = role_id("comsci");

    let payload = message_payload(
        TEST_CHANNEL,
        "!field ComSci",
        "u1",
        "newbie",
        None,
        &[comsci.as_str()],
    );
    harness
        .router
        .handle_frame(dispatch_frame("MESSAGE_CREATE", 1, payload))
        .await
        .unwrap();

    assert!(harness.api.calls().is_empty());
}

#[tokio::test]
async fn test_field_roles_are_mutually_exclusive() {
    let harness = Harness::new();
    let comsci = role_id("comsci");

    // Holds comsci and an unrelated role; swaps to sofeng
    let payload = message_payload(
        TEST_CHANNEL,
        "!field sofeng",
        "u1",
        "newbie",
        None,
        &[comsci.as_str(), "42"],
    );
    harness
        .router
        .handle_frame(dispatch_frame("MESSAGE_CREATE", 1, payload))
        .await
        .unwrap();

    let patches = harness.api.patches();
    assert_eq!(patches.len(), 1);
    let ApiCall::MemberPatch { roles, .. } = &patches[0] else {
        panic!("expected member patch");
    };
    let roles = roles.as_deref().expect("role patch");
    assert!(roles.contains(&"42".to_string()));
    assert!(roles.contains(&role_id("sofeng")));
    assert!(!roles.contains(&comsci));
}

#[tokio::test]
async fn test_field_command_rejects_unknown_keyword() {
    let harness = Harness::new();

    let payload = message_payload(TEST_CHANNEL, "!field astronomy", "u1", "newbie", None, &[]);
    harness
        .router
        .handle_frame(dispatch_frame("MESSAGE_CREATE", 1, payload))
        .await
        .unwrap();

    assert!(harness.api.calls().is_empty());
}

// === Nickname command ===

#[tokio::test]
async fn test_name_command_patches_nick_and_confirms() {
    let harness = Harness::new();

    let payload = message_payload(
        TEST_CHANNEL,
        "!name Bob   Jones",
        "u1",
        "newbie",
        None,
        &[],
    );
    harness
        .router
        .handle_frame(dispatch_frame("MESSAGE_CREATE", 1, payload))
        .await
        .unwrap();

    let calls = harness.api.calls();
    assert_eq!(calls.len(), 2);
    let ApiCall::MemberPatch { nick, roles, .. } = &calls[0] else {
        panic!("expected member patch");
    };
    // Whitespace between tokens collapses to single spaces
    assert_eq!(nick.as_deref(), Some("Bob Jones"));
    assert!(roles.is_none());

    let ApiCall::Message { content, .. } = &calls[1] else {
        panic!("expected channel message");
    };
    assert_eq!(content, "Hello Bob Jones! Your name change was successful.");
}

#[tokio::test]
async fn test_name_command_is_noop_when_name_unchanged() {
    let harness = Harness::new();

    let payload = message_payload(TEST_CHANNEL, "!name Alice", "u1", "alice", Some("Alice"), &[]);
    harness
        .router
        .handle_frame(dispatch_frame("MESSAGE_CREATE", 1, payload))
        .await
        .unwrap();

    assert!(harness.api.calls().is_empty());
}

#[tokio::test]
async fn test_name_patch_failure_sends_no_confirmation() {
    let harness = Harness::new();
    harness.api.fail_member_patches();

    let payload = message_payload(TEST_CHANNEL, "!name Bob", "u1", "newbie", None, &[]);
    let result = harness
        .router
        .handle_frame(dispatch_frame("MESSAGE_CREATE", 1, payload))
        .await;

    // The failed mutation is contained; the session keeps running
    assert!(result.is_ok());
    assert!(harness.api.messages().is_empty());
}

// === Help and welcome ===

#[tokio::test]
async fn test_bare_commands_send_help() {
    for command in ["!help", "!field", "!name"] {
        let harness = Harness::new();

        let payload = message_payload(TEST_CHANNEL, command, "u1", "newbie", None, &[]);
        harness
            .router
            .handle_frame(dispatch_frame("MESSAGE_CREATE", 1, payload))
            .await
            .unwrap();

        let calls = harness.api.calls();
        assert_eq!(calls.len(), 1, "{command} should send exactly one message");
        let ApiCall::Message {
            channel_id,
            content,
        } = &calls[0]
        else {
            panic!("expected channel message");
        };
        assert_eq!(channel_id, TEST_CHANNEL);
        assert!(content.starts_with("Hello <@u1>!"));
    }
}

#[tokio::test]
async fn test_member_add_sends_welcome() {
    let harness = Harness::new();

    harness
        .router
        .handle_frame(dispatch_frame("GUILD_MEMBER_ADD", 1, member_add_payload("u9")))
        .await
        .unwrap();

    let calls = harness.api.calls();
    assert_eq!(calls.len(), 1);
    let ApiCall::Message {
        channel_id,
        content,
    } = &calls[0]
    else {
        panic!("expected channel message");
    };
    assert_eq!(channel_id, TEST_CHANNEL);
    assert!(content.contains("<@u9>"));
}

// === Filtering ===

#[tokio::test]
async fn test_foreign_channel_messages_are_ignored() {
    let harness = Harness::new();

    let payload = message_payload("other-channel", "!help", "u1", "newbie", None, &[]);
    harness
        .router
        .handle_frame(dispatch_frame("MESSAGE_CREATE", 1, payload))
        .await
        .unwrap();

    assert!(harness.api.calls().is_empty());
}

#[tokio::test]
async fn test_empty_content_is_ignored() {
    let harness = Harness::new();

    let payload = message_payload(TEST_CHANNEL, "", "u1", "newbie", None, &[]);
    harness
        .router
        .handle_frame(dispatch_frame("MESSAGE_CREATE", 1, payload))
        .await
        .unwrap();

    assert!(harness.api.calls().is_empty());
}

#[tokio::test]
async fn test_non_command_text_is_ignored() {
    let harness = Harness::new();

    let payload = message_payload(TEST_CHANNEL, "good morning", "u1", "newbie", None, &[]);
    harness
        .router
        .handle_frame(dispatch_frame("MESSAGE_CREATE", 1, payload))
        .await
        .unwrap();

    assert!(harness.api.calls().is_empty());
}

// === State machine ===

#[tokio::test]
async fn test_first_dispatch_moves_session_to_steady() {
    let mut harness = Harness::new();

    harness.router.handle_frame(hello_frame(45_000)).await.unwrap();
    recv_frame(&mut harness).await;
    recv_frame(&mut harness).await;
    assert_eq!(harness.session.state().await, SessionState::Identified);

    harness
        .router
        .handle_frame(dispatch_frame("READY", 1, Value::Null))
        .await
        .unwrap();
    assert_eq!(harness.session.state().await, SessionState::Steady);

    harness.session.stop_heartbeat().await;
}
