// ConversationStateTracker tests through the public API

use logwarden_core::conversation::{ConversationStateTracker, TrackerError, sanitize_message};
use logwarden_core::types::{ConversationTurn, ToolCallRecord, ToolResultRecord, TurnRole};
use serde_json::json;

fn tool_call(id: &str, turn: usize) -> ToolCallRecord {
    ToolCallRecord::new(id, "analyze_logs_for_errors", json!({"log_group": "/ecs/api"}), turn)
}

#[test]
fn orphan_result_scenario() {
    let mut tracker = ConversationStateTracker::new();
    tracker.record_tool_call(tool_call("t1", 1)).expect("call t1");
    tracker
        .record_tool_result(ToolResultRecord::new("t1", json!({"errors": 2})))
        .expect("result t1");
    tracker
        .record_tool_result(ToolResultRecord::new("t2", json!({"errors": 0})))
        .expect("result t2");

    assert!(!tracker.validate());

    tracker.reset();

    assert!(tracker.tool_calls().is_empty());
    assert!(tracker.tool_results().is_empty());
    assert!(tracker.validate());
}

#[test]
fn duplicate_call_keeps_original_record() {
    let mut tracker = ConversationStateTracker::new();
    tracker.record_tool_call(tool_call("t1", 1)).expect("call");

    let err = tracker
        .record_tool_call(tool_call("t1", 3))
        .expect_err("duplicate");

    assert_eq!(err.tool_id(), "t1");
    assert!(matches!(err, TrackerError::DuplicateToolCall { .. }));
    assert_eq!(tracker.tool_calls()["t1"].issued_at_turn, 1);
}

#[test]
fn mismatch_detection_counts_markers_across_turns() {
    let tracker = ConversationStateTracker::new();
    let turns = vec![
        ConversationTurn::assistant("toolUse toolUse"),
        ConversationTurn::user("toolResult"),
        ConversationTurn::user("toolResult"),
    ];
    assert!(!tracker.detect_potential_mismatch(&turns));

    let mut leaked = turns.clone();
    leaked.push(ConversationTurn::user("toolResult again"));
    assert!(tracker.detect_potential_mismatch(&leaked));
}

#[test]
fn safe_history_scrubs_tool_blocks() {
    let mut tracker = ConversationStateTracker::new();
    tracker.record_turn(ConversationTurn::system("You analyze logs."));
    tracker.record_turn(ConversationTurn::user("Analyze /ecs/api"));
    tracker.record_turn(ConversationTurn::assistant(
        r#"{"toolUse": {"name": "get_cloudwatch_logs"}} next: fetching logs"#,
    ));

    let history = tracker.safe_history(5);

    assert_eq!(history.len(), 3);
    assert_eq!(history[0].role, TurnRole::System);
    assert_eq!(
        history[2].content,
        "Please help with the following request:  fetching logs"
    );
    // The recorded history itself is untouched.
    assert!(tracker.turns()[2].content.contains("toolUse"));
}

#[test]
fn sanitize_is_identity_without_markers() {
    let message = "Which log groups had errors: last hour";
    assert_eq!(sanitize_message(message), message);
}
