use super::errors::TrackerError;
use super::history;
use crate::constants::{TOOL_CALL_MARKER, TOOL_RESULT_MARKER, TOOL_USE_ID_SUFFIX};
use crate::types::{ConversationTurn, ToolCallRecord, ToolResultRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tracing::{debug, error, info, warn};

/// Correlation state of one logical conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversationState {
    pub turns: Vec<ConversationTurn>,
    pub tool_calls: BTreeMap<String, ToolCallRecord>,
    pub tool_results: BTreeMap<String, ToolResultRecord>,
}

/// Owns the [`ConversationState`] of a single conversation.
///
/// Invariants checked by [`validate`](Self::validate):
/// there are never more results than calls, and every result id has a call.
#[derive(Debug, Default)]
pub struct ConversationStateTracker {
    state: ConversationState,
}

impl ConversationStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every turn, call and result.
    pub fn reset(&mut self) {
        self.state.turns.clear();
        self.state.tool_calls.clear();
        self.state.tool_results.clear();
        info!("Conversation state reset");
    }

    pub fn record_turn(&mut self, turn: ConversationTurn) {
        self.state.turns.push(turn);
    }

    pub fn record_tool_call(&mut self, record: ToolCallRecord) -> Result<(), TrackerError> {
        match self.state.tool_calls.entry(record.tool_id.clone()) {
            Entry::Occupied(_) => Err(TrackerError::DuplicateToolCall {
                tool_id: record.tool_id,
            }),
            Entry::Vacant(slot) => {
                info!(
                    tool = %record.tool_name,
                    tool_id = %record.tool_id,
                    "Tracked tool call"
                );
                slot.insert(record);
                Ok(())
            }
        }
    }

    /// Record a tool result. Only the id's uniqueness is enforced here;
    /// orphaned results are reported by [`validate`](Self::validate).
    pub fn record_tool_result(&mut self, record: ToolResultRecord) -> Result<(), TrackerError> {
        match self.state.tool_results.entry(record.tool_id.clone()) {
            Entry::Occupied(_) => Err(TrackerError::DuplicateToolResult {
                tool_id: record.tool_id,
            }),
            Entry::Vacant(slot) => {
                info!(tool_id = %record.tool_id, "Tracked tool result");
                slot.insert(record);
                Ok(())
            }
        }
    }

    pub fn has_tool_call(&self, tool_id: &str) -> bool {
        self.state.tool_calls.contains_key(tool_id)
    }

    /// True while results never outnumber calls and none is orphaned.
    pub fn validate(&self) -> bool {
        let calls = self.state.tool_calls.len();
        let results = self.state.tool_results.len();
        if results > calls {
            error!(results, calls, "Tool results exceed tool calls");
            return false;
        }

        let orphans: Vec<&str> = self
            .state
            .tool_results
            .keys()
            .filter(|id| !self.state.tool_calls.contains_key(*id))
            .map(String::as_str)
            .collect();
        if !orphans.is_empty() {
            error!(?orphans, "Found tool results without matching tool calls");
            return false;
        }

        debug!("Conversation state validation passed");
        true
    }

    /// Heuristic pre-flight check: do tool-result markers outnumber
    /// tool-call markers across the raw turn text?
    ///
    /// `toolUseId` inside a result block is a back-reference, not a call.
    pub fn detect_potential_mismatch(&self, turns: &[ConversationTurn]) -> bool {
        let (calls, results) = turns.iter().fold((0usize, 0usize), |(calls, results), turn| {
            (
                calls + count_call_markers(&turn.content),
                results + turn.content.matches(TOOL_RESULT_MARKER).count(),
            )
        });

        if results > calls {
            warn!(results, calls, "Tool mismatch detected in outgoing turns");
            return true;
        }
        false
    }

    /// Keep only the most recent user turn.
    ///
    /// Every tool exchange after the user's request is treated as corrupt
    /// and dropped. Without any user turn the list is returned as is.
    pub fn truncate_to_last_user_turn(&self, turns: &[ConversationTurn]) -> Vec<ConversationTurn> {
        match turns.iter().rev().find(|turn| turn.is_user()) {
            Some(turn) => {
                debug!(dropped = turns.len() - 1, "Truncated conversation to last user turn");
                vec![turn.clone()]
            }
            None => {
                warn!(turns = turns.len(), "No user turn to truncate to, keeping turns");
                turns.to_vec()
            }
        }
    }

    /// Recorded history bounded to `max_turns` exchanges with tool blocks scrubbed.
    pub fn safe_history(&self, max_turns: usize) -> Vec<ConversationTurn> {
        history::safe_history(&self.state.turns, max_turns)
    }

    /// Ids of calls that have not received a result yet.
    pub fn unmatched_calls(&self) -> Vec<&str> {
        self.state
            .tool_calls
            .keys()
            .filter(|id| !self.state.tool_results.contains_key(*id))
            .map(String::as_str)
            .collect()
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.state.turns
    }

    pub fn tool_calls(&self) -> &BTreeMap<String, ToolCallRecord> {
        &self.state.tool_calls
    }

    pub fn tool_results(&self) -> &BTreeMap<String, ToolResultRecord> {
        &self.state.tool_results
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }
}

fn count_call_markers(text: &str) -> usize {
    text.match_indices(TOOL_CALL_MARKER)
        .filter(|(at, marker)| !text[at + marker.len()..].starts_with(TOOL_USE_ID_SUFFIX))
        .count()
}
