use crate::constants::{TOOL_CALL_MARKER, TOOL_RESULT_MARKER};
use crate::types::{ConversationTurn, TurnRole};
use tracing::warn;

const SAFE_MESSAGE_PREFIX: &str = "Please help with the following request: ";

pub(crate) fn mentions_tool_blocks(text: &str) -> bool {
    text.contains(TOOL_CALL_MARKER) || text.contains(TOOL_RESULT_MARKER)
}

/// Strip a message that embeds raw tool blocks down to its trailing request.
///
/// Text after the last `:` is kept; messages without tool markers pass
/// through untouched.
pub fn sanitize_message(message: &str) -> String {
    if !mentions_tool_blocks(message) {
        return message.to_string();
    }
    warn!("Message contains tool references, using simplified version");
    let tail = message.rsplit(':').next().unwrap_or(message);
    format!("{SAFE_MESSAGE_PREFIX}{tail}")
}

/// Bound `history` to the last `max_turns` exchanges and scrub tool blocks.
///
/// A leading system turn survives truncation.
pub(crate) fn safe_history(history: &[ConversationTurn], max_turns: usize) -> Vec<ConversationTurn> {
    let window = max_turns.saturating_mul(2);
    let mut kept: Vec<ConversationTurn> = if history.len() > window {
        let mut kept = Vec::with_capacity(window + 1);
        if let Some(first) = history.first().filter(|t| t.role == TurnRole::System) {
            kept.push(first.clone());
        }
        kept.extend_from_slice(&history[history.len() - window..]);
        kept
    } else {
        history.to_vec()
    };

    for turn in &mut kept {
        if mentions_tool_blocks(&turn.content) {
            turn.content = sanitize_message(&turn.content);
        }
    }
    kept
}
