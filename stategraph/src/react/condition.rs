//! Router for the ReAct loop.

use crate::graph::END;
use crate::message::{read_messages, MESSAGES_FIELD};
use crate::state::State;

/// Label returned by [`tools_condition`] when the last assistant message requested tools.
pub const TOOLS_LABEL: &str = "tools";

/// Routes to [`TOOLS_LABEL`] when the last message carries tool calls, otherwise to
/// [`END`]. Use with `path_map` `[(TOOLS_LABEL, "tool"), (END, END)]`.
///
/// A missing or undecodable message list routes to END; the decode error is logged at `warn`.
pub fn tools_condition(state: &State) -> String {
    let wants_tools = match read_messages(state, MESSAGES_FIELD) {
        Ok(messages) => messages
            .last()
            .map(|m| !m.tool_calls().is_empty())
            .unwrap_or(false),
        Err(e) => {
            tracing::warn!(
                field = MESSAGES_FIELD,
                error = %e,
                "tools_condition: messages undecodable, routing to END"
            );
            false
        }
    };
    if wants_tools {
        TOOLS_LABEL.to_string()
    } else {
        END.to_string()
    }
}
