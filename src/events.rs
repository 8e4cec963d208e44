//! Runtime events surfaced to the presentation layer.
//!
//! The core broadcasts [`ChatEvent`]s so the UI can show live progress
//! (a listening indicator, the agent's tool calls, streamed answer text).
//! The core's own logic never reads this stream back.

use tokio::sync::broadcast;

/// Default capacity for the event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// An event for live display.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// Voice capture is blocked on the microphone.
    Listening,
    /// Voice capture finished without producing text.
    VoiceUnrecognized,
    /// The agent requested a tool call.
    ToolCall {
        /// Tool call identifier (stable across call/result).
        id: String,
        /// Tool name.
        name: String,
        /// JSON-encoded tool input.
        input_json: String,
    },
    /// A tool call completed.
    ToolResult {
        /// Tool call identifier this result corresponds to.
        id: String,
        /// Tool name.
        name: String,
        /// Whether the tool succeeded.
        success: bool,
        /// Best-effort textual output for display.
        output_text: Option<String>,
    },
    /// A fragment of the assistant's streamed answer.
    AnswerDelta {
        /// The text fragment.
        text: String,
    },
    /// Whether the assistant is currently generating a response.
    Generating {
        /// True while the agent run is in flight.
        active: bool,
    },
}

/// Create a broadcast channel for chat events.
#[must_use]
pub fn channel() -> (broadcast::Sender<ChatEvent>, broadcast::Receiver<ChatEvent>) {
    broadcast::channel(EVENT_CHANNEL_CAPACITY)
}

/// Send an event if a sender is attached, ignoring lagging receivers.
pub(crate) fn emit(tx: Option<&broadcast::Sender<ChatEvent>>, event: ChatEvent) {
    if let Some(tx) = tx {
        let _ = tx.send(event);
    }
}
