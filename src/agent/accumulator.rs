//! Stream accumulator: collects provider events into structured turn data.

use std::collections::HashMap;

use crate::llm::events::{FinishReason, LlmEvent};

/// A completed tool call extracted from the event stream, with its full
/// JSON arguments string reassembled from streaming deltas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccumulatedToolCall {
    /// The unique call ID from the model.
    pub call_id: String,
    /// The function name being called.
    pub function_name: String,
    /// The full JSON arguments string.
    pub arguments_json: String,
}

/// The result of accumulating one complete response stream.
#[derive(Debug, Clone)]
pub struct AccumulatedTurn {
    /// Full text output (all `TextDelta`s concatenated).
    pub text: String,
    /// Completed tool calls with reassembled arguments.
    pub tool_calls: Vec<AccumulatedToolCall>,
    /// Why the stream ended.
    pub finish_reason: FinishReason,
    /// Error message if the stream reported one.
    pub error: Option<String>,
}

#[derive(Debug)]
struct ToolCallInProgress {
    call_id: String,
    function_name: String,
    args_buffer: String,
}

/// Accumulates [`LlmEvent`]s into an [`AccumulatedTurn`].
///
/// Handles parallel tool calls (multiple call IDs in one stream) by
/// tracking each in-progress call independently; completion order follows
/// the order of the start events.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    text: String,
    in_progress: HashMap<String, ToolCallInProgress>,
    completed: Vec<AccumulatedToolCall>,
    call_order: Vec<String>,
    finish_reason: Option<FinishReason>,
    error: Option<String>,
}

impl StreamAccumulator {
    /// Create a new empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event in stream order.
    pub fn push(&mut self, event: LlmEvent) {
        match event {
            LlmEvent::StreamStart { .. } => {}
            LlmEvent::TextDelta { text } => self.text.push_str(&text),
            LlmEvent::ToolCallStart {
                call_id,
                function_name,
            } => {
                self.call_order.push(call_id.clone());
                self.in_progress.insert(
                    call_id.clone(),
                    ToolCallInProgress {
                        call_id,
                        function_name,
                        args_buffer: String::new(),
                    },
                );
            }
            LlmEvent::ToolCallArgsDelta {
                call_id,
                args_fragment,
            } => {
                if let Some(tc) = self.in_progress.get_mut(&call_id) {
                    tc.args_buffer.push_str(&args_fragment);
                }
            }
            LlmEvent::ToolCallEnd { call_id } => {
                if let Some(tc) = self.in_progress.remove(&call_id) {
                    self.completed.push(AccumulatedToolCall {
                        call_id: tc.call_id,
                        function_name: tc.function_name,
                        arguments_json: tc.args_buffer,
                    });
                }
            }
            LlmEvent::StreamEnd { finish_reason } => {
                self.finish_reason = Some(finish_reason);
            }
            LlmEvent::StreamError { error } => {
                self.error = Some(error);
            }
        }
    }

    /// Consume the accumulator and return the completed turn.
    ///
    /// Tool calls still in progress are completed with whatever arguments
    /// arrived before the stream ended.
    #[must_use]
    pub fn finish(mut self) -> AccumulatedTurn {
        for call_id in &self.call_order {
            if let Some(tc) = self.in_progress.remove(call_id) {
                self.completed.push(AccumulatedToolCall {
                    call_id: tc.call_id,
                    function_name: tc.function_name,
                    arguments_json: tc.args_buffer,
                });
            }
        }

        AccumulatedTurn {
            text: self.text,
            tool_calls: self.completed,
            finish_reason: self.finish_reason.unwrap_or(FinishReason::Other),
            error: self.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_text() {
        let mut acc = StreamAccumulator::new();
        acc.push(LlmEvent::StreamStart {
            request_id: "r1".into(),
            model: "llama3-8b-8192".into(),
        });
        acc.push(LlmEvent::TextDelta { text: "Hel".into() });
        acc.push(LlmEvent::TextDelta { text: "lo".into() });
        acc.push(LlmEvent::StreamEnd {
            finish_reason: FinishReason::Stop,
        });

        let turn = acc.finish();
        assert_eq!(turn.text, "Hello");
        assert_eq!(turn.finish_reason, FinishReason::Stop);
        assert!(turn.tool_calls.is_empty());
        assert!(turn.error.is_none());
    }

    #[test]
    fn reassembles_tool_call_arguments() {
        let mut acc = StreamAccumulator::new();
        acc.push(LlmEvent::ToolCallStart {
            call_id: "call_1".into(),
            function_name: "search".into(),
        });
        acc.push(LlmEvent::ToolCallArgsDelta {
            call_id: "call_1".into(),
            args_fragment: r#"{"query":"#.into(),
        });
        acc.push(LlmEvent::ToolCallArgsDelta {
            call_id: "call_1".into(),
            args_fragment: r#""rust"}"#.into(),
        });
        acc.push(LlmEvent::ToolCallEnd {
            call_id: "call_1".into(),
        });
        acc.push(LlmEvent::StreamEnd {
            finish_reason: FinishReason::ToolCalls,
        });

        let turn = acc.finish();
        assert_eq!(turn.tool_calls.len(), 1);
        assert_eq!(turn.tool_calls[0].function_name, "search");
        assert_eq!(turn.tool_calls[0].arguments_json, r#"{"query":"rust"}"#);
    }

    #[test]
    fn completes_dangling_tool_call_on_finish() {
        let mut acc = StreamAccumulator::new();
        acc.push(LlmEvent::ToolCallStart {
            call_id: "call_1".into(),
            function_name: "arxiv".into(),
        });
        acc.push(LlmEvent::ToolCallArgsDelta {
            call_id: "call_1".into(),
            args_fragment: r#"{"query":"att"#.into(),
        });
        // No ToolCallEnd before the stream stops.

        let turn = acc.finish();
        assert_eq!(turn.tool_calls.len(), 1);
        assert_eq!(turn.tool_calls[0].arguments_json, r#"{"query":"att"#);
    }

    #[test]
    fn parallel_calls_complete_in_start_order() {
        let mut acc = StreamAccumulator::new();
        acc.push(LlmEvent::ToolCallStart {
            call_id: "a".into(),
            function_name: "search".into(),
        });
        acc.push(LlmEvent::ToolCallStart {
            call_id: "b".into(),
            function_name: "search".into(),
        });
        acc.push(LlmEvent::ToolCallEnd { call_id: "b".into() });
        acc.push(LlmEvent::ToolCallEnd { call_id: "a".into() });

        let turn = acc.finish();
        // End-event order wins for explicitly ended calls.
        assert_eq!(turn.tool_calls.len(), 2);
        assert_eq!(turn.tool_calls[0].call_id, "b");
        assert_eq!(turn.tool_calls[1].call_id, "a");
    }

    #[test]
    fn records_stream_error() {
        let mut acc = StreamAccumulator::new();
        acc.push(LlmEvent::StreamError {
            error: "connection reset".into(),
        });
        let turn = acc.finish();
        assert_eq!(turn.error.as_deref(), Some("connection reset"));
    }

    #[test]
    fn missing_stream_end_defaults_to_other() {
        let acc = StreamAccumulator::new();
        let turn = acc.finish();
        assert_eq!(turn.finish_reason, FinishReason::Other);
    }

    #[test]
    fn args_delta_for_unknown_call_is_ignored() {
        let mut acc = StreamAccumulator::new();
        acc.push(LlmEvent::ToolCallArgsDelta {
            call_id: "ghost".into(),
            args_fragment: "{}".into(),
        });
        let turn = acc.finish();
        assert!(turn.tool_calls.is_empty());
    }
}
