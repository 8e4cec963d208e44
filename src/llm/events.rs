//! Normalized streaming event model for the LLM provider.
//!
//! The provider converts its wire format into [`LlmEvent`]s so the agent
//! loop never sees provider-specific JSON.
//!
//! A typical stream flows:
//! ```text
//! StreamStart → TextDelta* → StreamEnd
//! ```
//!
//! With a tool call:
//! ```text
//! StreamStart → ToolCallStart → ToolCallArgsDelta* → ToolCallEnd → StreamEnd
//! ```

/// A normalized streaming event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmEvent {
    /// Stream has started. First event in every stream.
    StreamStart {
        /// Unique identifier for this request.
        request_id: String,
        /// The model serving it.
        model: String,
    },

    /// A chunk of generated text.
    TextDelta {
        /// The text fragment.
        text: String,
    },

    /// A tool call has started.
    ToolCallStart {
        /// Identifier linking all events for this tool call.
        call_id: String,
        /// The function being called.
        function_name: String,
    },

    /// A chunk of tool call arguments (streaming JSON).
    ToolCallArgsDelta {
        /// Identifier linking this delta to its start event.
        call_id: String,
        /// A fragment of the JSON arguments string.
        args_fragment: String,
    },

    /// A tool call's arguments are complete.
    ToolCallEnd {
        /// Identifier linking this end to its start event.
        call_id: String,
    },

    /// Stream has ended normally.
    StreamEnd {
        /// Why the model stopped generating.
        finish_reason: FinishReason,
    },

    /// Stream encountered an error.
    StreamError {
        /// Description of what went wrong.
        error: String,
    },
}

/// The reason the model stopped generating output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop (end of response).
    Stop,
    /// Hit the max token limit.
    Length,
    /// Model wants to call one or more tools.
    ToolCalls,
    /// Content was filtered by safety systems.
    ContentFilter,
    /// Provider-specific or unknown reason.
    Other,
}

impl std::fmt::Display for FinishReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stop => write!(f, "stop"),
            Self::Length => write!(f, "length"),
            Self::ToolCalls => write!(f, "tool_calls"),
            Self::ContentFilter => write!(f, "content_filter"),
            Self::Other => write!(f, "other"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_reason_display() {
        assert_eq!(FinishReason::Stop.to_string(), "stop");
        assert_eq!(FinishReason::ToolCalls.to_string(), "tool_calls");
        assert_eq!(FinishReason::Length.to_string(), "length");
    }

    #[test]
    fn events_compare_by_content() {
        let a = LlmEvent::TextDelta { text: "hi".into() };
        let b = LlmEvent::TextDelta { text: "hi".into() };
        assert_eq!(a, b);
        assert_ne!(
            a,
            LlmEvent::StreamEnd {
                finish_reason: FinishReason::Stop
            }
        );
    }

    #[test]
    fn tool_call_events_share_call_id() {
        let events = [
            LlmEvent::ToolCallStart {
                call_id: "tc_1".into(),
                function_name: "search".into(),
            },
            LlmEvent::ToolCallArgsDelta {
                call_id: "tc_1".into(),
                args_fragment: r#"{"query":"#.into(),
            },
            LlmEvent::ToolCallEnd {
                call_id: "tc_1".into(),
            },
        ];
        let ids: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                LlmEvent::ToolCallStart { call_id, .. }
                | LlmEvent::ToolCallArgsDelta { call_id, .. }
                | LlmEvent::ToolCallEnd { call_id } => Some(call_id.as_str()),
                _ => None,
            })
            .collect();
        assert!(ids.iter().all(|id| *id == "tc_1"));
    }

    #[test]
    fn finish_reason_serde_round_trip() {
        for reason in [
            FinishReason::Stop,
            FinishReason::Length,
            FinishReason::ToolCalls,
            FinishReason::ContentFilter,
            FinishReason::Other,
        ] {
            let json = serde_json::to_string(&reason).expect("serialize");
            let parsed: FinishReason = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(parsed, reason);
        }
    }
}
