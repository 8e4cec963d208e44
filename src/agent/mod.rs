//! The tool-calling agent loop.
//!
//! Drives one conversation turn to a final answer: send the transcript to
//! the provider, stream the response, execute any requested tool calls,
//! feed the results back, and repeat until the model stops with text.
//!
//! The loop applies no retry, backoff, or cancellation; a failed provider
//! request ends the run with an error stop reason. Malformed tool-call
//! arguments are tolerated — the parse error is returned to the model as
//! the tool result so it can correct itself.

pub mod accumulator;
pub mod types;

pub use accumulator::{AccumulatedToolCall, AccumulatedTurn, StreamAccumulator};
pub use types::{AgentConfig, AgentRunResult, ExecutedToolCall, StopReason, TurnResult};

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::broadcast;

use crate::error::{ChatError, Result};
use crate::events::{emit, ChatEvent};
use crate::llm::events::{FinishReason, LlmEvent};
use crate::llm::message::{AssistantToolCall, Message};
use crate::llm::provider::{ChatProvider, RequestOptions, ToolDefinition};
use crate::tools::{ToolRegistry, ToolResult};
use crate::transcript::{Transcript, TurnRole};

/// Lower temperature improves tool-calling judgment on small models.
const TOOL_JUDGMENT_TEMPERATURE: f64 = 0.2;

/// Build the provider message view of a transcript.
///
/// The transcript is the canonical history; this derived view prepends
/// the system prompt and maps each turn to a provider message.
#[must_use]
pub fn messages_from_transcript(transcript: &Transcript, system_prompt: Option<&str>) -> Vec<Message> {
    let mut messages = Vec::with_capacity(transcript.len() + 1);
    if let Some(prompt) = system_prompt {
        messages.push(Message::system(prompt));
    }
    for turn in transcript.all() {
        let message = match turn.role {
            TurnRole::User => Message::user(&turn.content),
            TurnRole::Assistant => Message::assistant(&turn.content),
        };
        messages.push(message);
    }
    messages
}

/// The agent loop: a provider, a (single-tool) registry, and loop bounds.
pub struct AgentLoop {
    config: AgentConfig,
    provider: Arc<dyn ChatProvider>,
    registry: Arc<ToolRegistry>,
    tool_definitions: Vec<ToolDefinition>,
    events_tx: Option<broadcast::Sender<ChatEvent>>,
}

impl AgentLoop {
    /// Create a new agent loop.
    ///
    /// Tool definitions are exported from the registry once, up front.
    #[must_use]
    pub fn new(config: AgentConfig, provider: Arc<dyn ChatProvider>, registry: Arc<ToolRegistry>) -> Self {
        let tool_definitions: Vec<ToolDefinition> = registry
            .schemas_for_api()
            .into_iter()
            .filter_map(|schema| {
                let name = schema.get("name")?.as_str()?.to_string();
                let description = schema.get("description")?.as_str()?.to_string();
                let parameters = schema.get("parameters")?.clone();
                Some(ToolDefinition::new(name, description, parameters))
            })
            .collect();

        Self {
            config,
            provider,
            registry,
            tool_definitions,
            events_tx: None,
        }
    }

    /// Attach an event channel for live tool-call and answer display.
    #[must_use]
    pub fn with_events(mut self, tx: broadcast::Sender<ChatEvent>) -> Self {
        self.events_tx = Some(tx);
        self
    }

    /// Run the loop over pre-built provider messages.
    ///
    /// The configured system prompt is prepended unless the messages
    /// already open with one.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError`] only for internal channel failures; provider
    /// and tool failures are captured in the result's stop reason.
    pub async fn run(&self, mut messages: Vec<Message>) -> Result<AgentRunResult> {
        if let Some(prompt) = &self.config.system_prompt
            && !messages
                .iter()
                .any(|m| m.role == crate::llm::message::Role::System)
        {
            messages.insert(0, Message::system(prompt));
        }

        let mut turns: Vec<TurnResult> = Vec::new();

        let mut options = RequestOptions::new();
        if !self.tool_definitions.is_empty() {
            options = options.with_temperature(TOOL_JUDGMENT_TEMPERATURE);
        }

        for turn_idx in 0..self.config.max_turns {
            tracing::debug!(
                turn = turn_idx + 1,
                max_turns = self.config.max_turns,
                "starting agent turn"
            );

            let stream = match self
                .provider
                .send(&messages, &options, &self.tool_definitions)
                .await
            {
                Ok(stream) => stream,
                Err(e) => {
                    return Ok(AgentRunResult {
                        final_text: last_text(&turns),
                        turns,
                        stop_reason: StopReason::Error(e.to_string()),
                    });
                }
            };

            let mut acc = StreamAccumulator::new();
            let mut stream = stream;
            while let Some(event) = stream.next().await {
                if let LlmEvent::TextDelta { text } = &event {
                    emit(
                        self.events_tx.as_ref(),
                        ChatEvent::AnswerDelta { text: text.clone() },
                    );
                }
                acc.push(event);
            }
            let accumulated = acc.finish();

            if let Some(error) = accumulated.error {
                turns.push(TurnResult {
                    text: accumulated.text,
                    tool_calls: Vec::new(),
                    finish_reason: accumulated.finish_reason,
                });
                return Ok(AgentRunResult {
                    final_text: last_text(&turns),
                    turns,
                    stop_reason: StopReason::Error(error),
                });
            }

            if accumulated.finish_reason == FinishReason::ToolCalls
                && !accumulated.tool_calls.is_empty()
            {
                tracing::info!(
                    count = accumulated.tool_calls.len(),
                    "model requested tool calls"
                );

                if accumulated.tool_calls.len() as u32 > self.config.max_tool_calls_per_turn {
                    turns.push(TurnResult {
                        text: accumulated.text,
                        tool_calls: Vec::new(),
                        finish_reason: accumulated.finish_reason,
                    });
                    return Ok(AgentRunResult {
                        final_text: last_text(&turns),
                        turns,
                        stop_reason: StopReason::MaxToolCalls,
                    });
                }

                // The assistant message carrying the calls precedes the
                // tool result messages on the wire.
                let assistant_calls: Vec<AssistantToolCall> = accumulated
                    .tool_calls
                    .iter()
                    .map(|tc| AssistantToolCall {
                        call_id: tc.call_id.clone(),
                        function_name: tc.function_name.clone(),
                        arguments: tc.arguments_json.clone(),
                    })
                    .collect();
                let text = if accumulated.text.is_empty() {
                    None
                } else {
                    Some(accumulated.text.clone())
                };
                messages.push(Message::assistant_with_tool_calls(text, assistant_calls));

                let mut executed = Vec::new();
                for call in &accumulated.tool_calls {
                    let exec = self.execute_call(call).await;
                    let content = if exec.result.success {
                        exec.result.content.clone()
                    } else {
                        exec.result
                            .error
                            .clone()
                            .unwrap_or_else(|| "tool execution failed".to_string())
                    };
                    messages.push(Message::tool_result(&exec.call_id, content));
                    executed.push(exec);
                }

                turns.push(TurnResult {
                    text: accumulated.text,
                    tool_calls: executed,
                    finish_reason: accumulated.finish_reason,
                });
                continue;
            }

            // Final turn: the model stopped with text.
            turns.push(TurnResult {
                text: accumulated.text,
                tool_calls: Vec::new(),
                finish_reason: accumulated.finish_reason,
            });
            return Ok(AgentRunResult {
                final_text: last_text(&turns),
                turns,
                stop_reason: StopReason::Complete,
            });
        }

        Ok(AgentRunResult {
            final_text: last_text(&turns),
            turns,
            stop_reason: StopReason::MaxTurns,
        })
    }

    /// Execute one accumulated tool call, never failing the loop.
    ///
    /// Unknown tools and malformed arguments become failure results fed
    /// back to the model as tool output.
    async fn execute_call(&self, call: &AccumulatedToolCall) -> ExecutedToolCall {
        emit(
            self.events_tx.as_ref(),
            ChatEvent::ToolCall {
                id: call.call_id.clone(),
                name: call.function_name.clone(),
                input_json: call.arguments_json.clone(),
            },
        );

        let (arguments, result) = match self.resolve_and_run(call).await {
            Ok((args, result)) => (args, result),
            Err(e) => (serde_json::Value::Null, ToolResult::failure(e.to_string())),
        };

        emit(
            self.events_tx.as_ref(),
            ChatEvent::ToolResult {
                id: call.call_id.clone(),
                name: call.function_name.clone(),
                success: result.success,
                output_text: if result.success {
                    Some(result.content.clone())
                } else {
                    result.error.clone()
                },
            },
        );

        ExecutedToolCall {
            call_id: call.call_id.clone(),
            function_name: call.function_name.clone(),
            arguments,
            result,
        }
    }

    async fn resolve_and_run(
        &self,
        call: &AccumulatedToolCall,
    ) -> Result<(serde_json::Value, ToolResult)> {
        let Some(tool) = self.registry.get(&call.function_name) else {
            tracing::warn!(tool = %call.function_name, "model requested unregistered tool");
            return Ok((
                serde_json::Value::Null,
                ToolResult::failure(format!("unknown tool: {}", call.function_name)),
            ));
        };

        let raw = if call.arguments_json.trim().is_empty() {
            "{}"
        } else {
            call.arguments_json.as_str()
        };
        let arguments: serde_json::Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(tool = %call.function_name, "malformed tool arguments: {e}");
                return Ok((
                    serde_json::Value::Null,
                    ToolResult::failure(format!("invalid tool arguments: {e}")),
                ));
            }
        };

        // Tools are synchronous and may block on their own HTTP bridge.
        let args_for_tool = arguments.clone();
        let joined = tokio::task::spawn_blocking(move || tool.execute(args_for_tool))
            .await
            .map_err(|e| ChatError::Agent(format!("tool task failed: {e}")))?;

        let result = match joined {
            Ok(result) => result,
            Err(e) => ToolResult::failure(e.to_string()),
        };
        Ok((arguments, result))
    }
}

/// The most recent non-empty turn text.
fn last_text(turns: &[TurnResult]) -> String {
    turns
        .iter()
        .rev()
        .find(|t| !t.text.trim().is_empty())
        .map(|t| t.text.clone())
        .unwrap_or_default()
}
