//! Groq chat-completions adapter.
//!
//! Groq serves an OpenAI-compatible API at
//! `https://api.groq.com/openai/v1/chat/completions`. Requests always
//! stream; the SSE `data:` chunks are normalized into
//! [`LlmEvent`](super::events::LlmEvent)s.

use std::collections::HashMap;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};

use super::events::{FinishReason, LlmEvent};
use super::message::{Message, MessageContent, Role};
use super::provider::{ChatProvider, LlmEventStream, RequestOptions, ToolDefinition};
use super::sse::SseParser;
use crate::error::ChatError;

/// Configuration for the Groq adapter. Constructed fresh per invocation.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Base URL (defaults to `https://api.groq.com/openai`).
    pub base_url: String,
    /// The fixed model to use.
    pub model: String,
}

impl GroqConfig {
    /// Create a new config with the given API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.groq.com/openai".into(),
            model: model.into(),
        }
    }

    /// Set a custom base URL (tests point this at a mock server).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

// ── Request building ──────────────────────────────────────────

/// Build the JSON request body for the chat-completions endpoint.
pub fn build_chat_request(
    model: &str,
    messages: &[Message],
    options: &RequestOptions,
    tools: &[ToolDefinition],
) -> serde_json::Value {
    let mut body = serde_json::json!({
        "model": model,
        "messages": messages_to_wire(messages),
        "stream": options.stream,
    });

    if let Some(obj) = body.as_object_mut() {
        if let Some(max_tokens) = options.max_tokens {
            obj.insert("max_tokens".into(), serde_json::json!(max_tokens));
        }
        if let Some(temp) = options.temperature {
            obj.insert("temperature".into(), serde_json::json!(temp));
        }
        if !tools.is_empty() {
            let tools_json: Vec<serde_json::Value> = tools
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters,
                        }
                    })
                })
                .collect();
            obj.insert("tools".into(), serde_json::json!(tools_json));
        }
    }

    body
}

/// Convert messages to the chat-completions wire format.
fn messages_to_wire(messages: &[Message]) -> Vec<serde_json::Value> {
    messages.iter().map(message_to_wire).collect()
}

fn message_to_wire(msg: &Message) -> serde_json::Value {
    let role = match msg.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    };

    match &msg.content {
        MessageContent::Text { text } => {
            let mut obj = serde_json::json!({
                "role": role,
                "content": text,
            });

            if !msg.tool_calls.is_empty() {
                let tc_json: Vec<serde_json::Value> = msg
                    .tool_calls
                    .iter()
                    .map(|tc| {
                        serde_json::json!({
                            "id": tc.call_id,
                            "type": "function",
                            "function": {
                                "name": tc.function_name,
                                "arguments": tc.arguments,
                            }
                        })
                    })
                    .collect();
                if let Some(obj) = obj.as_object_mut() {
                    obj.insert("tool_calls".into(), serde_json::json!(tc_json));
                }
            }

            obj
        }
        MessageContent::ToolResult { call_id, content } => {
            serde_json::json!({
                "role": "tool",
                "tool_call_id": call_id,
                "content": content,
            })
        }
    }
}

// ── Response parsing ──────────────────────────────────────────

fn map_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "stop" => FinishReason::Stop,
        "length" => FinishReason::Length,
        "tool_calls" => FinishReason::ToolCalls,
        "content_filter" => FinishReason::ContentFilter,
        _ => FinishReason::Other,
    }
}

/// Tracks in-flight tool calls during streaming.
///
/// The API streams tool calls as incremental chunks keyed by index; this
/// accumulator emits start/delta events as fragments arrive and end
/// events when the stream finishes.
#[derive(Debug, Default)]
pub struct ToolCallAccumulator {
    active_calls: HashMap<u64, ToolCallState>,
}

#[derive(Debug, Clone)]
struct ToolCallState {
    call_id: String,
    function_name: String,
    started: bool,
}

impl ToolCallAccumulator {
    /// Create a new accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one tool-call chunk, returning events to emit.
    pub fn process_chunk(
        &mut self,
        index: u64,
        id: Option<&str>,
        function_name: Option<&str>,
        args_fragment: Option<&str>,
    ) -> Vec<LlmEvent> {
        let mut events = Vec::new();

        let state = self.active_calls.entry(index).or_insert_with(|| ToolCallState {
            call_id: id.unwrap_or("").to_string(),
            function_name: function_name.unwrap_or("").to_string(),
            started: false,
        });

        if let Some(id_val) = id
            && !id_val.is_empty()
        {
            state.call_id = id_val.to_string();
        }
        if let Some(name) = function_name
            && !name.is_empty()
        {
            state.function_name = name.to_string();
        }

        if !state.started {
            state.started = true;
            events.push(LlmEvent::ToolCallStart {
                call_id: state.call_id.clone(),
                function_name: state.function_name.clone(),
            });
        }

        if let Some(args) = args_fragment
            && !args.is_empty()
        {
            events.push(LlmEvent::ToolCallArgsDelta {
                call_id: state.call_id.clone(),
                args_fragment: args.to_string(),
            });
        }

        events
    }

    /// Emit `ToolCallEnd` for all active calls (sorted by index) and reset.
    pub fn finish_all(&mut self) -> Vec<LlmEvent> {
        let mut indices: Vec<u64> = self.active_calls.keys().copied().collect();
        indices.sort_unstable();

        let mut events = Vec::new();
        for idx in indices {
            if let Some(state) = self.active_calls.get(&idx)
                && state.started
            {
                events.push(LlmEvent::ToolCallEnd {
                    call_id: state.call_id.clone(),
                });
            }
        }
        self.active_calls.clear();
        events
    }
}

/// Parse one SSE data payload from the chat-completions stream.
pub fn parse_chat_chunk(data: &str, accumulator: &mut ToolCallAccumulator) -> Vec<LlmEvent> {
    let parsed: serde_json::Value = match serde_json::from_str(data) {
        Ok(v) => v,
        Err(_) => return Vec::new(),
    };

    let mut events = Vec::new();

    if let Some(choices) = parsed.get("choices").and_then(|c| c.as_array()) {
        for choice in choices {
            let Some(delta) = choice.get("delta") else {
                continue;
            };

            if let Some(content) = delta.get("content").and_then(|c| c.as_str())
                && !content.is_empty()
            {
                events.push(LlmEvent::TextDelta {
                    text: content.to_string(),
                });
            }

            if let Some(tool_calls) = delta.get("tool_calls").and_then(|tc| tc.as_array()) {
                for tc in tool_calls {
                    let index = tc.get("index").and_then(|i| i.as_u64()).unwrap_or(0);
                    let id = tc.get("id").and_then(|i| i.as_str());
                    let function = tc.get("function");
                    let function_name =
                        function.and_then(|f| f.get("name")).and_then(|n| n.as_str());
                    let args = function
                        .and_then(|f| f.get("arguments"))
                        .and_then(|a| a.as_str());

                    events.extend(accumulator.process_chunk(index, id, function_name, args));
                }
            }

            if let Some(finish_reason) = choice.get("finish_reason").and_then(|f| f.as_str()) {
                if finish_reason == "tool_calls" {
                    events.extend(accumulator.finish_all());
                }
                events.push(LlmEvent::StreamEnd {
                    finish_reason: map_finish_reason(finish_reason),
                });
            }
        }
    }

    events
}

/// Extract an error message from a provider error response body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}

// ── Adapter ───────────────────────────────────────────────────

/// Groq chat-completions client.
pub struct GroqClient {
    config: GroqConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqClient")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

impl GroqClient {
    /// Create a new client with the given configuration.
    #[must_use]
    pub fn new(config: GroqConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Map an HTTP error status to a chat error.
    fn map_http_error(status: reqwest::StatusCode, body: &str) -> ChatError {
        let message = extract_error_message(body);
        match status.as_u16() {
            401 | 403 => ChatError::Llm(format!("authentication failed: {message}")),
            429 => ChatError::Llm(format!("rate limited: {message}")),
            code => ChatError::Llm(format!("provider HTTP {code}: {message}")),
        }
    }
}

#[async_trait]
impl ChatProvider for GroqClient {
    fn name(&self) -> &str {
        "groq"
    }

    async fn send(
        &self,
        messages: &[Message],
        options: &RequestOptions,
        tools: &[ToolDefinition],
    ) -> Result<LlmEventStream, ChatError> {
        let url = self.endpoint();
        let body = build_chat_request(&self.config.model, messages, options, tools);
        let model = self.config.model.clone();

        tracing::debug!(model = %model, tools = tools.len(), "sending chat-completions request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Llm(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(Self::map_http_error(status, &body_text));
        }

        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Ok(Box::pin(event_stream(
            response.bytes_stream(),
            request_id,
            model,
        )))
    }
}

/// Convert the HTTP byte stream into normalized events.
fn event_stream(
    byte_stream: impl Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
    request_id: String,
    model: String,
) -> impl Stream<Item = LlmEvent> + Send {
    struct StreamState {
        byte_stream: Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>,
        sse_parser: SseParser,
        accumulator: ToolCallAccumulator,
        request_id: String,
        model: String,
        started: bool,
        event_buffer: Vec<LlmEvent>,
    }

    futures_util::stream::unfold(
        StreamState {
            byte_stream: Box::pin(byte_stream),
            sse_parser: SseParser::new(),
            accumulator: ToolCallAccumulator::new(),
            request_id,
            model,
            started: false,
            event_buffer: Vec::new(),
        },
        |mut state| async move {
            loop {
                // Drain buffered events first.
                if let Some(event) = state.event_buffer.pop() {
                    return Some((event, state));
                }

                if !state.started {
                    state.started = true;
                    let start = LlmEvent::StreamStart {
                        request_id: state.request_id.clone(),
                        model: state.model.clone(),
                    };
                    return Some((start, state));
                }

                match state.byte_stream.next().await {
                    Some(Ok(chunk)) => {
                        for payload in state.sse_parser.push(&chunk) {
                            if payload.is_done() {
                                continue;
                            }
                            let events = parse_chat_chunk(&payload.data, &mut state.accumulator);
                            // Buffer in reverse so pop yields stream order.
                            for event in events.into_iter().rev() {
                                state.event_buffer.push(event);
                            }
                        }
                    }
                    Some(Err(e)) => {
                        let err = LlmEvent::StreamError {
                            error: format!("stream read error: {e}"),
                        };
                        return Some((err, state));
                    }
                    None => {
                        if let Some(payload) = state.sse_parser.flush()
                            && !payload.is_done()
                        {
                            let events = parse_chat_chunk(&payload.data, &mut state.accumulator);
                            for event in events.into_iter().rev() {
                                state.event_buffer.push(event);
                            }
                            continue;
                        }
                        return None;
                    }
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::message::AssistantToolCall;
    use crate::llm::sse::parse_sse_text;

    // ── GroqConfig ────────────────────────────────────────────

    #[test]
    fn config_defaults_to_groq_endpoint() {
        let config = GroqConfig::new("gsk-test", "llama3-8b-8192");
        assert_eq!(config.base_url, "https://api.groq.com/openai");
        assert_eq!(config.model, "llama3-8b-8192");
    }

    #[test]
    fn config_with_base_url() {
        let config = GroqConfig::new("k", "m").with_base_url("http://127.0.0.1:9999");
        assert_eq!(config.base_url, "http://127.0.0.1:9999");
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let client = GroqClient::new(GroqConfig::new("k", "m").with_base_url("http://host/"));
        assert_eq!(client.endpoint(), "http://host/v1/chat/completions");
    }

    // ── Request building ──────────────────────────────────────

    #[test]
    fn chat_request_basic() {
        let messages = vec![Message::user("Hello")];
        let body = build_chat_request("llama3-8b-8192", &messages, &RequestOptions::new(), &[]);

        assert_eq!(body["model"], "llama3-8b-8192");
        assert_eq!(body["stream"], true);
        assert_eq!(body["messages"].as_array().map(|m| m.len()), Some(1));
        assert_eq!(body["messages"][0]["role"], "user");
    }

    #[test]
    fn chat_request_with_options() {
        let options = RequestOptions::new().with_max_tokens(512).with_temperature(0.3);
        let body = build_chat_request("m", &[], &options, &[]);
        assert_eq!(body["max_tokens"], 512);
        assert_eq!(body["temperature"], 0.3);
    }

    #[test]
    fn chat_request_with_tools() {
        let tools = vec![ToolDefinition::new(
            "wikipedia",
            "Look up articles",
            serde_json::json!({"type": "object", "properties": {"query": {"type": "string"}}}),
        )];
        let body = build_chat_request("m", &[], &RequestOptions::new(), &tools);

        let tools_arr = body["tools"].as_array().expect("tools array");
        assert_eq!(tools_arr.len(), 1);
        assert_eq!(tools_arr[0]["type"], "function");
        assert_eq!(tools_arr[0]["function"]["name"], "wikipedia");
    }

    #[test]
    fn chat_request_message_roles() {
        let messages = vec![
            Message::system("You are helpful."),
            Message::user("Hi"),
            Message::assistant("Hello!"),
            Message::tool_result("call_1", "tool output"),
        ];
        let body = build_chat_request("m", &messages, &RequestOptions::new(), &[]);
        let msgs = body["messages"].as_array().expect("messages");
        assert_eq!(msgs[0]["role"], "system");
        assert_eq!(msgs[1]["role"], "user");
        assert_eq!(msgs[2]["role"], "assistant");
        assert_eq!(msgs[3]["role"], "tool");
        assert_eq!(msgs[3]["tool_call_id"], "call_1");
    }

    #[test]
    fn chat_request_assistant_tool_calls() {
        let messages = vec![Message::assistant_with_tool_calls(
            None,
            vec![AssistantToolCall {
                call_id: "call_abc".into(),
                function_name: "arxiv".into(),
                arguments: r#"{"query":"attention"}"#.into(),
            }],
        )];
        let body = build_chat_request("m", &messages, &RequestOptions::new(), &[]);
        let tcs = body["messages"][0]["tool_calls"].as_array().expect("tool calls");
        assert_eq!(tcs[0]["id"], "call_abc");
        assert_eq!(tcs[0]["function"]["name"], "arxiv");
    }

    // ── Finish reason mapping ─────────────────────────────────

    #[test]
    fn finish_reason_mapping() {
        assert_eq!(map_finish_reason("stop"), FinishReason::Stop);
        assert_eq!(map_finish_reason("length"), FinishReason::Length);
        assert_eq!(map_finish_reason("tool_calls"), FinishReason::ToolCalls);
        assert_eq!(map_finish_reason("content_filter"), FinishReason::ContentFilter);
        assert_eq!(map_finish_reason("mystery"), FinishReason::Other);
    }

    // ── Tool call accumulator ─────────────────────────────────

    #[test]
    fn accumulator_single_tool_call() {
        let mut acc = ToolCallAccumulator::new();

        let events = acc.process_chunk(0, Some("call_1"), Some("search"), None);
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], LlmEvent::ToolCallStart { call_id, function_name }
            if call_id == "call_1" && function_name == "search"));

        let events = acc.process_chunk(0, None, None, Some(r#"{"query":"#));
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], LlmEvent::ToolCallArgsDelta { .. }));

        let events = acc.finish_all();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], LlmEvent::ToolCallEnd { call_id } if call_id == "call_1"));
    }

    #[test]
    fn accumulator_finish_is_ordered_by_index() {
        let mut acc = ToolCallAccumulator::new();
        acc.process_chunk(1, Some("call_b"), Some("search"), None);
        acc.process_chunk(0, Some("call_a"), Some("search"), None);

        let events = acc.finish_all();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], LlmEvent::ToolCallEnd { call_id } if call_id == "call_a"));
        assert!(matches!(&events[1], LlmEvent::ToolCallEnd { call_id } if call_id == "call_b"));
    }

    #[test]
    fn accumulator_empty_finish() {
        assert!(ToolCallAccumulator::new().finish_all().is_empty());
    }

    // ── parse_chat_chunk ──────────────────────────────────────

    #[test]
    fn parse_text_delta() {
        let data = r#"{"choices":[{"delta":{"content":"Hello"},"index":0}]}"#;
        let mut acc = ToolCallAccumulator::new();
        let events = parse_chat_chunk(data, &mut acc);
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], LlmEvent::TextDelta { text } if text == "Hello"));
    }

    #[test]
    fn parse_empty_content_skipped() {
        let data = r#"{"choices":[{"delta":{"content":""},"index":0}]}"#;
        let mut acc = ToolCallAccumulator::new();
        assert!(parse_chat_chunk(data, &mut acc).is_empty());
    }

    #[test]
    fn parse_finish_reason_stop() {
        let data = r#"{"choices":[{"delta":{},"finish_reason":"stop","index":0}]}"#;
        let mut acc = ToolCallAccumulator::new();
        let events = parse_chat_chunk(data, &mut acc);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            LlmEvent::StreamEnd { finish_reason: FinishReason::Stop }
        ));
    }

    #[test]
    fn parse_finish_tool_calls_closes_active_calls() {
        let mut acc = ToolCallAccumulator::new();
        acc.process_chunk(0, Some("call_1"), Some("search"), None);

        let data = r#"{"choices":[{"delta":{},"finish_reason":"tool_calls","index":0}]}"#;
        let events = parse_chat_chunk(data, &mut acc);
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], LlmEvent::ToolCallEnd { .. }));
        assert!(matches!(
            &events[1],
            LlmEvent::StreamEnd { finish_reason: FinishReason::ToolCalls }
        ));
    }

    #[test]
    fn parse_tool_call_start_and_args() {
        let start = r#"{"choices":[{"delta":{"tool_calls":[{"index":0,"id":"call_x","function":{"name":"wikipedia","arguments":""}}]},"index":0}]}"#;
        let mut acc = ToolCallAccumulator::new();
        let events = parse_chat_chunk(start, &mut acc);
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], LlmEvent::ToolCallStart { function_name, .. }
            if function_name == "wikipedia"));

        let args = r#"{"choices":[{"delta":{"tool_calls":[{"index":0,"function":{"arguments":"{\"query\":"}}]},"index":0}]}"#;
        let events = parse_chat_chunk(args, &mut acc);
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], LlmEvent::ToolCallArgsDelta { call_id, args_fragment }
            if call_id == "call_x" && args_fragment == r#"{"query":"#));
    }

    #[test]
    fn parse_invalid_json_returns_empty() {
        let mut acc = ToolCallAccumulator::new();
        assert!(parse_chat_chunk("not json", &mut acc).is_empty());
    }

    // ── Error extraction ──────────────────────────────────────

    #[test]
    fn extract_error_from_json_body() {
        let body = r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error"}}"#;
        assert_eq!(extract_error_message(body), "Invalid API Key");
    }

    #[test]
    fn extract_error_falls_back_to_raw_body() {
        assert_eq!(extract_error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn http_error_mapping() {
        let err = GroqClient::map_http_error(
            reqwest::StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"Invalid API Key"}}"#,
        );
        assert!(err.to_string().contains("authentication failed"));
        assert!(err.to_string().contains("Invalid API Key"));

        let err = GroqClient::map_http_error(reqwest::StatusCode::TOO_MANY_REQUESTS, "{}");
        assert!(err.to_string().contains("rate limited"));

        let err = GroqClient::map_http_error(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(err.to_string().contains("HTTP 500"));
    }

    // ── Full SSE stream simulation ────────────────────────────

    #[test]
    fn full_stream_text_only() {
        let sse_body = concat!(
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"},\"index\":0}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hello\"},\"index\":0}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\" world\"},\"index\":0}]}\n\n",
            "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\",\"index\":0}]}\n\n",
            "data: [DONE]\n\n",
        );

        let mut acc = ToolCallAccumulator::new();
        let mut all_events = Vec::new();
        for payload in parse_sse_text(sse_body) {
            if payload.is_done() {
                continue;
            }
            all_events.extend(parse_chat_chunk(&payload.data, &mut acc));
        }

        let text: String = all_events
            .iter()
            .filter_map(|e| match e {
                LlmEvent::TextDelta { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(text, "Hello world");
        assert!(matches!(
            all_events.last(),
            Some(LlmEvent::StreamEnd { finish_reason: FinishReason::Stop })
        ));
    }

    #[test]
    fn full_stream_with_tool_call() {
        let sse_body = concat!(
            "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"id\":\"call_1\",\"type\":\"function\",\"function\":{\"name\":\"arxiv\",\"arguments\":\"\"}}]},\"index\":0}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"function\":{\"arguments\":\"{\\\"query\\\"\"}}]},\"index\":0}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"index\":0,\"function\":{\"arguments\":\":\\\"attention\\\"}\"}}]},\"index\":0}]}\n\n",
            "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"tool_calls\",\"index\":0}]}\n\n",
            "data: [DONE]\n\n",
        );

        let mut acc = ToolCallAccumulator::new();
        let mut all_events = Vec::new();
        for payload in parse_sse_text(sse_body) {
            if payload.is_done() {
                continue;
            }
            all_events.extend(parse_chat_chunk(&payload.data, &mut acc));
        }

        assert!(all_events.iter().any(|e| matches!(e,
            LlmEvent::ToolCallStart { function_name, .. } if function_name == "arxiv")));

        let args: String = all_events
            .iter()
            .filter_map(|e| match e {
                LlmEvent::ToolCallArgsDelta { args_fragment, .. } => Some(args_fragment.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(args, r#"{"query":"attention"}"#);

        assert!(matches!(
            all_events.last(),
            Some(LlmEvent::StreamEnd { finish_reason: FinishReason::ToolCalls })
        ));
    }

    #[test]
    fn client_debug_hides_api_key() {
        let client = GroqClient::new(GroqConfig::new("gsk-secret", "llama3-8b-8192"));
        let debug = format!("{client:?}");
        assert!(debug.contains("llama3-8b-8192"));
        assert!(!debug.contains("gsk-secret"));
    }
}
