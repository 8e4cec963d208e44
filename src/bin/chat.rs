//! Terminal chat front end.
//!
//! The presentation layer: reads typed input line by line, drives the
//! session core, and renders the transcript plus live tool-call events.
//! `/voice` captures one utterance from the microphone and appends the
//! transcribed text as a user turn (the next typed submit runs the agent
//! over the full history, like the original's voice button).

use std::io::{BufRead, Write};

use sibyl::voice::{HttpTranscriber, listen_and_transcribe};
use sibyl::{ChatConfig, ChatEvent, CredentialRef, Orchestrator, SessionContext, ToolSelection};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sibyl=info")),
        )
        .init();

    let config_path = ChatConfig::default_config_path();
    let config = if config_path.exists() {
        ChatConfig::from_file(&config_path)?
    } else {
        ChatConfig::default()
    };

    let mut session = SessionContext::new(config);
    if !session.has_credential() {
        session.set_credential(resolve_credential()?);
    }

    let (events_tx, events_rx) = sibyl::events::channel();
    tokio::spawn(render_events(events_rx));
    let orchestrator = Orchestrator::new().with_events(events_tx.clone());

    println!("bot: {}", sibyl::GREETING);
    println!("(commands: /tool <duckduckgo|arxiv|wikipedia>, /voice, /history, /quit)");

    let stdin = std::io::stdin();
    loop {
        print!("you: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(' ').map_or((line, ""), |(a, b)| (a, b)) {
            ("/quit", _) => break,
            ("/history", _) => {
                for turn in session.transcript.all() {
                    println!("{}: {}", turn.role, turn.content);
                }
            }
            ("/tool", rest) => match rest.parse::<ToolSelection>() {
                Ok(selection) => {
                    session.select_tool(selection);
                    println!("(search source: {selection})");
                }
                Err(e) => eprintln!("{e}"),
            },
            ("/voice", _) => {
                let voice_config = session.config.voice.clone();
                let api_key = session.credential.resolve_plaintext();
                let tx = events_tx.clone();
                let text = tokio::task::spawn_blocking(move || {
                    let transcriber = HttpTranscriber::new(&voice_config, api_key);
                    listen_and_transcribe(&voice_config, &transcriber, Some(&tx))
                })
                .await?;

                if text.is_empty() {
                    println!("(sorry, could not recognize your voice)");
                } else {
                    println!("you (voice): {text}");
                    session.push_user_turn(text);
                }
            }
            _ => {
                session.push_user_turn(line);
                if !session.has_credential() {
                    eprintln!("no API key configured; set GROQ_API_KEY or restart and enter one");
                    continue;
                }
                match orchestrator.handle(&mut session).await {
                    Ok(turn) => println!("bot: {}", turn.content),
                    Err(e) => eprintln!("error: {e}"),
                }
            }
        }
    }

    Ok(())
}

/// Take the API key from the environment or prompt for it.
fn resolve_credential() -> anyhow::Result<CredentialRef> {
    if std::env::var("GROQ_API_KEY").is_ok_and(|v| !v.trim().is_empty()) {
        return Ok(CredentialRef::Env {
            var: "GROQ_API_KEY".to_owned(),
        });
    }

    print!("Enter your GROQ API key: ");
    std::io::stdout().flush()?;
    let mut key = String::new();
    std::io::stdin().read_line(&mut key)?;
    Ok(CredentialRef::plaintext(key.trim()))
}

/// Render live events to stderr so stdout stays a clean chat log.
async fn render_events(mut rx: tokio::sync::broadcast::Receiver<ChatEvent>) {
    loop {
        let event = match rx.recv().await {
            Ok(event) => event,
            Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
        };
        match event {
            ChatEvent::Listening => eprintln!("(listening...)"),
            ChatEvent::VoiceUnrecognized => {}
            ChatEvent::ToolCall { name, input_json, .. } => {
                eprintln!("(calling {name} with {input_json})");
            }
            ChatEvent::ToolResult { name, success, .. } => {
                let status = if success { "ok" } else { "failed" };
                eprintln!("({name} {status})");
            }
            ChatEvent::AnswerDelta { .. } | ChatEvent::Generating { .. } => {}
        }
    }
}
