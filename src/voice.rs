//! Voice input: blocking microphone capture plus speech-to-text.
//!
//! The adapter blocks its caller while sampling from the default input
//! device, encodes the audio as WAV, and sends it to a transcription
//! endpoint. The whole path is fail-soft: any failure (no device, HTTP
//! error, nothing recognized) yields an empty string and a status event,
//! never an error — a failed capture is equivalent to "no new user input".

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::time::{Duration, Instant};
use tokio::sync::broadcast;

use crate::config::VoiceConfig;
use crate::error::{ChatError, Result};
use crate::events::{emit, ChatEvent};

/// Speech-to-text backend.
///
/// Synchronous by contract — the voice path blocks its caller. The
/// production implementation bridges to async HTTP internally; tests
/// substitute stubs to exercise the fail-soft path without audio
/// hardware.
pub trait Transcriber: Send + Sync {
    /// Transcribe a WAV recording to text.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Voice`] when recognition fails; the caller
    /// treats that as "no input produced".
    fn transcribe(&self, wav_bytes: Vec<u8>) -> Result<String>;
}

/// Transcriber backed by an OpenAI-compatible audio transcription endpoint.
pub struct HttpTranscriber {
    url: String,
    model: String,
    api_key: String,
}

impl HttpTranscriber {
    /// Create a transcriber from the voice config and session credential.
    #[must_use]
    pub fn new(config: &VoiceConfig, api_key: impl Into<String>) -> Self {
        Self {
            url: config.stt_url.clone(),
            model: config.stt_model.clone(),
            api_key: api_key.into(),
        }
    }
}

impl Transcriber for HttpTranscriber {
    fn transcribe(&self, wav_bytes: Vec<u8>) -> Result<String> {
        // Bridge the blocking voice path to the async HTTP stack.
        let handle = tokio::runtime::Handle::current();
        handle.block_on(async {
            let part = reqwest::multipart::Part::bytes(wav_bytes)
                .file_name("audio.wav")
                .mime_str("audio/wav")
                .map_err(|e| ChatError::Voice(format!("invalid mime type: {e}")))?;
            let form = reqwest::multipart::Form::new()
                .text("model", self.model.clone())
                .part("file", part);

            let response = reqwest::Client::new()
                .post(&self.url)
                .bearer_auth(&self.api_key)
                .multipart(form)
                .send()
                .await
                .map_err(|e| ChatError::Voice(format!("transcription request failed: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ChatError::Voice(format!(
                    "transcription HTTP {}: {body}",
                    status.as_u16()
                )));
            }

            let parsed: serde_json::Value = response
                .json()
                .await
                .map_err(|e| ChatError::Voice(format!("transcription response invalid: {e}")))?;
            Ok(parsed
                .get("text")
                .and_then(|t| t.as_str())
                .unwrap_or_default()
                .trim()
                .to_owned())
        })
    }
}

/// Capture one utterance and transcribe it. Blocks until done.
///
/// Emits [`ChatEvent::Listening`] while the microphone is open and
/// [`ChatEvent::VoiceUnrecognized`] when nothing usable was produced.
/// Returns the transcribed text, or an empty string on any failure.
pub fn listen_and_transcribe(
    config: &VoiceConfig,
    transcriber: &dyn Transcriber,
    events: Option<&broadcast::Sender<ChatEvent>>,
) -> String {
    emit(events, ChatEvent::Listening);

    let samples = match capture_utterance(config) {
        Ok(samples) => samples,
        Err(e) => {
            tracing::warn!("voice capture failed: {e}");
            emit(events, ChatEvent::VoiceUnrecognized);
            return String::new();
        }
    };

    transcribe_samples(&samples, config.input_sample_rate, transcriber, events)
}

/// The fail-soft transcription half, separated from microphone capture so
/// recognition failure is testable without audio hardware.
pub fn transcribe_samples(
    samples: &[f32],
    sample_rate: u32,
    transcriber: &dyn Transcriber,
    events: Option<&broadcast::Sender<ChatEvent>>,
) -> String {
    if samples.is_empty() {
        emit(events, ChatEvent::VoiceUnrecognized);
        return String::new();
    }

    let wav = match encode_wav(samples, sample_rate) {
        Ok(wav) => wav,
        Err(e) => {
            tracing::warn!("WAV encoding failed: {e}");
            emit(events, ChatEvent::VoiceUnrecognized);
            return String::new();
        }
    };

    match transcriber.transcribe(wav) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            tracing::debug!("transcription produced no text");
            emit(events, ChatEvent::VoiceUnrecognized);
            String::new()
        }
        Err(e) => {
            tracing::warn!("transcription failed: {e}");
            emit(events, ChatEvent::VoiceUnrecognized);
            String::new()
        }
    }
}

/// Record from the default input device until trailing silence after
/// speech, or the max-duration cap.
fn capture_utterance(config: &VoiceConfig) -> Result<Vec<f32>> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| ChatError::Voice("no default input device".into()))?;

    let device_config = device
        .default_input_config()
        .map_err(|e| ChatError::Voice(format!("no default input config: {e}")))?;
    let native_rate = device_config.sample_rate();
    let native_channels = device_config.channels();

    let stream_config = cpal::StreamConfig {
        channels: native_channels,
        sample_rate: native_rate,
        buffer_size: cpal::BufferSize::Default,
    };

    let (tx, rx) = std::sync::mpsc::channel::<Vec<f32>>();
    let stream = device
        .build_input_stream(
            &stream_config,
            move |data: &[f32], _info: &cpal::InputCallbackInfo| {
                // try-send semantics: a full receiver just drops frames.
                let _ = tx.send(data.to_vec());
            },
            move |err| {
                tracing::error!("audio input stream error: {err}");
            },
            None,
        )
        .map_err(|e| ChatError::Voice(format!("failed to build input stream: {e}")))?;

    stream
        .play()
        .map_err(|e| ChatError::Voice(format!("failed to start input stream: {e}")))?;

    tracing::info!(
        "listening: native {}Hz/{}ch -> {}Hz mono",
        native_rate,
        native_channels,
        config.input_sample_rate
    );

    let started = Instant::now();
    let max_duration = Duration::from_secs(config.listen_max_secs);
    let silence_hold = Duration::from_millis(config.silence_hold_ms);
    let mut captured: Vec<f32> = Vec::new();
    let mut heard_speech = false;
    let mut silence_since: Option<Instant> = None;

    while started.elapsed() < max_duration {
        let frame = match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(frame) => frame,
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        };

        let mono = if native_channels > 1 {
            to_mono(&frame, native_channels)
        } else {
            frame
        };

        if rms(&mono) >= config.silence_threshold {
            heard_speech = true;
            silence_since = None;
        } else if heard_speech {
            let since = silence_since.get_or_insert_with(Instant::now);
            if since.elapsed() >= silence_hold {
                captured.extend(mono);
                break;
            }
        }

        captured.extend(mono);
    }

    drop(stream);

    if !heard_speech {
        return Err(ChatError::Voice("no speech detected".into()));
    }

    Ok(if native_rate != config.input_sample_rate {
        downsample(&captured, native_rate, config.input_sample_rate)
    } else {
        captured
    })
}

/// Encode mono f32 samples as 16-bit PCM WAV.
fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| ChatError::Voice(format!("WAV writer failed: {e}")))?;
        for &sample in samples {
            let clamped = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
            writer
                .write_sample(clamped)
                .map_err(|e| ChatError::Voice(format!("WAV write failed: {e}")))?;
        }
        writer
            .finalize()
            .map_err(|e| ChatError::Voice(format!("WAV finalize failed: {e}")))?;
    }
    Ok(cursor.into_inner())
}

/// Convert interleaved multi-channel audio to mono by averaging channels.
fn to_mono(data: &[f32], channels: u16) -> Vec<f32> {
    let ch = channels as usize;
    data.chunks_exact(ch)
        .map(|frame| frame.iter().sum::<f32>() / ch as f32)
        .collect()
}

/// Root-mean-square level of a frame.
fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

/// Linear-interpolation downsampler.
///
/// Sufficient for speech (energy below 8kHz); no anti-alias filter needed.
fn downsample(samples: &[f32], src_rate: u32, dst_rate: u32) -> Vec<f32> {
    if src_rate == dst_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = f64::from(src_rate) / f64::from(dst_rate);
    let out_len = (samples.len() as f64 / ratio) as usize;
    let mut output = Vec::with_capacity(out_len);

    for i in 0..out_len {
        let src_pos = i as f64 * ratio;
        let idx = src_pos as usize;
        let frac = src_pos - idx as f64;

        let sample = if idx + 1 < samples.len() {
            f64::from(samples[idx]) * (1.0 - frac) + f64::from(samples[idx + 1]) * frac
        } else {
            f64::from(samples[idx.min(samples.len() - 1)])
        };

        output.push(sample as f32);
    }

    output
}
