//! Speech capture and transcription
//!
//! A phrase is captured from the default cpal input device as 16 kHz mono
//! 16-bit samples, wrapped in a WAV container with hound, and posted to
//! Google's speech endpoint, which answers with one JSON object per line.

use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ash_core::RecognitionError;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use serde_json::Value;
use tracing::{debug, warn};

pub const SAMPLE_RATE: u32 = 16_000;
const CHANNELS: u16 = 1;

const SPEECH_URL: &str = "http://www.google.com/speech-api/v2/recognize";
const CONTENT_TYPE: &str = "audio/l16; rate=16000;";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variable holding an optional speech service key
pub const SPEECH_KEY_VAR: &str = "ASH_SPEECH_KEY";

/// Whether the default host has an input device
pub fn microphone_present() -> bool {
    let host = cpal::default_host();
    match host.default_input_device() {
        Some(device) => {
            debug!(device = %device.name().unwrap_or_default(), "Input device found");
            true
        }
        None => false,
    }
}

/// Float sample in [-1, 1] to signed 16-bit
pub fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

/// 16 kHz mono 16-bit WAV image of `samples`
pub fn encode_wav(samples: &[i16]) -> Result<Vec<u8>, RecognitionError> {
    let spec = hound::WavSpec {
        channels: CHANNELS,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| RecognitionError::Capture(format!("WAV header: {}", e)))?;
        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| RecognitionError::Capture(format!("WAV write: {}", e)))?;
        }
        writer
            .finalize()
            .map_err(|e| RecognitionError::Capture(format!("WAV finalize: {}", e)))?;
    }
    Ok(cursor.into_inner())
}

/// Capture `seconds` of audio from the default input device
fn capture(seconds: u32) -> Result<Vec<i16>, RecognitionError> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or(RecognitionError::NoMicrophone)?;
    let format = device
        .default_input_config()
        .map(|c| c.sample_format())
        .unwrap_or(SampleFormat::I16);

    let config = StreamConfig {
        channels: CHANNELS,
        sample_rate: SampleRate(SAMPLE_RATE),
        buffer_size: cpal::BufferSize::Default,
    };

    let expected = SAMPLE_RATE.saturating_mul(seconds) as usize;
    let samples = Arc::new(Mutex::new(Vec::with_capacity(expected)));
    let err_fn = |e: cpal::StreamError| warn!("Audio stream error: {}", e);

    let stream = match format {
        SampleFormat::F32 => {
            let sink = Arc::clone(&samples);
            device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut buf) = sink.lock() {
                        buf.extend(data.iter().copied().map(to_i16));
                    }
                },
                err_fn,
                None,
            )
        }
        _ => {
            let sink = Arc::clone(&samples);
            device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut buf) = sink.lock() {
                        buf.extend_from_slice(data);
                    }
                },
                err_fn,
                None,
            )
        }
    }
    .map_err(|e| RecognitionError::Capture(format!("Failed to build stream: {}", e)))?;

    stream
        .play()
        .map_err(|e| RecognitionError::Capture(format!("Failed to start stream: {}", e)))?;
    std::thread::sleep(Duration::from_secs(u64::from(seconds.max(1))));
    drop(stream);

    let captured = match samples.lock() {
        Ok(mut buf) => std::mem::take(&mut *buf),
        Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
    };
    if captured.is_empty() {
        return Err(RecognitionError::Capture("no samples captured".to_string()));
    }
    Ok(captured)
}

/// First transcript in a line-delimited recognition response
///
/// Lines that are not JSON, or carry an empty result list, are skipped.
pub fn parse_transcript(body: &str) -> Option<String> {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str::<Value>(line).ok())
        .find_map(|json| {
            json["result"][0]["alternative"][0]["transcript"]
                .as_str()
                .map(|s| s.trim().to_string())
        })
        .filter(|s| !s.is_empty())
}

/// Records a phrase and transcribes it
pub struct Recognizer {
    client: reqwest::blocking::Client,
    language: String,
    phrase_limit: u32,
    key: Option<String>,
}

impl Recognizer {
    pub fn new(language: &str, phrase_limit: u32, key: Option<String>) -> Result<Self, RecognitionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RecognitionError::Service(e.to_string()))?;
        Ok(Self {
            client,
            language: language.to_string(),
            phrase_limit,
            key,
        })
    }

    /// Capture one phrase and return its transcript
    pub fn listen(&self) -> Result<String, RecognitionError> {
        let audio = self.record()?;
        debug!(bytes = audio.len(), "Captured audio");
        self.transcribe(audio)
    }

    fn record(&self) -> Result<Vec<u8>, RecognitionError> {
        let samples = capture(self.phrase_limit)?;
        encode_wav(&samples)
    }

    fn transcribe(&self, audio: Vec<u8>) -> Result<String, RecognitionError> {
        let mut query = vec![("client", "chromium"), ("lang", self.language.as_str())];
        if let Some(key) = self.key.as_deref() {
            query.push(("key", key));
        }

        let response = self
            .client
            .post(SPEECH_URL)
            .query(&query)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .body(audio)
            .send()
            .map_err(|e| RecognitionError::Service(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecognitionError::Service(format!("HTTP {}", status.as_u16())));
        }
        let body = response
            .text()
            .map_err(|e| RecognitionError::Service(e.without_url().to_string()))?;

        parse_transcript(&body).ok_or(RecognitionError::NothingHeard)
    }
}
