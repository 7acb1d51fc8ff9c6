use std::path::Path;
use std::time::Instant;

use thiserror::Error;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

#[derive(Error, Debug)]
pub enum AsrError {
    #[error("Whisper error: {0}")]
    Whisper(#[from] whisper_rs::WhisperError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Model file not found at {0}")]
    ModelNotFound(String),

    #[error("Model download failed: {0}")]
    Download(String),
}

impl AsrError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Download(_) => {
                "Could not download the speech model. Check your internet connection and try again."
            }
            Self::ModelNotFound(_) => {
                "Speech model files are missing or corrupted. Click Retry to download them again."
            }
            Self::Whisper(_) => {
                "The speech engine failed to run. Try restarting the app or downloading the model again."
            }
            Self::Io(_) => {
                "The app could not read or write its local files. Check disk space and permissions."
            }
        }
    }
}

/// Opaque speech-to-text capability. The practice session only talks to this
/// boundary, so tests substitute a deterministic double.
pub trait Recognizer: Send {
    fn transcribe(&mut self, samples: &[f32]) -> Result<String, AsrError>;
}

/// Recitation is in Arabic; whisper's language hint is pinned accordingly.
pub const RECITATION_LANGUAGE: &str = "ar";

// whisper.cpp rejects input shorter than one second.
const MIN_SAMPLES: usize = 16_000;

pub struct WhisperRecognizer {
    context: WhisperContext,
}

impl WhisperRecognizer {
    pub fn new(model_path: &Path) -> Result<Self, AsrError> {
        if !model_path.exists() {
            return Err(AsrError::ModelNotFound(model_path.display().to_string()));
        }
        let path = model_path
            .to_str()
            .ok_or_else(|| AsrError::ModelNotFound(model_path.display().to_string()))?;

        let start = Instant::now();
        let context = WhisperContext::new_with_params(path, WhisperContextParameters::default())?;
        log::info!(
            "Whisper model loaded from {} in {:?}",
            model_path.display(),
            start.elapsed()
        );
        Ok(Self { context })
    }
}

impl Recognizer for WhisperRecognizer {
    fn transcribe(&mut self, samples: &[f32]) -> Result<String, AsrError> {
        let mut state = self.context.create_state()?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 0 });
        params.set_language(Some(RECITATION_LANGUAGE));
        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_n_threads(worker_threads());

        let padded;
        let samples = if samples.len() < MIN_SAMPLES {
            let mut tail = samples.to_vec();
            tail.resize(MIN_SAMPLES, 0.0);
            padded = tail;
            padded.as_slice()
        } else {
            samples
        };

        let start = Instant::now();
        state.full(params, samples)?;
        log::debug!(
            "Whisper inference over {} samples completed in {:?}",
            samples.len(),
            start.elapsed()
        );

        let mut text = String::new();
        for seg_idx in 0..state.full_n_segments() {
            let Some(segment) = state.get_segment(seg_idx) else {
                continue;
            };
            for tok_idx in 0..segment.n_tokens() {
                let Some(token) = segment.get_token(tok_idx) else {
                    continue;
                };
                let Ok(piece) = token.to_str() else {
                    continue;
                };
                let trimmed = piece.trim();
                if trimmed.is_empty() || trimmed.starts_with('[') || trimmed.starts_with('<') {
                    continue;
                }
                text.push_str(piece);
            }
        }

        Ok(text.trim().to_string())
    }
}

fn worker_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(4) as i32
}
