//! A live practice session: audio frames in, validated transcription out.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::Receiver,
    Arc, Mutex,
};
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::asr::{Recognizer, TARGET_SAMPLE_RATE};
use crate::audio_processing::AudioFrame;
use crate::text::{compare_with, render, Alignment};

/// Samples per recognition pass: one chunk is one second of audio.
const CHUNK_SAMPLES: usize = TARGET_SAMPLE_RATE as usize;

/// Leftover audio below this is dropped at shutdown instead of recognized.
const MIN_FLUSH_SAMPLES: usize = TARGET_SAMPLE_RATE as usize / 4;

const RING_SECONDS: usize = 60;

pub const STATUS_LIVE: &str = "Live transcription and validation ongoing...";
pub const STATUS_DONE: &str = "Recitation complete.";

/// What the UI shows after each processed chunk.
#[derive(Debug, Clone, Serialize)]
pub struct RecitationUpdate {
    pub transcription: String,
    pub status: String,
    pub highlight_html: String,
}

pub type SharedRecognizer = Arc<Mutex<Option<Box<dyn Recognizer>>>>;

/// Runs the per-chunk pipeline on its own threads. Chunk handling is strictly
/// sequential: a single decode thread recognizes, compares, and renders one
/// chunk before touching the next. The session winds down on its own when the
/// recorder drops the frame sender.
pub struct PracticeSession {
    running: Arc<AtomicBool>,
}

impl Default for PracticeSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PracticeSession {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn start<F>(
        &self,
        rx: Receiver<AudioFrame>,
        recognizer: SharedRecognizer,
        reference: String,
        alignment: Alignment,
        on_update: F,
    ) where
        F: Fn(RecitationUpdate) + Send + 'static,
    {
        self.running.store(true, Ordering::SeqCst);
        let run = self.running.clone();
        let (mut prod, mut cons) =
            rtrb::RingBuffer::<f32>::new(RING_SECONDS * TARGET_SAMPLE_RATE as usize);
        let ri = run.clone();
        thread::spawn(move || Self::run_ingest(ri, rx, &mut prod));
        thread::spawn(move || {
            Self::run_validate(run, recognizer, &mut cons, &reference, alignment, on_update)
        });
    }

    fn run_ingest(
        running: Arc<AtomicBool>,
        rx: Receiver<AudioFrame>,
        prod: &mut rtrb::Producer<f32>,
    ) {
        log::info!("Session ingest thread started");
        let mut frames = 0usize;
        while running.load(Ordering::Relaxed) {
            match rx.recv_timeout(Duration::from_millis(50)) {
                Ok(f) => {
                    frames += 1;
                    if frames == 1 || frames % 100 == 0 {
                        log::debug!("Ingest: Frame #{}, len: {}", frames, f.samples.len());
                    }
                    for &s in &f.samples {
                        if prod.push(s).is_err() {
                            log::warn!("Session buffer full");
                            break;
                        }
                    }
                }
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,
                Err(_) => {
                    running.store(false, Ordering::SeqCst);
                    break;
                }
            }
        }
    }

    fn run_validate<F>(
        running: Arc<AtomicBool>,
        recognizer: SharedRecognizer,
        cons: &mut rtrb::Consumer<f32>,
        reference: &str,
        alignment: Alignment,
        on_update: F,
    ) where
        F: Fn(RecitationUpdate) + Send + 'static,
    {
        log::info!("Session validation thread starting");
        let mut chunk: Vec<f32> = Vec::with_capacity(CHUNK_SAMPLES);

        while running.load(Ordering::Relaxed) {
            let start = Instant::now();

            if let Ok(slots) = cons.read_chunk(cons.slots()) {
                let (f, s) = slots.as_slices();
                chunk.extend_from_slice(f);
                chunk.extend_from_slice(s);
                slots.commit_all();
            }

            if chunk.len() >= CHUNK_SAMPLES {
                Self::validate_chunk(&recognizer, &chunk, reference, alignment, &on_update);
                chunk.clear();
            }

            thread::sleep(Duration::from_millis(50).saturating_sub(start.elapsed()));
        }

        // Drain whatever arrived between the last tick and shutdown.
        if let Ok(slots) = cons.read_chunk(cons.slots()) {
            let (f, s) = slots.as_slices();
            chunk.extend_from_slice(f);
            chunk.extend_from_slice(s);
            slots.commit_all();
        }
        if chunk.len() >= MIN_FLUSH_SAMPLES {
            Self::validate_chunk(&recognizer, &chunk, reference, alignment, &on_update);
        }
        log::info!("Session validation loop exiting");
    }

    fn validate_chunk<F>(
        recognizer: &SharedRecognizer,
        chunk: &[f32],
        reference: &str,
        alignment: Alignment,
        on_update: &F,
    ) where
        F: Fn(RecitationUpdate),
    {
        let result = recognizer
            .lock()
            .map_err(|_| "The speech engine is busy. Please try again.".to_string())
            .and_then(|mut guard| match guard.as_mut() {
                Some(model) => model
                    .transcribe(chunk)
                    .map_err(|e| e.user_message().to_string()),
                None => Err("Speech model is not loaded yet. Please try again.".to_string()),
            });

        match result {
            Ok(text) => {
                let marks = compare_with(&text, reference, alignment);
                on_update(RecitationUpdate {
                    transcription: text,
                    status: STATUS_LIVE.to_string(),
                    highlight_html: render(&marks),
                });
            }
            Err(message) => {
                log::error!("Chunk recognition failed: {}", message);
                on_update(RecitationUpdate {
                    transcription: String::new(),
                    status: message,
                    highlight_html: String::new(),
                });
            }
        }
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
