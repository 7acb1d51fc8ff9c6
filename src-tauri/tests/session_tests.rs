use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rattil_lib::asr::{AsrError, Recognizer};
use rattil_lib::audio_processing::AudioFrame;
use rattil_lib::session::{PracticeSession, RecitationUpdate, SharedRecognizer, STATUS_LIVE};
use rattil_lib::text::Alignment;

/// Deterministic stand-in for the whisper-backed recognizer.
struct ScriptedRecognizer {
    outputs: Vec<Result<String, AsrError>>,
}

impl Recognizer for ScriptedRecognizer {
    fn transcribe(&mut self, _samples: &[f32]) -> Result<String, AsrError> {
        if self.outputs.is_empty() {
            Ok(String::new())
        } else {
            self.outputs.remove(0)
        }
    }
}

fn scripted(outputs: Vec<Result<String, AsrError>>) -> SharedRecognizer {
    Arc::new(Mutex::new(Some(
        Box::new(ScriptedRecognizer { outputs }) as Box<dyn Recognizer>
    )))
}

fn one_second_frame() -> AudioFrame {
    AudioFrame {
        samples: vec![0.1f32; 16_000],
    }
}

fn start_collecting(
    session: &PracticeSession,
    recognizer: SharedRecognizer,
    reference: &str,
) -> (mpsc::Sender<AudioFrame>, mpsc::Receiver<RecitationUpdate>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let (audio_tx, audio_rx) = mpsc::channel();
    let (update_tx, update_rx) = mpsc::channel();

    session.start(
        audio_rx,
        recognizer,
        reference.to_string(),
        Alignment::Positional,
        move |update| {
            let _ = update_tx.send(update);
        },
    );

    (audio_tx, update_rx)
}

#[test]
fn chunk_is_recognized_compared_and_rendered() {
    let session = PracticeSession::new();
    let recognizer = scripted(vec![Ok("بسم الله".to_string())]);
    let (audio_tx, update_rx) =
        start_collecting(&session, recognizer, "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ");

    audio_tx.send(one_second_frame()).expect("send frame");

    let update = update_rx
        .recv_timeout(Duration::from_secs(2))
        .expect("an update should arrive");

    assert_eq!(update.transcription, "بسم الله");
    assert_eq!(update.status, STATUS_LIVE);
    assert!(update.highlight_html.contains("#90ee90"));
    assert!(!update.highlight_html.contains("#ffcccb"));

    drop(audio_tx);
    session.stop();
}

#[test]
fn recognition_failure_becomes_a_status_and_the_session_continues() {
    let session = PracticeSession::new();
    let recognizer = scripted(vec![
        Err(AsrError::Download("connection reset".to_string())),
        Ok("wordA".to_string()),
    ]);
    let (audio_tx, update_rx) = start_collecting(&session, recognizer, "wordA wordB");

    audio_tx.send(one_second_frame()).expect("send frame");
    let failed = update_rx
        .recv_timeout(Duration::from_secs(2))
        .expect("error update should arrive");
    assert!(failed.transcription.is_empty());
    assert!(!failed.status.is_empty());
    assert_ne!(failed.status, STATUS_LIVE);
    assert!(failed.highlight_html.is_empty());

    // The next chunk goes through untouched by the earlier failure.
    audio_tx.send(one_second_frame()).expect("send frame");
    let recovered = update_rx
        .recv_timeout(Duration::from_secs(2))
        .expect("recovery update should arrive");
    assert_eq!(recovered.transcription, "wordA");
    assert_eq!(recovered.status, STATUS_LIVE);

    drop(audio_tx);
    session.stop();
}

#[test]
fn missing_model_is_reported_per_chunk() {
    let session = PracticeSession::new();
    let recognizer: SharedRecognizer = Arc::new(Mutex::new(None));
    let (audio_tx, update_rx) = start_collecting(&session, recognizer, "wordA");

    audio_tx.send(one_second_frame()).expect("send frame");
    let update = update_rx
        .recv_timeout(Duration::from_secs(2))
        .expect("an update should arrive");
    assert!(update.status.contains("model"));

    drop(audio_tx);
    session.stop();
}

#[test]
fn leftover_audio_is_flushed_when_the_sender_drops() {
    let session = PracticeSession::new();
    let recognizer = scripted(vec![Ok("tail".to_string())]);
    let (audio_tx, update_rx) = start_collecting(&session, recognizer, "tail");

    // Half a second: below the chunk threshold, above the flush minimum.
    audio_tx
        .send(AudioFrame {
            samples: vec![0.1f32; 8_000],
        })
        .expect("send frame");
    drop(audio_tx);

    let update = update_rx
        .recv_timeout(Duration::from_secs(2))
        .expect("flush update should arrive");
    assert_eq!(update.transcription, "tail");
}

#[test]
fn sub_flush_leftover_is_dropped() {
    let session = PracticeSession::new();
    let recognizer = scripted(vec![Ok("noise".to_string())]);
    let (audio_tx, update_rx) = start_collecting(&session, recognizer, "noise");

    audio_tx
        .send(AudioFrame {
            samples: vec![0.1f32; 1_000],
        })
        .expect("send frame");
    drop(audio_tx);

    assert!(update_rx.recv_timeout(Duration::from_millis(500)).is_err());
}
