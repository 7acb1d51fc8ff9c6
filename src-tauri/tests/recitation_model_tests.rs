//! End-to-end recognition against the real whisper model. Needs the GGML
//! model on disk and a recorded sample, so everything here stays ignored by
//! default. Point RATTIL_MODEL_ROOT at a model directory to run it.

use std::path::PathBuf;

use rattil_lib::asr::{fallback_model_root, resolve_model_file, Recognizer, WhisperRecognizer};
use rattil_lib::text::{compare, normalize};

fn get_wav_path() -> PathBuf {
    PathBuf::from("tests/samples/fatiha_1.wav")
}

fn load_samples(path: &PathBuf) -> Vec<f32> {
    let mut reader = hound::WavReader::open(path).expect("Failed to open WAV file");
    let spec = reader.spec();
    assert_eq!(spec.channels, 1, "Expected mono audio");
    assert_eq!(spec.sample_rate, 16000, "Expected 16kHz audio");

    reader
        .samples::<i16>()
        .map(|s| s.expect("Failed to read sample") as f32 / 32768.0)
        .collect()
}

#[test]
#[ignore] // Requires the whisper model and tests/samples/fatiha_1.wav
fn whole_take_recitation_mostly_matches_the_reference() {
    let _ = env_logger::builder().is_test(true).try_init();

    let model_root = std::env::var("RATTIL_MODEL_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| fallback_model_root());
    let model_file = resolve_model_file(&model_root).expect("Model file not resolved");

    let mut recognizer = WhisperRecognizer::new(&model_file).expect("Failed to load model");
    let samples = load_samples(&get_wav_path());

    let text = recognizer.transcribe(&samples).expect("Transcription failed");
    let reference = "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ";

    let marks = compare(&text, reference);
    assert!(!marks.is_empty(), "recognizer returned no words");

    let correct = marks.iter().filter(|m| m.correct).count();
    assert!(
        correct * 2 >= marks.len(),
        "expected at least half the words to match, got {}/{} for {:?}",
        correct,
        marks.len(),
        normalize(&text)
    );
}
