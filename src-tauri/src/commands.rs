use serde::Serialize;
use tauri::{AppHandle, Emitter, Manager, State};

use crate::asr::DownloadProgress;
use crate::corpus::Corpus;
use crate::engine::SpeechEngine;
use crate::error::AppError;
use crate::recording::{Recorder, RecordingError};
use crate::session::{PracticeSession, RecitationUpdate, STATUS_DONE};
use crate::text::{compare_with, render};

#[derive(Serialize)]
pub struct ChapterEntry {
    pub index: String,
    pub name: String,
}

#[derive(Serialize)]
pub struct VerseEntry {
    pub index: String,
    pub text: String,
}

#[tauri::command]
pub fn list_chapters(corpus: State<'_, Corpus>) -> Vec<ChapterEntry> {
    corpus
        .chapters()
        .iter()
        .map(|c| ChapterEntry {
            index: c.index.clone(),
            name: c.name.clone(),
        })
        .collect()
}

#[tauri::command]
pub fn list_verses(corpus: State<'_, Corpus>, chapter: String) -> Vec<VerseEntry> {
    corpus
        .verses(&chapter)
        .iter()
        .map(|v| VerseEntry {
            index: v.index.clone(),
            text: v.text.clone(),
        })
        .collect()
}

#[tauri::command]
pub fn get_verse_text(
    corpus: State<'_, Corpus>,
    chapter: String,
    verse: String,
) -> Result<String, String> {
    corpus
        .verse_text(&chapter, &verse)
        .map(|text| text.to_string())
        .map_err(|e| e.user_message().to_string())
}

#[tauri::command]
pub fn start_recitation(app: AppHandle, chapter: String, verse: String) -> Result<(), String> {
    log::info!("Tauri command start_recitation invoked (chapter={chapter}, verse={verse})");

    let reference = {
        let corpus = app.state::<Corpus>();
        corpus
            .verse_text(&chapter, &verse)
            .map_err(|e| e.user_message().to_string())?
            .to_string()
    };

    let engine = app.state::<SpeechEngine>();
    engine.ensure_model_loaded()?;

    let alignment = crate::settings::alignment(&app);
    let (tx, rx) = std::sync::mpsc::channel();

    let session = PracticeSession::new();
    let emit_handle = app.clone();
    session.start(
        rx,
        engine.model_handle(),
        reference,
        alignment,
        move |update| {
            if let Err(e) = emit_handle.emit("recitation_update", update) {
                log::error!("Failed to emit recitation_update: {}", e);
            }
        },
    );

    Recorder::global()
        .start(tx)
        .map_err(|e| e.user_message().to_string())?;

    log::info!("Recorder started (alignment={:?})", alignment);
    Ok(())
}

#[tauri::command]
pub fn stop_recitation(
    app: AppHandle,
    chapter: String,
    verse: String,
    state: State<'_, SpeechEngine>,
) -> Result<(), String> {
    log::info!("Tauri command stop_recitation invoked");

    let samples = Recorder::global()
        .stop()
        .map_err(|e| e.user_message().to_string())?;

    let reference = {
        let corpus = app.state::<Corpus>();
        corpus
            .verse_text(&chapter, &verse)
            .map_err(|e| e.user_message().to_string())?
            .to_string()
    };

    // Authoritative pass over the whole take; live chunk results are
    // approximate at chunk boundaries.
    let text = state.transcribe_samples(samples)?;
    let marks = compare_with(&text, &reference, crate::settings::alignment(&app));
    let update = RecitationUpdate {
        transcription: text,
        status: STATUS_DONE.to_string(),
        highlight_html: render(&marks),
    };

    if let Err(e) = app.emit("recitation_update", update) {
        log::error!("Failed to emit final recitation_update: {}", e);
    }
    Ok(())
}

#[tauri::command]
pub fn reset_session() -> Result<(), String> {
    match Recorder::global().stop() {
        Ok(_) | Err(RecordingError::NotRecording) | Err(RecordingError::NoAudioCaptured) => Ok(()),
        Err(e) => Err(e.user_message().to_string()),
    }
}

#[tauri::command]
pub fn is_model_ready(state: State<'_, SpeechEngine>) -> bool {
    state.is_ready()
}

#[tauri::command]
pub fn model_download_progress(state: State<'_, SpeechEngine>) -> Option<DownloadProgress> {
    state.download_progress()
}

#[tauri::command]
pub fn retry_model_download(state: State<'_, SpeechEngine>) -> Result<(), String> {
    state.retry_model_download()
}

#[tauri::command]
pub fn get_model_path(app: AppHandle) -> String {
    crate::asr::default_model_root(&app)
        .to_string_lossy()
        .to_string()
}

#[tauri::command]
pub fn set_model_path(app: AppHandle, path: String) -> Result<(), AppError> {
    use crate::settings::{get_settings, save_settings, Settings};

    let p = std::path::PathBuf::from(&path);
    if !p.exists() || !p.is_dir() {
        return Err(AppError::Settings(
            "Path does not exist or is not a directory".to_string(),
        ));
    }

    let settings = Settings {
        model_path: Some(path),
        ..get_settings(&app)
    };
    save_settings(&app, &settings).map_err(AppError::Settings)
}

#[tauri::command]
pub async fn pick_model_folder(app: AppHandle) -> Result<Option<String>, String> {
    use tauri_plugin_dialog::DialogExt;

    let result =
        tauri::async_runtime::spawn_blocking(move || app.dialog().file().blocking_pick_folder())
            .await
            .map_err(|e| format!("Dialog task failed: {e}"))?;

    Ok(result.map(|p| p.to_string()))
}

#[tauri::command]
pub fn get_corpus_path(app: AppHandle) -> Option<String> {
    crate::settings::corpus_source(&app).map(|p| p.to_string_lossy().to_string())
}

#[tauri::command]
pub fn set_corpus_path(app: AppHandle, path: String) -> Result<(), AppError> {
    use crate::settings::{get_settings, save_settings, Settings};

    let p = std::path::PathBuf::from(&path);
    if !p.exists() || !p.is_file() {
        return Err(AppError::Settings(
            "Path does not exist or is not a file".to_string(),
        ));
    }

    let settings = Settings {
        corpus_path: Some(path),
        ..get_settings(&app)
    };
    save_settings(&app, &settings).map_err(AppError::Settings)
}

#[tauri::command]
pub async fn pick_corpus_file(app: AppHandle) -> Result<Option<String>, String> {
    use tauri_plugin_dialog::DialogExt;

    let result = tauri::async_runtime::spawn_blocking(move || {
        app.dialog()
            .file()
            .add_filter("Corpus", &["xml"])
            .blocking_pick_file()
    })
    .await
    .map_err(|e| format!("Dialog task failed: {e}"))?;

    Ok(result.map(|p| p.to_string()))
}

#[tauri::command]
pub fn get_realign(app: AppHandle) -> bool {
    crate::settings::get_settings(&app).realign
}

#[tauri::command]
pub fn set_realign(app: AppHandle, enabled: bool) -> Result<(), String> {
    use crate::settings::{get_settings, save_settings};
    let mut settings = get_settings(&app);
    log::info!("Command set_realign invoked: enabled={}", enabled);
    settings.realign = enabled;
    save_settings(&app, &settings)
}

#[tauri::command]
pub fn reset_settings(app: AppHandle) -> Result<(), String> {
    use crate::settings::{save_settings, Settings};

    let settings = Settings::default();
    save_settings(&app, &settings)
}
