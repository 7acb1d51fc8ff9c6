use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tauri::path::BaseDirectory;
use tauri::{AppHandle, Manager};
use tauri_plugin_store::StoreExt;

use crate::text::Alignment;

#[derive(Serialize, Deserialize, Default)]
pub struct Settings {
    pub model_path: Option<String>,
    pub corpus_path: Option<String>,
    pub realign: bool,
}

const STORE_PATH: &str = "settings.json";

pub fn get_settings(app: &AppHandle) -> Settings {
    match app.store(STORE_PATH) {
        Ok(store) => {
            let model_path = store
                .get("model_path")
                .and_then(|v| v.as_str().map(|s| s.to_string()));
            let corpus_path = store
                .get("corpus_path")
                .and_then(|v| v.as_str().map(|s| s.to_string()));
            let realign = store
                .get("realign")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            Settings {
                model_path,
                corpus_path,
                realign,
            }
        }
        Err(e) => {
            log::warn!("Failed to load settings store: {e}");
            Settings::default()
        }
    }
}

pub fn save_settings(app: &AppHandle, settings: &Settings) -> Result<(), String> {
    let store = app
        .store(STORE_PATH)
        .map_err(|e| format!("Failed to open settings store: {e}"))?;

    if let Some(path) = &settings.model_path {
        store.set("model_path", serde_json::json!(path));
    } else {
        store.delete("model_path");
    }

    if let Some(path) = &settings.corpus_path {
        store.set("corpus_path", serde_json::json!(path));
    } else {
        store.delete("corpus_path");
    }

    store.set("realign", serde_json::json!(settings.realign));

    store.save().map_err(|e| e.to_string())
}

pub fn get_custom_model_path(app: &AppHandle) -> Option<PathBuf> {
    get_settings(app).model_path.map(PathBuf::from)
}

pub fn get_custom_corpus_path(app: &AppHandle) -> Option<PathBuf> {
    get_settings(app).corpus_path.map(PathBuf::from)
}

/// Where to read the verse corpus from: the settings override when present,
/// otherwise the bundled resource.
pub fn corpus_source(app: &AppHandle) -> Option<PathBuf> {
    if let Some(path) = get_custom_corpus_path(app) {
        return Some(path);
    }

    app.path()
        .resolve("resources/quran-simple.xml", BaseDirectory::Resource)
        .ok()
}

/// The configured comparison strategy; positional is the legacy default.
pub fn alignment(app: &AppHandle) -> Alignment {
    if get_settings(app).realign {
        Alignment::Realign
    } else {
        Alignment::Positional
    }
}
