use std::path::{Path, PathBuf};

use tauri::AppHandle;

use crate::asr::recognizer::AsrError;

use super::{download, MODEL_FILES};

fn missing_model_files(model_root: &Path) -> Vec<String> {
    MODEL_FILES
        .iter()
        .filter_map(|file| {
            let path = model_root.join(file);
            if path.exists() {
                None
            } else {
                Some((*file).to_string())
            }
        })
        .collect()
}

pub fn missing_model_files_for_tests(model_root: &Path) -> Vec<String> {
    missing_model_files(model_root)
}

pub fn default_model_root(app: &AppHandle) -> PathBuf {
    if let Some(path) = crate::settings::get_custom_model_path(app) {
        return path;
    }

    fallback_model_root()
}

pub fn fallback_model_root() -> PathBuf {
    let base = dirs_next::cache_dir()
        .or_else(|| std::env::var_os("HOME").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));

    base.join("rattil").join("models")
}

/// Resolves the GGML model file under `model_root`, downloading whatever is
/// missing first.
pub fn resolve_model_file<P: AsRef<Path>>(model_root: P) -> Result<PathBuf, AsrError> {
    let model_root = model_root.as_ref();
    log::debug!("resolve_model_file: checking {}", model_root.display());

    let missing = missing_model_files(model_root);
    if !missing.is_empty() {
        log::info!(
            "Model assets missing under {} ({}); downloading",
            model_root.display(),
            missing.join(", ")
        );
        download::download_missing_files(model_root, &missing)?;
    }

    Ok(model_root.join(MODEL_FILES[0]))
}
