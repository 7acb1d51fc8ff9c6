pub mod model_store;
pub mod recognizer;

pub use model_store::download::{
    current_download_progress, mark_finished, record_failure, set_file_index, start_tracking,
    DownloadProgress,
};
pub use model_store::{
    default_model_root, fallback_model_root, missing_model_files_for_tests, resolve_model_file,
};
pub use recognizer::{AsrError, Recognizer, WhisperRecognizer, RECITATION_LANGUAGE};

pub(crate) const TARGET_SAMPLE_RATE: u32 = 16_000;
