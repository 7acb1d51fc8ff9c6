pub mod download;
mod paths;

pub use paths::{
    default_model_root, fallback_model_root, missing_model_files_for_tests, resolve_model_file,
};

const MODEL_BASE_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

const MODEL_FILES: &[&str] = &["ggml-base.bin"];

const MAX_RETRIES: usize = 3;
const RETRY_BACKOFF_SECS: u64 = 2;
