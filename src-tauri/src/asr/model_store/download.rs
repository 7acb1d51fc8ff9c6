use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use serde::Serialize;

use crate::asr::recognizer::AsrError;

use super::{MAX_RETRIES, MODEL_BASE_URL, RETRY_BACKOFF_SECS};

pub(crate) fn download_missing_files(
    model_root: &Path,
    missing_files: &[String],
) -> Result<(), AsrError> {
    if missing_files.is_empty() {
        return Ok(());
    }

    start_tracking(missing_files.len());

    let result: Result<(), AsrError> = (|| {
        fs::create_dir_all(model_root)?;

        for (index, file) in missing_files.iter().enumerate() {
            set_file_index(index + 1);
            let dest = model_root.join(file);

            if dest.exists() {
                continue;
            }

            let url = format!("{MODEL_BASE_URL}/{file}");
            download_asset(&url, &dest)?;
        }
        Ok(())
    })();

    match result {
        Ok(()) => {
            mark_finished();
            log::info!("Model assets ready under {}", model_root.display());
            Ok(())
        }
        Err(err) => {
            log::error!("Model download failed: {}", err);
            record_failure(err.user_message().to_string());
            Err(err)
        }
    }
}

fn download_asset(url: &str, dest: &Path) -> Result<(), AsrError> {
    let tmp = dest.with_extension("download");
    let mut last_err: Option<AsrError> = None;

    let client = reqwest::blocking::Client::builder()
        .connect_timeout(Duration::from_secs(30))
        .timeout(None::<Duration>)
        .build()
        .map_err(|e| AsrError::Download(format!("http client init failed: {e}")))?;

    for attempt in 1..=MAX_RETRIES {
        log::info!(
            "Downloading model asset to {} from {url} (attempt {attempt}/{MAX_RETRIES})",
            dest.display()
        );

        match try_download_resumable(&client, url, &tmp, dest) {
            Ok(()) => return Ok(()),
            Err(err) => {
                log::warn!("Download attempt {} failed: {}", attempt, err);
                last_err = Some(err);

                if attempt < MAX_RETRIES {
                    std::thread::sleep(Duration::from_secs(RETRY_BACKOFF_SECS * attempt as u64));
                }
            }
        }
    }

    Err(last_err.unwrap_or_else(|| AsrError::Download(format!("{url}: failed to download"))))
}

fn try_download_resumable(
    client: &reqwest::blocking::Client,
    url: &str,
    tmp: &Path,
    dest: &Path,
) -> Result<(), AsrError> {
    let current_len = if tmp.exists() {
        fs::metadata(tmp).map(|m| m.len()).unwrap_or(0)
    } else {
        0
    };

    let mut request = client.get(url);
    if current_len > 0 {
        request = request.header(reqwest::header::RANGE, format!("bytes={current_len}-"));
    }

    let response = request
        .send()
        .map_err(|e| AsrError::Download(format!("{url}: request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AsrError::Download(format!(
            "{url}: unexpected status {status}"
        )));
    }

    let resumed = status == reqwest::StatusCode::PARTIAL_CONTENT;
    let total_size = if resumed {
        current_len + response.content_length().unwrap_or(0)
    } else {
        response.content_length().unwrap_or(0)
    };

    let mut file = if resumed {
        log::debug!("Resuming download from byte {}", current_len);
        fs::OpenOptions::new().create(true).append(true).open(tmp)?
    } else {
        if current_len > 0 {
            log::warn!(
                "Server does not support resuming or file changed (status {}), restarting download.",
                status
            );
        }
        fs::File::create(tmp)?
    };

    let mut downloaded = if resumed { current_len } else { 0 };
    update_download_bytes(downloaded, total_size);

    let mut reader = response;
    let mut buffer = [0; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| AsrError::Download(format!("{url}: read failed: {e}")))?;

        if bytes_read == 0 {
            break;
        }

        file.write_all(&buffer[..bytes_read])
            .map_err(|e| AsrError::Download(format!("{url}: write failed: {e}")))?;

        downloaded += bytes_read as u64;
        update_download_bytes(downloaded, total_size);
    }

    if total_size > 0 && downloaded != total_size {
        return Err(AsrError::Download(format!(
            "Incomplete download: expected {} bytes, got {}",
            total_size, downloaded
        )));
    }

    fs::rename(tmp, dest)?;
    Ok(())
}

#[derive(Clone, Debug, Serialize)]
pub struct DownloadProgress {
    pub file_index: usize,
    pub file_count: usize,
    pub downloaded_bytes: u64,
    pub total_bytes: u64,
    pub done: bool,
    pub error: Option<String>,
}

static DOWNLOAD_PROGRESS: OnceLock<Mutex<DownloadProgress>> = OnceLock::new();

fn progress_state() -> &'static Mutex<DownloadProgress> {
    DOWNLOAD_PROGRESS.get_or_init(|| {
        Mutex::new(DownloadProgress {
            file_index: 0,
            file_count: 0,
            downloaded_bytes: 0,
            total_bytes: 0,
            done: false,
            error: None,
        })
    })
}

pub fn start_tracking(file_count: usize) {
    if let Ok(mut progress) = progress_state().lock() {
        progress.file_index = 0;
        progress.file_count = file_count;
        progress.downloaded_bytes = 0;
        progress.total_bytes = 0;
        progress.done = false;
        progress.error = None;
    }
}

pub fn set_file_index(file_index: usize) {
    if let Ok(mut progress) = progress_state().lock() {
        progress.file_index = file_index;
        progress.downloaded_bytes = 0;
        progress.total_bytes = 0;
    }
}

pub(crate) fn update_download_bytes(downloaded: u64, total: u64) {
    if let Ok(mut progress) = progress_state().lock() {
        progress.downloaded_bytes = downloaded;
        progress.total_bytes = total;
    }
}

pub fn mark_finished() {
    if let Ok(mut progress) = progress_state().lock() {
        progress.file_index = progress.file_count;
        progress.done = true;
    }
}

pub fn record_failure(error: String) {
    if let Ok(mut progress) = progress_state().lock() {
        progress.error = Some(error);
        progress.done = true;
    }
}

pub fn current_download_progress() -> Option<DownloadProgress> {
    DOWNLOAD_PROGRESS
        .get()
        .and_then(|mutex| mutex.lock().ok().map(|progress| progress.clone()))
}
