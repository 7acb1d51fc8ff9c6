use serde::{Deserialize, Serialize};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "__TAURI__", "core"], catch)]
    async fn invoke(cmd: &str, args: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["window", "__TAURI__", "event"], catch)]
    pub async fn listen(
        event: &str,
        handler: &Closure<dyn FnMut(JsValue)>,
    ) -> Result<JsValue, JsValue>;
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ChapterOptionDto {
    pub index: String,
    pub name: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct VerseOptionDto {
    pub index: String,
    pub text: String,
}

#[derive(Deserialize, Debug)]
pub struct ModelDownloadProgressDto {
    pub file_index: usize,
    pub file_count: usize,
    pub downloaded_bytes: u64,
    pub total_bytes: u64,
    pub done: bool,
    pub error: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RecitationUpdateDto {
    pub transcription: String,
    pub status: String,
    pub highlight_html: String,
}

#[derive(Serialize)]
struct ChapterArgs<'a> {
    chapter: &'a str,
}

#[derive(Serialize)]
struct VerseArgs<'a> {
    chapter: &'a str,
    verse: &'a str,
}

#[derive(Serialize)]
struct SetModelPathArgs {
    path: String,
}

#[derive(Serialize)]
struct SetCorpusPathArgs {
    path: String,
}

#[derive(Serialize)]
struct SetRealignArgs {
    enabled: bool,
}

async fn invoke_no_args(cmd: &str) -> Result<JsValue, String> {
    invoke(cmd, JsValue::NULL).await.map_err(extract_error)
}

pub async fn fetch_chapters() -> Result<Vec<ChapterOptionDto>, String> {
    let value = invoke_no_args("list_chapters").await?;
    serde_wasm_bindgen::from_value(value).map_err(|err| err.to_string())
}

pub async fn fetch_verses(chapter: &str) -> Result<Vec<VerseOptionDto>, String> {
    let args = serde_wasm_bindgen::to_value(&ChapterArgs { chapter }).map_err(|e| e.to_string())?;
    let value = invoke("list_verses", args).await.map_err(extract_error)?;
    serde_wasm_bindgen::from_value(value).map_err(|err| err.to_string())
}

pub async fn fetch_verse_text(chapter: &str, verse: &str) -> Result<String, String> {
    let args =
        serde_wasm_bindgen::to_value(&VerseArgs { chapter, verse }).map_err(|e| e.to_string())?;
    let value = invoke("get_verse_text", args).await.map_err(extract_error)?;
    value
        .as_string()
        .ok_or_else(|| "Invalid response format".to_string())
}

pub async fn start_recitation_cmd(chapter: &str, verse: &str) -> Result<(), String> {
    let args =
        serde_wasm_bindgen::to_value(&VerseArgs { chapter, verse }).map_err(|e| e.to_string())?;
    invoke("start_recitation", args)
        .await
        .map(|_| ())
        .map_err(extract_error)
}

pub async fn stop_recitation_cmd(chapter: &str, verse: &str) -> Result<(), String> {
    let args =
        serde_wasm_bindgen::to_value(&VerseArgs { chapter, verse }).map_err(|e| e.to_string())?;
    invoke("stop_recitation", args)
        .await
        .map(|_| ())
        .map_err(extract_error)
}

pub async fn reset_session_cmd() -> Result<(), String> {
    invoke_no_args("reset_session").await.map(|_| ())
}

pub async fn fetch_download_progress() -> Result<Option<ModelDownloadProgressDto>, String> {
    let value = invoke_no_args("model_download_progress").await?;
    if value.is_null() || value.is_undefined() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(value).map_err(|err| err.to_string())
}

pub async fn check_model_ready_flag() -> Result<bool, String> {
    let value = invoke_no_args("is_model_ready").await?;
    Ok(value.as_bool().unwrap_or(false))
}

pub async fn retry_model_download_cmd() -> Result<(), String> {
    invoke_no_args("retry_model_download").await.map(|_| ())
}

pub async fn fetch_model_path() -> Result<String, String> {
    let value = invoke_no_args("get_model_path").await?;
    value
        .as_string()
        .ok_or_else(|| "Invalid response format".to_string())
}

pub async fn save_model_path(path: String) -> Result<(), String> {
    let args =
        serde_wasm_bindgen::to_value(&SetModelPathArgs { path }).map_err(|err| err.to_string())?;
    invoke("set_model_path", args)
        .await
        .map(|_| ())
        .map_err(extract_error)
}

pub async fn pick_model_folder_cmd() -> Result<Option<String>, String> {
    let value = invoke_no_args("pick_model_folder").await?;
    if value.is_null() {
        return Ok(None);
    }
    value
        .as_string()
        .ok_or_else(|| "Invalid response".to_string())
        .map(Some)
}

pub async fn fetch_corpus_path() -> Result<Option<String>, String> {
    let value = invoke_no_args("get_corpus_path").await?;
    Ok(value.as_string())
}

pub async fn save_corpus_path(path: String) -> Result<(), String> {
    let args =
        serde_wasm_bindgen::to_value(&SetCorpusPathArgs { path }).map_err(|err| err.to_string())?;
    invoke("set_corpus_path", args)
        .await
        .map(|_| ())
        .map_err(extract_error)
}

pub async fn pick_corpus_file_cmd() -> Result<Option<String>, String> {
    let value = invoke_no_args("pick_corpus_file").await?;
    if value.is_null() {
        return Ok(None);
    }
    value
        .as_string()
        .ok_or_else(|| "Invalid response".to_string())
        .map(Some)
}

pub async fn fetch_realign() -> Result<bool, String> {
    let value = invoke_no_args("get_realign").await?;
    Ok(value.as_bool().unwrap_or(false))
}

pub async fn save_realign(enabled: bool) -> Result<(), String> {
    let args = serde_wasm_bindgen::to_value(&SetRealignArgs { enabled })
        .map_err(|err| err.to_string())?;
    invoke("set_realign", args)
        .await
        .map(|_| ())
        .map_err(extract_error)
}

pub async fn reset_settings_cmd() -> Result<(), String> {
    invoke_no_args("reset_settings").await.map(|_| ())
}

pub fn extract_error(err: JsValue) -> String {
    err.as_string()
        .or_else(|| {
            js_sys::Reflect::get(&err, &"message".into())
                .ok()
                .and_then(|v| v.as_string())
        })
        .unwrap_or_else(|| "Unknown error".to_string())
}
