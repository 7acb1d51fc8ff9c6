use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{prelude::*, JsCast};

use crate::api::*;
use crate::components::practice::PracticeSection;
use crate::components::selection::SelectionSection;
use crate::components::settings::SettingsSection;

const STATUS_DONE: &str = "Recitation complete.";

fn start_model_progress_polling(
    is_reciting: ReadSignal<bool>,
    status: ReadSignal<String>,
    set_status: WriteSignal<String>,
    set_model_ready: WriteSignal<bool>,
    set_model_error: WriteSignal<Option<String>>,
) {
    let callback = Closure::wrap(Box::new(move || {
        if is_reciting.get_untracked() {
            return;
        }
        let current_status = status.get_untracked();
        let is_model_msg = current_status.is_empty()
            || current_status.starts_with("Preparing speech model")
            || current_status.starts_with("Downloading")
            || current_status.starts_with("Model download failed");
        if !is_model_msg {
            return;
        }

        spawn_local(async move {
            match fetch_download_progress().await {
                Ok(Some(progress)) => {
                    if let Some(error) = progress.error {
                        set_model_ready.set(false);
                        match fetch_model_path().await {
                            Ok(path) => set_model_error.set(Some(format!(
                                "Download failed: {}. Manual: {}",
                                error, path
                            ))),
                            Err(_) => set_model_error.set(Some(error)),
                        }
                        set_status.set("Model download failed.".to_string());
                    } else if progress.done {
                        set_model_ready.set(true);
                        set_model_error.set(None);
                        set_status.set("Select a sura and an aya, then start reciting.".to_string());
                    } else {
                        set_model_ready.set(false);
                        set_model_error.set(None);
                        let index = progress.file_index.min(progress.file_count);
                        let txt = if progress.total_bytes > 0 {
                            format!(
                                "Downloading ({:.1}/{:.1} MB, {}/{})",
                                progress.downloaded_bytes as f64 / 1e6,
                                progress.total_bytes as f64 / 1e6,
                                index,
                                progress.file_count
                            )
                        } else {
                            format!("Downloading file {}/{}...", index, progress.file_count)
                        };
                        set_status.set(txt);
                    }
                }
                Ok(None) => {
                    if let Ok(true) = check_model_ready_flag().await {
                        set_model_ready.set(true);
                        set_status.set("Select a sura and an aya, then start reciting.".to_string());
                    }
                }
                _ => {}
            }
        });
    }) as Box<dyn FnMut()>);

    if let Some(window) = leptos::web_sys::window() {
        let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            1_000,
        );
    }
    callback.forget();
}

#[component]
pub fn App() -> impl IntoView {
    let (chapters, set_chapters) = signal(Vec::<ChapterOptionDto>::new());
    let (verses, set_verses) = signal(Vec::<VerseOptionDto>::new());
    let (selected_chapter, set_selected_chapter) = signal(String::new());
    let (selected_verse, set_selected_verse) = signal(String::new());
    let (reference_text, set_reference_text) = signal(String::new());

    let (transcription, set_transcription) = signal(String::new());
    let (highlight_html, set_highlight_html) = signal(String::new());
    let (is_reciting, set_is_reciting) = signal(false);
    let (status, set_status) = signal("Preparing speech model...".to_string());
    let (model_ready, set_model_ready) = signal(false);
    let (model_error, set_model_error) = signal::<Option<String>>(None);
    let (model_path, set_model_path) = signal(String::new());
    let (corpus_path, set_corpus_path) = signal(String::new());
    let (realign, set_realign) = signal(false);

    spawn_local(async move {
        let callback = Closure::wrap(Box::new(move |event: JsValue| {
            let Ok(payload) = js_sys::Reflect::get(&event, &"payload".into()) else {
                leptos::logging::warn!("Event received but no payload found: {:?}", event);
                return;
            };
            match serde_wasm_bindgen::from_value::<RecitationUpdateDto>(payload) {
                Ok(update) => {
                    // A live chunk can land after the stop command already
                    // emitted the final result; only the final one counts then.
                    if !is_reciting.get_untracked() && update.status != STATUS_DONE {
                        return;
                    }
                    set_transcription.set(update.transcription);
                    set_status.set(update.status);
                    set_highlight_html.set(update.highlight_html);
                }
                Err(e) => {
                    leptos::logging::error!("Failed to parse RecitationUpdateDto: {:?}", e);
                }
            }
        }) as Box<dyn FnMut(JsValue)>);

        match listen("recitation_update", &callback).await {
            Ok(_) => leptos::logging::log!("Listening for recitation_update"),
            Err(e) => leptos::logging::error!("Failed to listen for recitation_update: {:?}", e),
        }
        callback.forget();
    });

    Effect::new(move |_| {
        start_model_progress_polling(
            is_reciting,
            status,
            set_status,
            set_model_ready,
            set_model_error,
        );
    });

    spawn_local(async move {
        match fetch_chapters().await {
            Ok(list) => {
                if list.is_empty() {
                    set_status.set(
                        "No verse corpus loaded. Pick a corpus file in settings and restart."
                            .to_string(),
                    );
                }
                set_chapters.set(list);
            }
            Err(e) => leptos::logging::error!("Failed to fetch chapters: {}", e),
        }

        if let Ok(true) = check_model_ready_flag().await {
            set_model_ready.set(true);
            set_status.set("Select a sura and an aya, then start reciting.".to_string());
        }

        if let Ok(path) = fetch_model_path().await {
            set_model_path.set(path);
        }
        if let Ok(Some(path)) = fetch_corpus_path().await {
            set_corpus_path.set(path);
        }
        if let Ok(enabled) = fetch_realign().await {
            set_realign.set(enabled);
        }
    });

    view! {
        <main class="shell">
            <header class="hero">
                <p class="eyebrow">"Recitation practice"</p>
                <h1>"Rattil"</h1>
            </header>

            <SelectionSection
                chapters verses set_verses
                selected_chapter set_selected_chapter
                selected_verse set_selected_verse
                reference_text set_reference_text
                is_reciting
                set_transcription set_highlight_html
            />

            <PracticeSection
                selected_chapter selected_verse
                is_reciting set_is_reciting
                status set_status
                model_ready model_error set_model_error
                transcription set_transcription
                highlight_html set_highlight_html
            />

            <section class="card settings-card">
                <div class="card-header"><p class="eyebrow">"Settings"</p></div>
                <SettingsSection
                    model_path set_model_path
                    corpus_path set_corpus_path
                    realign set_realign
                    set_status
                />
            </section>
        </main>
    }
}
