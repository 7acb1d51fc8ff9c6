use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::*;

#[component]
pub fn PracticeSection(
    selected_chapter: ReadSignal<String>,
    selected_verse: ReadSignal<String>,
    is_reciting: ReadSignal<bool>,
    set_is_reciting: WriteSignal<bool>,
    status: ReadSignal<String>,
    set_status: WriteSignal<String>,
    model_ready: ReadSignal<bool>,
    model_error: ReadSignal<Option<String>>,
    set_model_error: WriteSignal<Option<String>>,
    transcription: ReadSignal<String>,
    set_transcription: WriteSignal<String>,
    highlight_html: ReadSignal<String>,
    set_highlight_html: WriteSignal<String>,
) -> impl IntoView {
    let selection_ready =
        move || !selected_chapter.get().is_empty() && !selected_verse.get().is_empty();

    let toggle_recitation = move |_| {
        if !model_ready.get() {
            if model_error.get().is_some() {
                set_status.set("Retrying speech model download...".to_string());
                spawn_local(async move {
                    match retry_model_download_cmd().await {
                        Ok(_) => set_model_error.set(None),
                        Err(err) => {
                            set_model_error.set(Some(err.clone()));
                            set_status.set(format!("Could not download model: {}", err));
                        }
                    }
                });
            }
            return;
        }

        if !selection_ready() {
            set_status.set("Please select both a sura and an aya.".to_string());
            return;
        }

        let chapter = selected_chapter.get_untracked();
        let verse = selected_verse.get_untracked();

        if !is_reciting.get() {
            set_status.set("Starting recitation...".to_string());
            set_is_reciting.set(true);
            set_transcription.set(String::new());
            set_highlight_html.set(String::new());
            spawn_local(async move {
                match start_recitation_cmd(&chapter, &verse).await {
                    Ok(_) => set_status.set("Listening... recite the aya.".to_string()),
                    Err(msg) => {
                        set_is_reciting.set(false);
                        set_status.set(format!("Could not start recitation: {}", msg));
                    }
                }
            });
            return;
        }

        spawn_local(async move {
            set_status.set("Finishing recitation...".to_string());
            set_is_reciting.set(false);

            if let Err(err) = stop_recitation_cmd(&chapter, &verse).await {
                set_status.set(format!("Could not finish recitation: {}", err));
            }
        });
    };

    let reset = move |_| {
        spawn_local(async move {
            if let Err(err) = reset_session_cmd().await {
                leptos::logging::error!("Reset failed: {}", err);
            }
            set_is_reciting.set(false);
            set_transcription.set(String::new());
            set_highlight_html.set(String::new());
            set_status.set("Select a sura and an aya, then start reciting.".to_string());
        });
    };

    view! {
        <section class="card control-card">
            <div class="card-header">
                <div>
                    <p class="eyebrow">"Practice"</p>
                    <h2>"Recite and validate"</h2>
                </div>
                <span class="pill"
                    class:live=move || is_reciting.get()
                    class:idle=move || !is_reciting.get()
                >
                    {move || if is_reciting.get() { "Listening" } else { "Idle" }}
                </span>
            </div>
            <div class="control-row">
                <button
                    on:click=toggle_recitation
                    disabled=move || !model_ready.get() && model_error.get().is_none()
                >
                    {move || {
                        if !model_ready.get() {
                            if model_error.get().is_some() { "Retry model download" } else { "Preparing..." }
                        } else if is_reciting.get() { "Finish recitation" }
                        else { "Start reciting" }
                    }}
                </button>
                <button class="ghost" on:click=reset>"Clear"</button>
                <div class="status-container">
                    <p class="inline-status">{ move || status.get() }</p>
                    {move || model_error.get().map(|err| view! {
                         <div class="error-details">
                            <p class="error-msg">{err}</p>
                            <code class="cmd-block">"hf download ggerganov/whisper.cpp ggml-base.bin"</code>
                         </div>
                    })}
                </div>
            </div>
            <div class="grid">
                <div class="card inner-card">
                    <div class="card-header"><p class="eyebrow">"You recited"</p></div>
                    <div class="transcription-body" dir="rtl">
                        <p class="result-text">
                            {move || if transcription.get().is_empty() { "Your transcription will appear here.".to_string() } else { transcription.get() }}
                        </p>
                    </div>
                </div>
                <div class="card inner-card">
                    <div class="card-header"><p class="eyebrow">"Validation"</p></div>
                    <div class="highlight-body" dir="rtl" inner_html=move || highlight_html.get()></div>
                </div>
            </div>
        </section>
    }
}
