use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::*;

#[component]
pub fn SettingsSection(
    model_path: ReadSignal<String>,
    set_model_path: WriteSignal<String>,
    corpus_path: ReadSignal<String>,
    set_corpus_path: WriteSignal<String>,
    realign: ReadSignal<bool>,
    set_realign: WriteSignal<bool>,
    set_status: WriteSignal<String>,
) -> impl IntoView {
    let change_model_path = move |_| {
        spawn_local(async move {
            match pick_model_folder_cmd().await {
                Ok(Some(path)) => match save_model_path(path.clone()).await {
                    Ok(_) => {
                        set_model_path.set(path);
                        set_status.set("Model path updated.".to_string());
                    }
                    Err(e) => set_status.set(format!("Failed to save path: {}", e)),
                },
                Ok(None) => {}
                Err(e) => set_status.set(format!("Failed to pick folder: {}", e)),
            }
        });
    };

    let change_corpus_path = move |_| {
        spawn_local(async move {
            match pick_corpus_file_cmd().await {
                Ok(Some(path)) => match save_corpus_path(path.clone()).await {
                    Ok(_) => {
                        set_corpus_path.set(path);
                        set_status
                            .set("Corpus path updated. Restart the app to load it.".to_string());
                    }
                    Err(e) => set_status.set(format!("Failed to save path: {}", e)),
                },
                Ok(None) => {}
                Err(e) => set_status.set(format!("Failed to pick file: {}", e)),
            }
        });
    };

    let reset_settings_action = move |_| {
        spawn_local(async move {
            match reset_settings_cmd().await {
                Ok(_) => {
                    if let Ok(path) = fetch_model_path().await {
                        set_model_path.set(path);
                    }
                    if let Ok(Some(path)) = fetch_corpus_path().await {
                        set_corpus_path.set(path);
                    }
                    if let Ok(enabled) = fetch_realign().await {
                        set_realign.set(enabled);
                    }
                    set_status.set("Settings reset.".to_string());
                }
                Err(e) => set_status.set(format!("Reset failed: {}", e)),
            }
        });
    };

    view! {
        <div class="settings-section">
            <div class="settings-row">
                <div class="settings-label">
                    <span class="settings-title">"Word Realignment"</span>
                    <span class="settings-hint">"Recover from skipped or inserted words instead of strict position matching"</span>
                </div>
                <button
                    class="toggle"
                    class:active=move || realign.get()
                    on:click=move |_| {
                        let new_val = !realign.get();
                        set_realign.set(new_val);
                        spawn_local(async move { let _ = save_realign(new_val).await; });
                    }
                >
                    <div class="toggle-track"><div class="toggle-thumb"></div></div>
                </button>
            </div>
            <div class="settings-row">
                <div class="settings-label">
                    <span class="settings-title">"Model Location"</span>
                    <code class="path-code">{ move || model_path.get() }</code>
                </div>
                <button class="ghost compact" on:click=change_model_path>"Change"</button>
            </div>
            <div class="settings-row">
                <div class="settings-label">
                    <span class="settings-title">"Corpus File"</span>
                    <code class="path-code">{ move || corpus_path.get() }</code>
                </div>
                <button class="ghost compact" on:click=change_corpus_path>"Change"</button>
            </div>
            <div class="settings-divider"></div>
            <div class="settings-footer">
                <button class="danger compact" on:click=reset_settings_action>"Reset All Settings"</button>
            </div>
        </div>
    }
}
