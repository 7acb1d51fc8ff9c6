use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::*;
use crate::utils::select_value;

#[component]
pub fn SelectionSection(
    chapters: ReadSignal<Vec<ChapterOptionDto>>,
    verses: ReadSignal<Vec<VerseOptionDto>>,
    set_verses: WriteSignal<Vec<VerseOptionDto>>,
    selected_chapter: ReadSignal<String>,
    set_selected_chapter: WriteSignal<String>,
    selected_verse: ReadSignal<String>,
    set_selected_verse: WriteSignal<String>,
    reference_text: ReadSignal<String>,
    set_reference_text: WriteSignal<String>,
    is_reciting: ReadSignal<bool>,
    set_transcription: WriteSignal<String>,
    set_highlight_html: WriteSignal<String>,
) -> impl IntoView {
    let on_chapter_change = move |ev: leptos::ev::Event| {
        let chapter = select_value(&ev);
        set_selected_chapter.set(chapter.clone());
        set_selected_verse.set(String::new());
        set_reference_text.set(String::new());
        set_transcription.set(String::new());
        set_highlight_html.set(String::new());

        if chapter.is_empty() {
            set_verses.set(Vec::new());
            return;
        }
        spawn_local(async move {
            match fetch_verses(&chapter).await {
                Ok(list) => set_verses.set(list),
                Err(e) => {
                    leptos::logging::error!("Failed to fetch verses: {}", e);
                    set_verses.set(Vec::new());
                }
            }
        });
    };

    let on_verse_change = move |ev: leptos::ev::Event| {
        let verse = select_value(&ev);
        set_selected_verse.set(verse.clone());
        set_transcription.set(String::new());
        set_highlight_html.set(String::new());

        if verse.is_empty() {
            set_reference_text.set(String::new());
            return;
        }
        let chapter = selected_chapter.get_untracked();
        spawn_local(async move {
            match fetch_verse_text(&chapter, &verse).await {
                // An unknown selection comes back as a placeholder message;
                // show it in place of the verse.
                Ok(text) => set_reference_text.set(text),
                Err(message) => set_reference_text.set(message),
            }
        });
    };

    view! {
        <section class="card selection-card">
            <div class="card-header">
                <div>
                    <p class="eyebrow">"Reference"</p>
                    <h2>"Pick the aya to recite"</h2>
                </div>
            </div>
            <div class="selection-row">
                <select
                    class="selector"
                    on:change=on_chapter_change
                    disabled=move || is_reciting.get()
                    prop:value=move || selected_chapter.get()
                >
                    <option value="">"Select Sura"</option>
                    {move || {
                        chapters
                            .get()
                            .into_iter()
                            .map(|c| {
                                let label = format!("{}: {}", c.index, c.name);
                                view! { <option value=c.index.clone()>{label}</option> }
                            })
                            .collect_view()
                    }}
                </select>
                <select
                    class="selector"
                    on:change=on_verse_change
                    disabled=move || is_reciting.get() || selected_chapter.get().is_empty()
                    prop:value=move || selected_verse.get()
                >
                    <option value="">"Select Aya"</option>
                    {move || {
                        verses
                            .get()
                            .into_iter()
                            .map(|v| {
                                let label = format!("{}: {}", v.index, v.text);
                                view! { <option value=v.index.clone()>{label}</option> }
                            })
                            .collect_view()
                    }}
                </select>
            </div>
            <div class="reference-body" dir="rtl">
                <p class="reference-text">
                    {move || {
                        if reference_text.get().is_empty() {
                            "The selected aya will appear here.".to_string()
                        } else {
                            reference_text.get()
                        }
                    }}
                </p>
            </div>
        </section>
    }
}
