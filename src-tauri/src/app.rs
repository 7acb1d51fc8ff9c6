use std::time::Instant;

use tauri::{App, AppHandle, Builder, Manager};

use crate::commands;
use crate::corpus::Corpus;
use crate::engine::SpeechEngine;
use crate::settings;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let context = tauri::generate_context!();

    let app = Builder::default()
        .plugin(tauri_plugin_single_instance::init(on_second_instance))
        .plugin(
            tauri_plugin_log::Builder::new()
                .targets([
                    tauri_plugin_log::Target::new(tauri_plugin_log::TargetKind::Stdout),
                    tauri_plugin_log::Target::new(tauri_plugin_log::TargetKind::LogDir {
                        file_name: None,
                    }),
                ])
                .rotation_strategy(tauri_plugin_log::RotationStrategy::KeepAll)
                .max_file_size(2_000_000)
                .timezone_strategy(tauri_plugin_log::TimezoneStrategy::UseLocal)
                .level(log::LevelFilter::Info)
                .build(),
        )
        .plugin(tauri_plugin_store::Builder::default().build())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let handle = app.handle().clone();
            app.manage(load_corpus(&handle));
            app.manage(SpeechEngine::new(handle));
            setup(app)
        })
        .invoke_handler(tauri::generate_handler![
            commands::list_chapters,
            commands::list_verses,
            commands::get_verse_text,
            commands::start_recitation,
            commands::stop_recitation,
            commands::reset_session,
            commands::is_model_ready,
            commands::model_download_progress,
            commands::retry_model_download,
            commands::get_model_path,
            commands::set_model_path,
            commands::pick_model_folder,
            commands::get_corpus_path,
            commands::set_corpus_path,
            commands::pick_corpus_file,
            commands::get_realign,
            commands::set_realign,
            commands::reset_settings
        ])
        .build(context)
        .expect("error while running tauri application");

    app.run(|_app_handle, _event| {});
}

fn on_second_instance(app: &AppHandle, argv: Vec<String>, cwd: String) {
    log::info!("{}, {argv:?}, {cwd}", app.package_info().name);
    if let Some(window) = app.get_webview_window("main") {
        let _ = window.show();
        let _ = window.set_focus();
    }
}

/// Malformed or missing corpus data never aborts startup: the app comes up
/// with an empty store and no selectable content.
fn load_corpus(app: &AppHandle) -> Corpus {
    let Some(path) = settings::corpus_source(app) else {
        log::error!("No corpus source available; starting with an empty verse store");
        return Corpus::empty();
    };

    Corpus::load_or_empty(&path)
}

fn setup(app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
    prewarm_model(app.handle().clone());
    Ok(())
}

fn prewarm_model(app_handle: AppHandle) {
    std::thread::spawn(move || {
        let start = Instant::now();
        let state = app_handle.state::<SpeechEngine>();
        let result = state.ensure_model_loaded();
        let elapsed = start.elapsed();

        match result {
            Ok(()) => {
                log::info!("Speech model pre-warmed successfully in {:?}", elapsed);
            }
            Err(err) => {
                log::error!("Failed to pre-warm speech model after {:?}: {}", elapsed, err);
            }
        }
    });
}
