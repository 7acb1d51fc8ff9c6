use std::time::{SystemTime, UNIX_EPOCH};

use rattil_lib::asr::missing_model_files_for_tests;

#[test]
fn missing_model_files_detects_an_incomplete_root() {
    let temp_dir = std::env::temp_dir().join(format!(
        "rattil_model_root_{}",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));

    std::fs::create_dir_all(&temp_dir).expect("temp dir should be creatable");

    let initial_missing = missing_model_files_for_tests(&temp_dir);
    assert!(
        initial_missing.contains(&"ggml-base.bin".to_string()),
        "expected the model file to be missing in an empty root"
    );

    for file in &initial_missing {
        std::fs::write(temp_dir.join(file), b"ok").expect("write should succeed");
    }

    let missing_after = missing_model_files_for_tests(&temp_dir);
    assert!(missing_after.is_empty());

    let _ = std::fs::remove_dir_all(&temp_dir);
}

#[test]
fn missing_model_files_on_a_nonexistent_root_lists_everything() {
    let ghost = std::env::temp_dir().join("rattil_model_root_that_never_existed");
    let missing = missing_model_files_for_tests(&ghost);
    assert_eq!(missing, vec!["ggml-base.bin".to_string()]);
}
