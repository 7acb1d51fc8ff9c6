use rattil_lib::text::{compare, compare_with, normalize, Alignment};

#[test]
fn normalize_is_idempotent() {
    let samples = [
        "بِسْمِ اللَّهِ  الرَّحْمَٰنِ\tالرَّحِيمِ",
        "  plain   ascii words  ",
        "",
        "وَلَا ٱلضَّآلِّينَ",
    ];
    for text in samples {
        let once = normalize(text);
        assert_eq!(normalize(&once), once, "normalize not idempotent for {text:?}");
    }
}

#[test]
fn normalize_strips_the_whole_diacritic_range() {
    // Every combining mark from fathatan (U+064B) through sukun (U+0652).
    let marks: String = ('\u{064B}'..='\u{0652}').collect();
    let text = format!("ب{marks}س");
    assert_eq!(normalize(&text), "بس");
}

#[test]
fn normalize_keeps_characters_outside_the_range() {
    // Maddah above (U+0653) and superscript alef (U+0670) sit outside the
    // stripped range and survive, matching the comparison semantics.
    let text = "ءَآ\u{0653}ب\u{0670}";
    let normalized = normalize(text);
    assert!(normalized.contains('\u{0653}'));
    assert!(normalized.contains('\u{0670}'));
}

#[test]
fn normalize_collapses_whitespace_runs() {
    assert_eq!(normalize("a \t b\n\n  c"), "a b c");
    assert_eq!(normalize("   "), "");
}

#[test]
fn empty_recognized_text_yields_empty_comparison() {
    assert!(compare("", "بسم الله الرحمن الرحيم").is_empty());
    assert!(compare("   ", "reference").is_empty());
}

#[test]
fn identical_text_is_all_correct() {
    let reference = "wordA wordB wordC";
    let marks = compare(reference, reference);
    assert_eq!(marks.len(), 3);
    assert!(marks.iter().all(|m| m.correct));
}

#[test]
fn positional_mismatch_is_flagged() {
    let marks = compare("wordA wordB", "wordA wordX");
    assert_eq!(marks.len(), 2);
    assert!(marks[0].correct);
    assert!(!marks[1].correct);
    assert_eq!(marks[1].word, "wordB");
}

#[test]
fn recognized_words_past_the_reference_are_incorrect() {
    let marks = compare("a b c d", "a b");
    assert_eq!(marks.len(), 4);
    assert!(marks[0].correct && marks[1].correct);
    assert!(!marks[2].correct && !marks[3].correct);
}

#[test]
fn empty_reference_marks_everything_incorrect() {
    let marks = compare("a b", "");
    assert_eq!(marks.len(), 2);
    assert!(marks.iter().all(|m| !m.correct));
}

#[test]
fn diacritics_do_not_affect_matching() {
    let marks = compare("بسم الله", "بِسْمِ اللَّهِ");
    assert_eq!(marks.len(), 2);
    assert!(marks.iter().all(|m| m.correct));
}

#[test]
fn comparison_words_are_normalized_forms() {
    let marks = compare("بِسْمِ", "بسم");
    assert_eq!(marks[0].word, "بسم");
}

#[test]
fn positional_comparison_desyncs_after_a_skipped_word() {
    // The documented limitation: dropping one word shifts everything after it.
    let marks = compare("a c d", "a b c d");
    assert!(marks[0].correct);
    assert!(!marks[1].correct);
    assert!(!marks[2].correct);
}

#[test]
fn realignment_recovers_from_a_skipped_word() {
    let marks = compare_with("a c d", "a b c d", Alignment::Realign);
    assert_eq!(marks.len(), 3);
    assert!(marks.iter().all(|m| m.correct));
}

#[test]
fn realignment_flags_inserted_words_only() {
    let marks = compare_with("a x b", "a b", Alignment::Realign);
    assert_eq!(marks.len(), 3);
    assert!(marks[0].correct);
    assert!(!marks[1].correct);
    assert!(marks[2].correct);
}

#[test]
fn default_alignment_is_positional() {
    assert_eq!(
        compare("a c", "a b c"),
        compare_with("a c", "a b c", Alignment::default())
    );
}
