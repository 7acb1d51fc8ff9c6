use rattil_lib::corpus::{Corpus, CorpusError};

const SAMPLE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<quran>
  <sura index="1" name="الفاتحة">
    <aya index="1" text="بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ"/>
    <aya index="2" text="الْحَمْدُ لِلَّهِ رَبِّ الْعَالَمِينَ"/>
  </sura>
  <sura index="112" name="الإخلاص">
    <aya index="1" text="قُلْ هُوَ اللَّهُ أَحَدٌ"/>
  </sura>
</quran>
"#;

fn sample_corpus() -> Corpus {
    Corpus::from_reader(SAMPLE_XML.as_bytes()).expect("sample corpus should parse")
}

#[test]
fn chapters_keep_document_order() {
    let corpus = sample_corpus();
    let chapters = corpus.chapters();

    assert_eq!(chapters.len(), 2);
    assert_eq!(chapters[0].index, "1");
    assert_eq!(chapters[0].name, "الفاتحة");
    assert_eq!(chapters[1].index, "112");
    assert_eq!(chapters[1].name, "الإخلاص");
}

#[test]
fn verses_keep_document_order() {
    let corpus = sample_corpus();
    let verses = corpus.verses("1");

    assert_eq!(verses.len(), 2);
    assert_eq!(verses[0].index, "1");
    assert_eq!(verses[1].index, "2");
    assert!(verses[0].text.starts_with("بِسْمِ"));
}

#[test]
fn unknown_chapter_yields_empty_verse_list() {
    let corpus = sample_corpus();
    assert!(corpus.verses("99").is_empty());
}

#[test]
fn verse_text_lookup() {
    let corpus = sample_corpus();
    let text = corpus.verse_text("112", "1").expect("verse should exist");
    assert_eq!(text, "قُلْ هُوَ اللَّهُ أَحَدٌ");
}

#[test]
fn unknown_chapter_is_not_found_with_user_message() {
    let corpus = sample_corpus();
    let err = corpus.verse_text("99", "1").unwrap_err();
    assert!(matches!(err, CorpusError::ChapterNotFound(_)));
    assert!(err.user_message().contains("chapter"));
}

#[test]
fn unknown_verse_is_not_found_with_user_message() {
    let corpus = sample_corpus();
    let err = corpus.verse_text("1", "99").unwrap_err();
    assert!(matches!(err, CorpusError::VerseNotFound(..)));
    assert!(err.user_message().contains("verse"));
}

#[test]
fn malformed_document_is_an_error_not_a_panic() {
    let result = Corpus::from_reader("<quran><sura".as_bytes());
    assert!(result.is_err());
}

#[test]
fn missing_attribute_is_reported() {
    let xml = r#"<quran><sura index="1"><aya index="1" text="x"/></sura></quran>"#;
    let err = Corpus::from_reader(xml.as_bytes()).unwrap_err();
    assert!(matches!(
        err,
        CorpusError::MissingAttribute {
            element: "sura",
            attribute: "name"
        }
    ));
    assert!(!err.user_message().is_empty());
}

#[test]
fn verse_outside_chapter_is_rejected() {
    let xml = r#"<quran><aya index="1" text="x"/></quran>"#;
    let err = Corpus::from_reader(xml.as_bytes()).unwrap_err();
    assert!(matches!(err, CorpusError::VerseOutsideChapter));
}

#[test]
fn load_missing_file_is_an_error() {
    let result = Corpus::load(std::path::Path::new("/nonexistent/corpus.xml"));
    assert!(matches!(result, Err(CorpusError::Io(_))));
}

#[test]
fn load_or_empty_degrades_on_malformed_source() {
    let temp = std::env::temp_dir().join(format!(
        "rattil_corpus_{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::write(&temp, "<quran><sura").expect("write should succeed");

    let corpus = Corpus::load_or_empty(&temp);
    assert!(corpus.is_empty());

    let _ = std::fs::remove_file(&temp);
}

#[test]
fn load_or_empty_degrades_on_missing_source() {
    let corpus = Corpus::load_or_empty(std::path::Path::new("/nonexistent/corpus.xml"));
    assert!(corpus.is_empty());
}

#[test]
fn empty_corpus_has_no_content() {
    let corpus = Corpus::empty();
    assert!(corpus.is_empty());
    assert!(corpus.chapters().is_empty());
    assert!(corpus.verses("1").is_empty());
}

#[test]
fn attribute_entities_are_unescaped() {
    let xml = r#"<quran><sura index="1" name="A &amp; B"><aya index="1" text="x &lt; y"/></sura></quran>"#;
    let corpus = Corpus::from_reader(xml.as_bytes()).expect("entities should parse");
    assert_eq!(corpus.chapters()[0].name, "A & B");
    assert_eq!(corpus.verse_text("1", "1").unwrap(), "x < y");
}
