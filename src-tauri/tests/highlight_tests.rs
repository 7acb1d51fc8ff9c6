use rattil_lib::text::{compare, render, WordMark};

fn mark(word: &str, correct: bool) -> WordMark {
    WordMark {
        word: word.to_string(),
        correct,
    }
}

#[test]
fn empty_comparison_renders_an_empty_block() {
    assert_eq!(render(&[]), "<p></p>");
}

#[test]
fn correct_and_incorrect_words_get_distinct_backgrounds() {
    let html = render(&[mark("بسم", true), mark("الله", false)]);
    assert!(html.contains("background-color: #90ee90"));
    assert!(html.contains("background-color: #ffcccb"));
    assert!(html.starts_with("<p>"));
    assert!(html.ends_with("</p>"));
}

#[test]
fn words_are_joined_by_single_spaces() {
    let html = render(&[mark("a", true), mark("b", true), mark("c", true)]);
    assert_eq!(html.matches("</span> <span").count(), 2);
    assert!(!html.contains("  "));
}

#[test]
fn word_text_is_escaped() {
    let html = render(&[mark("<b>&\"'", false)]);
    assert!(html.contains("&lt;b&gt;&amp;&quot;&#x27;"));
    assert!(!html.contains("<b>"));
}

#[test]
fn render_composes_with_compare() {
    let html = render(&compare("wordA wordB", "wordA wordX"));
    let first_span = html.find("#90ee90").expect("correct span present");
    let second_span = html.find("#ffcccb").expect("incorrect span present");
    assert!(first_span < second_span);
    assert!(html.contains("wordA"));
    assert!(html.contains("wordB"));
}
