use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

// Arabic tashkil combining marks, fathatan through sukun.
static DIACRITIC_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new("[\u{064B}-\u{0652}]"));

/// Canonical comparable form: diacritics removed, whitespace runs collapsed
/// to a single space, leading/trailing whitespace trimmed. Idempotent.
pub fn normalize(text: &str) -> String {
    let stripped = match &*DIACRITIC_RE {
        Ok(re) => re.replace_all(text, ""),
        Err(_) => Cow::Borrowed(text),
    };
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
