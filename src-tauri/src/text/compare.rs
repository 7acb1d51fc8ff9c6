use serde::Serialize;

use super::normalize::normalize;

/// One recognized word and whether it matched the reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordMark {
    pub word: String,
    pub correct: bool,
}

/// How recognized words are lined up against the reference.
///
/// `Positional` compares word i against word i: a single inserted or dropped
/// word desynchronizes everything after it. That matches the legacy behavior
/// exactly and stays the default; `Realign` recovers from insertions and
/// deletions with a longest-common-subsequence pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Positional,
    Realign,
}

pub fn compare(recognized: &str, reference: &str) -> Vec<WordMark> {
    compare_with(recognized, reference, Alignment::Positional)
}

/// Normalizes both inputs, splits into words, and marks each recognized word.
/// The result has one entry per recognized word; recognized words past the
/// end of the reference are always incorrect.
pub fn compare_with(recognized: &str, reference: &str, alignment: Alignment) -> Vec<WordMark> {
    let recognized = normalize(recognized);
    let reference = normalize(reference);
    let spoken: Vec<&str> = recognized.split_whitespace().collect();
    let expected: Vec<&str> = reference.split_whitespace().collect();

    match alignment {
        Alignment::Positional => spoken
            .iter()
            .enumerate()
            .map(|(i, word)| WordMark {
                word: (*word).to_string(),
                correct: expected.get(i).is_some_and(|e| e == word),
            })
            .collect(),
        Alignment::Realign => realign(&spoken, &expected),
    }
}

fn realign(spoken: &[&str], expected: &[&str]) -> Vec<WordMark> {
    let n = spoken.len();
    let m = expected.len();

    // lcs[i][j] = longest common subsequence of spoken[i..] and expected[j..]
    let mut lcs = vec![vec![0u32; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if spoken[i] == expected[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut marks = Vec::with_capacity(n);
    let (mut i, mut j) = (0, 0);
    while i < n {
        if j < m && spoken[i] == expected[j] {
            marks.push(WordMark {
                word: spoken[i].to_string(),
                correct: true,
            });
            i += 1;
            j += 1;
        } else if j < m && lcs[i][j + 1] >= lcs[i + 1][j] {
            // The reference word was skipped in speech.
            j += 1;
        } else {
            marks.push(WordMark {
                word: spoken[i].to_string(),
                correct: false,
            });
            i += 1;
        }
    }
    marks
}
