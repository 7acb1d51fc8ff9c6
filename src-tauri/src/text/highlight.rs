use super::compare::WordMark;

const CORRECT_BG: &str = "#90ee90";
const INCORRECT_BG: &str = "#ffcccb";

/// Renders a comparison as an HTML fragment: each word in a colored span,
/// words joined by single spaces, the whole sequence wrapped in one `<p>`.
/// Total: an empty comparison yields an empty wrapped block.
pub fn render(marks: &[WordMark]) -> String {
    let mut body = String::new();
    for (i, mark) in marks.iter().enumerate() {
        if i > 0 {
            body.push(' ');
        }
        let color = if mark.correct { CORRECT_BG } else { INCORRECT_BG };
        body.push_str("<span style='background-color: ");
        body.push_str(color);
        body.push_str(";'>");
        body.push_str(&escape(&mark.word));
        body.push_str("</span>");
    }
    format!("<p>{body}</p>")
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
