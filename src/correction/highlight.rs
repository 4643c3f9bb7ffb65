use crate::correction::spans::{CharOffsets, ResolvedSpanSet};
use crate::types::MatchSpan;

const NO_SUGGESTION: &str = "No suggestion";

pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
}

/// Wraps every resolved span in a tooltip `<span>`, escaping all text.
///
/// The output is built left to right from the original text, so each span
/// is wrapped exactly once and its offsets never shift.
pub fn highlight(text: &str, spans: &ResolvedSpanSet) -> String {
    let offsets = CharOffsets::new(text);
    let mut out = String::with_capacity(text.len() + spans.len() * 160);
    let mut cursor = 0;

    for span in spans {
        let (Some(start), Some(end)) = (offsets.byte(span.start), offsets.byte(span.end)) else {
            continue;
        };
        if start < cursor {
            continue;
        }
        push_escaped(&mut out, &text[cursor..start]);
        push_open_tag(&mut out, span);
        push_escaped(&mut out, &text[start..end]);
        out.push_str("</span>");
        cursor = end;
    }
    push_escaped(&mut out, &text[cursor..]);
    out
}

fn push_open_tag(out: &mut String, span: &MatchSpan) {
    let category = span.category.as_str();
    let suggestion = span
        .suggestions
        .first()
        .map(String::as_str)
        .unwrap_or(NO_SUGGESTION);
    out.push_str("<span class=\"grammar-error-");
    out.push_str(category);
    out.push_str("\" title=\"");
    push_escaped(out, &span.message);
    out.push_str(" | Suggestion: ");
    push_escaped(out, suggestion);
    out.push_str("\" data-toggle=\"tooltip\" data-placement=\"top\">");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correction::spans::resolve;
    use crate::types::Category;

    fn span(start: usize, end: usize, replacement: &str, category: Category) -> MatchSpan {
        MatchSpan::new(start, end, "", replacement, category)
    }

    #[test]
    fn escapes_all_markup_characters() {
        assert_eq!(
            escape_markup(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;"
        );
    }

    #[test]
    fn no_spans_is_just_escaped_text() {
        let text = "a < b";
        assert_eq!(highlight(text, &ResolvedSpanSet::default()), "a &lt; b");
    }

    #[test]
    fn wraps_each_span_once() {
        let text = "alot of cats and alot of dogs";
        let resolved = resolve(
            text,
            vec![
                span(0, 4, "a lot", Category::Spelling),
                span(17, 21, "a lot", Category::Spelling),
            ],
        );
        let html = highlight(text, &resolved);
        assert_eq!(html.matches("<span class=\"grammar-error-spelling\"").count(), 2);
        assert_eq!(html.matches("</span>").count(), 2);
        assert!(html.starts_with("<span class=\"grammar-error-spelling\" title=\"Possible spelling error | Suggestion: a lot\""));
        assert!(html.contains("data-toggle=\"tooltip\" data-placement=\"top\">alot</span> of cats and "));
        assert!(html.ends_with("alot</span> of dogs"));
    }

    #[test]
    fn span_text_and_tooltip_are_escaped() {
        let text = "x<y";
        let mut flagged = span(1, 2, "\"<\"", Category::Punctuation);
        flagged.message = "Odd <tag>".to_string();
        let resolved = resolve(text, vec![flagged]);
        let html = highlight(text, &resolved);
        assert_eq!(
            html,
            "x<span class=\"grammar-error-punctuation\" title=\"Odd &lt;tag&gt; | Suggestion: &quot;&lt;&quot;\" \
             data-toggle=\"tooltip\" data-placement=\"top\">&lt;</span>y"
        );
    }

    #[test]
    fn missing_suggestion_is_labelled() {
        let text = "hello";
        let mut flagged = span(0, 5, "", Category::Style);
        flagged.suggestions.clear();
        let html = highlight(text, &resolve(text, vec![flagged]));
        assert!(html.contains("Suggestion: No suggestion"));
    }

    #[test]
    fn multibyte_text_keeps_offsets() {
        let text = "naïve alot";
        let resolved = resolve(text, vec![span(6, 10, "a lot", Category::Spelling)]);
        let html = highlight(text, &resolved);
        assert!(html.starts_with("naïve <span"));
        assert!(html.ends_with(">alot</span>"));
    }
}
