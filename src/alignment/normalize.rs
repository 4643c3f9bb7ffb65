use crate::types::NormalizedText;

/// Applied in order; the specific negations must run before the generic `n't`.
const CONTRACTIONS: [(&str, &str); 9] = [
    ("don't", "do not"),
    ("won't", "will not"),
    ("can't", "cannot"),
    ("n't", " not"),
    ("'re", " are"),
    ("'ve", " have"),
    ("'ll", " will"),
    ("'d", " would"),
    ("'m", " am"),
];

pub fn normalize_text(text: &str) -> NormalizedText {
    let mut cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '\'')
        .collect();

    if cleaned.contains('\'') {
        for (contraction, expansion) in CONTRACTIONS {
            if cleaned.contains(contraction) {
                cleaned = cleaned.replace(contraction, expansion);
            }
        }
    }

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    NormalizedText::from_normalized(collapsed)
}
