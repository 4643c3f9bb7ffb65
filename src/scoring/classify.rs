use crate::scoring::metrics::word_similarity;
use crate::types::{AlignmentOp, ErrorDetail, ErrorType, OpKind, WordComparison, WordStatus};

const MINOR_THRESHOLD: f64 = 0.8;
const MODERATE_THRESHOLD: f64 = 0.5;
const MAJOR_THRESHOLD: f64 = 0.2;

pub fn classify_substitution(similarity: f64) -> ErrorType {
    if similarity > MINOR_THRESHOLD {
        ErrorType::MinorMispronunciation
    } else if similarity > MODERATE_THRESHOLD {
        ErrorType::ModerateMispronunciation
    } else if similarity > MAJOR_THRESHOLD {
        ErrorType::MajorMispronunciation
    } else {
        ErrorType::WordSubstitution
    }
}

/// Expands alignment ops into one comparison per token pair.
///
/// A `Replace` of `m` reference and `n` candidate tokens pairs the first
/// `min(m, n)` positions as substitutions; the remainder becomes omitted
/// (`m > n`) or extra (`n > m`) words.
pub fn compare_words(
    reference: &[&str],
    candidate: &[&str],
    ops: &[AlignmentOp],
) -> Vec<WordComparison> {
    let mut comparisons = Vec::with_capacity(reference.len().max(candidate.len()));
    for op in ops {
        let ref_words = &reference[op.reference.clone()];
        let cand_words = &candidate[op.candidate.clone()];
        match op.kind {
            OpKind::Equal => {
                for (r, c) in ref_words.iter().zip(cand_words) {
                    comparisons.push(WordComparison {
                        reference_word: Some((*r).to_string()),
                        candidate_word: Some((*c).to_string()),
                        status: WordStatus::Correct,
                        similarity: 1.0,
                        error_type: None,
                    });
                }
            }
            OpKind::Replace => {
                let paired = ref_words.len().min(cand_words.len());
                for (r, c) in ref_words.iter().zip(cand_words) {
                    let similarity = word_similarity(r, c);
                    comparisons.push(WordComparison {
                        reference_word: Some((*r).to_string()),
                        candidate_word: Some((*c).to_string()),
                        status: WordStatus::Substituted,
                        similarity,
                        error_type: Some(classify_substitution(similarity)),
                    });
                }
                comparisons.extend(ref_words[paired..].iter().map(|r| omitted(r)));
                comparisons.extend(cand_words[paired..].iter().map(|c| extra(c)));
            }
            OpKind::Delete => comparisons.extend(ref_words.iter().map(|r| omitted(r))),
            OpKind::Insert => comparisons.extend(cand_words.iter().map(|c| extra(c))),
        }
    }
    comparisons
}

fn omitted(word: &str) -> WordComparison {
    WordComparison {
        reference_word: Some(word.to_string()),
        candidate_word: None,
        status: WordStatus::Omitted,
        similarity: 0.0,
        error_type: Some(ErrorType::Omission),
    }
}

fn extra(word: &str) -> WordComparison {
    WordComparison {
        reference_word: None,
        candidate_word: Some(word.to_string()),
        status: WordStatus::Extra,
        similarity: 0.0,
        error_type: Some(ErrorType::Insertion),
    }
}

pub fn suggestion_for(error_type: ErrorType, expected: &str, recognized: &str) -> String {
    match error_type {
        ErrorType::Omission => {
            format!("Don't skip the word '{expected}'. Practice saying it slowly.")
        }
        ErrorType::Insertion => {
            format!("Avoid adding extra words like '{recognized}'. Stick to the text.")
        }
        ErrorType::MinorMispronunciation => {
            format!("Good attempt at '{expected}'! Try to pronounce it more clearly.")
        }
        ErrorType::ModerateMispronunciation => {
            format!("Practice the pronunciation of '{expected}'. You said '{recognized}'.")
        }
        ErrorType::MajorMispronunciation => {
            format!("Focus on '{expected}' - break it into syllables and practice slowly.")
        }
        ErrorType::WordSubstitution => {
            format!("Try to say '{expected}' instead of '{recognized}'.")
        }
    }
}

pub fn error_details(comparisons: &[WordComparison]) -> Vec<ErrorDetail> {
    comparisons
        .iter()
        .filter_map(|comparison| {
            let error_type = comparison.error_type?;
            let expected = comparison.reference_word.clone().unwrap_or_default();
            let recognized = comparison.candidate_word.clone().unwrap_or_default();
            Some(ErrorDetail {
                error_type,
                suggestion: suggestion_for(error_type, &expected, &recognized),
                expected,
                recognized,
                similarity: comparison.similarity,
            })
        })
        .collect()
}
