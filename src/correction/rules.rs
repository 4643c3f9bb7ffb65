use regex::{Captures, Regex};

use crate::correction::spans::CharOffsets;
use crate::error::ComparisonError;
use crate::types::{Category, MatchSpan};

/// A regex rule of the fallback table.
///
/// `replacement` is a capture template (`${s} doesn't`). When the pattern has
/// a group named `flag`, only that group is flagged and the rest of the match
/// is context.
#[derive(Debug, Clone, Copy)]
pub struct RuleDef {
    pub rule_id: &'static str,
    pub pattern: &'static str,
    pub replacement: &'static str,
    pub category: Category,
}

const fn grammar(rule_id: &'static str, pattern: &'static str, replacement: &'static str) -> RuleDef {
    RuleDef {
        rule_id,
        pattern,
        replacement,
        category: Category::Grammar,
    }
}

const fn spelling(rule_id: &'static str, pattern: &'static str, replacement: &'static str) -> RuleDef {
    RuleDef {
        rule_id,
        pattern,
        replacement,
        category: Category::Spelling,
    }
}

pub const ENGLISH_RULES: &[RuleDef] = &[
    grammar("SUBJECT_VERB_DONT", r"\b(?P<s>she|he|it)\s+don['’]t\b", "${s} doesn't"),
    grammar("SUBJECT_VERB_I_ARE", r"\bI\s+are\b", "I am"),
    grammar("SUBJECT_VERB_HAVE", r"\b(?P<s>she|he|it)\s+have\b", "${s} has"),
    grammar("SUBJECT_VERB_WAS", r"\b(?P<s>they|we|you)\s+was\b", "${s} were"),
    grammar("THEIR_GOING", r"\b(?P<flag>their|there)\s+going\b", "they're"),
    grammar("YOUR_GOING", r"\b(?P<flag>your)\s+going\b", "you're"),
    grammar("ITS_A", r"\b(?P<flag>its)\s+a\b", "it's"),
    grammar("MODAL_OF", r"\b(?P<m>could|would|should|must)\s+of\b", "${m} have"),
    grammar("BETWEEN_YOU_AND_I", r"\bbetween\s+you\s+and\s+I\b", "between you and me"),
    grammar("ME_AND_HIM", r"\bme\s+and\s+him\b", "he and I"),
    grammar("ME_AND_HER", r"\bme\s+and\s+her\b", "she and I"),
    grammar("PAST_SEEN", r"\b(?P<s>I|we|they)\s+seen\b", "${s} saw"),
    grammar("PERFECT_WENT", r"\b(?P<v>have|has)\s+went\b", "${v} gone"),
    grammar("DOUBLE_COMPARATIVE", r"\bmore\s+(?P<a>prettier|better|worse)\b", "${a}"),
    grammar("DOUBLE_SUPERLATIVE", r"\bmost\s+prettiest\b", "prettiest"),
    spelling("ALOT", r"\balot\b", "a lot"),
    spelling("BEAUTIFULL", r"\bbeautifull\b", "beautiful"),
    spelling("GRAMMER", r"\bgrammer\b", "grammar"),
    spelling("RECIEVE", r"\brecieve\b", "receive"),
    spelling("OCCURED", r"\boccured\b", "occurred"),
    spelling("SEPERATE", r"\bseperate\b", "separate"),
    spelling("DEFINATELY", r"\bdefinately\b", "definitely"),
];

const REPEATED_WORD_RULE: &str = "REPEATED_WORD";

#[derive(Debug)]
struct CompiledRule {
    def: RuleDef,
    regex: Regex,
}

/// Compiled fallback rules plus the repeated-word detector.
#[derive(Debug)]
pub struct RuleTable {
    rules: Vec<CompiledRule>,
    word: Regex,
}

impl RuleTable {
    pub fn new(defs: &[RuleDef]) -> Result<Self, ComparisonError> {
        let rules = defs
            .iter()
            .map(|def| {
                let pattern = format!("(?i){}", def.pattern);
                Regex::new(&pattern)
                    .map(|regex| CompiledRule { def: *def, regex })
                    .map_err(|e| ComparisonError::pattern(def.pattern, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let word_pattern = r"\b\w+\b";
        let word = Regex::new(word_pattern).map_err(|e| ComparisonError::pattern(word_pattern, e))?;
        Ok(Self { rules, word })
    }

    pub fn english() -> Result<Self, ComparisonError> {
        Self::new(ENGLISH_RULES)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Candidate spans in rule order, then repeated words. Spans may overlap;
    /// the resolver settles that.
    pub fn find_spans(&self, text: &str) -> Vec<MatchSpan> {
        let offsets = CharOffsets::new(text);
        let mut spans = Vec::new();

        for rule in &self.rules {
            for caps in rule.regex.captures_iter(text) {
                let Some(whole) = caps.get(0) else {
                    continue;
                };
                let flagged = caps.name("flag").unwrap_or(whole);
                let replacement = match_case(flagged.as_str(), &expand(&caps, rule.def.replacement));
                let mut span = MatchSpan::new(
                    offsets.char_of_byte(flagged.start()),
                    offsets.char_of_byte(flagged.end()),
                    flagged.as_str(),
                    replacement,
                    rule.def.category,
                );
                span.rule_id = rule.def.rule_id.to_string();
                spans.push(span);
            }
        }

        spans.extend(self.repeated_words(text, &offsets));
        spans
    }

    fn repeated_words(&self, text: &str, offsets: &CharOffsets) -> Vec<MatchSpan> {
        let mut spans = Vec::new();
        let mut previous: Option<regex::Match<'_>> = None;
        for word in self.word.find_iter(text) {
            if let Some(prev) = previous {
                let gap = &text[prev.end()..word.start()];
                let adjacent = !gap.is_empty() && gap.chars().all(char::is_whitespace);
                if adjacent && prev.as_str().eq_ignore_ascii_case(word.as_str()) {
                    let mut span = MatchSpan::new(
                        offsets.char_of_byte(prev.start()),
                        offsets.char_of_byte(word.end()),
                        &text[prev.start()..word.end()],
                        prev.as_str(),
                        Category::Grammar,
                    );
                    span.rule_id = REPEATED_WORD_RULE.to_string();
                    spans.push(span);
                    previous = None;
                    continue;
                }
            }
            previous = Some(word);
        }
        spans
    }
}

fn expand(caps: &Captures<'_>, template: &str) -> String {
    let mut out = String::new();
    caps.expand(template, &mut out);
    out
}

/// Carries the case of the flagged text's first letter over to the
/// replacement. A leading pronoun `I` stays upper case.
fn match_case(flagged: &str, replacement: &str) -> String {
    let Some(first) = flagged.chars().next() else {
        return replacement.to_string();
    };
    let mut chars = replacement.chars();
    let Some(head) = chars.next() else {
        return String::new();
    };
    let rest = chars.as_str();
    let pronoun_i = head == 'I' && !rest.starts_with(char::is_alphabetic);
    if first.is_uppercase() {
        head.to_uppercase().chain(rest.chars()).collect()
    } else if first.is_lowercase() && !pronoun_i {
        head.to_lowercase().chain(rest.chars()).collect()
    } else {
        replacement.to_string()
    }
}
