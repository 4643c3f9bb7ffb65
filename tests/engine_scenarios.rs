use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use transcript_compare::{
    ComparisonConfig, ComparisonEngine, ComparisonEngineBuilder, ComparisonError,
    CorrectionService, ErrorType, ExternalMatch, PaceRating, ServiceHandle, SourceKind,
    WordStatus,
};

const FOX: &str = "The quick brown fox jumps over the lazy dog";

fn engine() -> ComparisonEngine {
    ComparisonEngineBuilder::default()
        .build()
        .expect("default engine builds")
}

fn engine_with_service(handle: Arc<ServiceHandle>, timeout_ms: u64) -> ComparisonEngine {
    let mut config = ComparisonConfig::default();
    config.correction.service_timeout_ms = timeout_ms;
    ComparisonEngineBuilder::new(config)
        .with_correction_service(handle)
        .build()
        .expect("engine builds")
}

/// Flags every "teh" as a typo, the way a spell checker would.
struct TypoService {
    delay: Duration,
}

impl CorrectionService for TypoService {
    fn check(&self, text: &str) -> Result<Vec<ExternalMatch>, ComparisonError> {
        thread::sleep(self.delay);
        let chars: Vec<char> = text.chars().collect();
        let needle: Vec<char> = "teh".chars().collect();
        Ok(chars
            .windows(needle.len())
            .enumerate()
            .filter(|(_, window)| *window == needle.as_slice())
            .map(|(start, _)| ExternalMatch {
                start,
                end: start + needle.len(),
                replacements: vec!["the".to_string()],
                rule_id: "MORFOLOGIK_RULE_EN_US".to_string(),
                category: "Possible Typo".to_string(),
                message: "Possible spelling mistake found.".to_string(),
            })
            .collect())
    }
}

#[test]
fn identical_sentence_scores_perfectly() {
    let report = engine().compare(FOX, FOX);
    assert_eq!(report.wer, 0.0);
    assert_eq!(report.cer, 0.0);
    assert_eq!(report.pronunciation_score, 100.0);
    assert_eq!(report.completeness_score, 100.0);
    assert_eq!(report.overall_score, 100.0);
    assert!(report.error_details.is_empty());
    assert!(report
        .word_analysis
        .iter()
        .all(|w| w.status == WordStatus::Correct));
    let timing = report.timing_analysis.expect("timing for scored input");
    assert_eq!(timing.pace_rating, PaceRating::Good);
}

#[test]
fn blank_candidate_is_neutral_no_speech() {
    let report = engine().compare("she likes pizza", "");
    assert_eq!(report.wer, 1.0);
    assert_eq!(report.overall_score, 0.0);
    assert_eq!(report.pronunciation_score, 0.0);
    assert_eq!(report.fluency_score, 0.0);
    assert_eq!(report.completeness_score, 0.0);
    assert_eq!(report.feedback, vec!["No speech was recognized. Please try again."]);
    assert!(report.timing_analysis.is_none());

    let json = serde_json::to_value(&report).expect("report serializes");
    assert_eq!(json["timing_analysis"], serde_json::Value::Null);
    assert_eq!(json["word_analysis"], serde_json::json!([]));
}

#[test]
fn long_candidate_keeps_rates_in_range() {
    let report = engine().compare("hi", "oh hello there friend");
    assert_eq!(report.wer, 4.0);
    assert_eq!(report.bleu_score, 0.0);
    assert_eq!(report.accuracy_percentage, 0.0);
    assert_eq!(report.fluency_score, 0.0);
}

#[test]
fn punctuation_only_candidate_is_scored_not_blank() {
    let report = engine().compare("she likes pizza", "?!");
    assert_eq!(report.wer, 1.0);
    assert_eq!(report.overall_score, 0.0);
    assert_eq!(report.pronunciation_score, 0.0);
    assert_eq!(report.fluency_score, 0.0);
    assert_eq!(report.completeness_score, 0.0);
    assert!(!report
        .feedback
        .iter()
        .any(|line| line.starts_with("No speech was recognized")));
    assert_eq!(report.error_details.len(), 3);
    assert!(report
        .error_details
        .iter()
        .all(|d| d.error_type == ErrorType::Omission));
}

#[test]
fn legacy_scaling_saturates_pronunciation() {
    let reference = "the cat sat on the mat";
    let candidate = "the cat sat on the hat";
    let corrected = engine().compare(reference, candidate);
    assert_eq!(corrected.pronunciation_score, 87.8);

    let mut config = ComparisonConfig::default();
    config.scoring.legacy_pronunciation_scaling = true;
    let legacy = ComparisonEngineBuilder::new(config)
        .build()
        .expect("engine builds")
        .compare(reference, candidate);
    assert_eq!(legacy.pronunciation_score, 100.0);
    assert_eq!(legacy.wer, corrected.wer);
}

#[test]
fn nested_spans_keep_the_longest() {
    let text = "She don't like it.";
    let matches = vec![
        ExternalMatch {
            start: 0,
            end: 4,
            replacements: vec!["She ".to_string()],
            rule_id: "SHORT".to_string(),
            category: "Grammar".to_string(),
            message: String::new(),
        },
        ExternalMatch {
            start: 0,
            end: 9,
            replacements: vec!["She doesn't".to_string()],
            rule_id: "HE_VERB_AGR".to_string(),
            category: "Grammar".to_string(),
            message: "Use \"doesn't\" with a third-person subject.".to_string(),
        },
    ];
    let report = engine().correct_with_matches(text, matches);
    assert_eq!(report.error_count, 1);
    assert_eq!(report.errors[0].offset, 0);
    assert_eq!(report.errors[0].length, 9);
    assert_eq!(report.corrected_text, "She doesn't like it.");
    assert_eq!(report.source, Some(SourceKind::External));
    assert_eq!(report.highlighted_text.matches("<span").count(), 1);
}

#[test]
fn repeated_misspelling_is_corrected_everywhere() {
    let report = engine().correct("alot of cats and alot of dogs");
    assert_eq!(report.error_count, 2);
    assert_eq!(report.corrected_text, "a lot of cats and a lot of dogs");
    assert_eq!(report.highlighted_text.matches("grammar-error-spelling").count(), 2);
    assert_eq!(report.accuracy_score, 70.0);
    assert_eq!(report.source, Some(SourceKind::Fallback));
}

#[test]
fn corrections_follow_offsets_not_first_occurrence() {
    let text = "teh cat and teh dog";
    let matches = vec![ExternalMatch {
        start: 12,
        end: 15,
        replacements: vec!["the".to_string()],
        rule_id: "MORFOLOGIK_RULE_EN_US".to_string(),
        category: "Possible Typo".to_string(),
        message: "Possible spelling mistake found.".to_string(),
    }];
    let report = engine().correct_with_matches(text, matches);
    assert_eq!(report.corrected_text, "teh cat and the dog");
    assert_eq!(report.corrections_applied[0].position, 12);
}

#[test]
fn external_service_is_preferred_when_it_answers() {
    let handle = Arc::new(ServiceHandle::ready(Arc::new(TypoService {
        delay: Duration::ZERO,
    })));
    let report = engine_with_service(handle, 1_000).correct("teh cat and teh dog");
    assert_eq!(report.source, Some(SourceKind::External));
    assert_eq!(report.corrected_text, "the cat and the dog");
    assert_eq!(report.errors[0].category.as_str(), "spelling");
}

#[test]
fn slow_service_falls_back_to_rules() {
    let handle = Arc::new(ServiceHandle::ready(Arc::new(TypoService {
        delay: Duration::from_millis(500),
    })));
    let report = engine_with_service(handle, 20).correct("I recieve alot of mail");
    assert_eq!(report.source, Some(SourceKind::Fallback));
    assert_eq!(report.corrected_text, "I receive a lot of mail");
}

#[test]
fn failed_service_startup_falls_back_every_time() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    let handle = Arc::new(ServiceHandle::lazy(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Err(ComparisonError::service("startup", "server not reachable"))
    }));
    let engine = engine_with_service(handle, 1_000);
    for _ in 0..3 {
        let report = engine.correct("She don't like it.");
        assert_eq!(report.source, Some(SourceKind::Fallback));
        assert_eq!(report.corrected_text, "She doesn't like it.");
    }
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[test]
fn shared_engine_initializes_service_once_under_concurrency() {
    let constructed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&constructed);
    let handle = Arc::new(ServiceHandle::lazy(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        Ok(Arc::new(TypoService {
            delay: Duration::ZERO,
        }) as Arc<dyn CorrectionService>)
    }));
    let engine = Arc::new(engine_with_service(handle, 2_000));

    let workers: Vec<_> = (0..8)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let report = engine.correct("teh end");
                let comparison = engine.compare(FOX, if i % 2 == 0 { FOX } else { "the quick fox" });
                (report.corrected_text, comparison.wer)
            })
        })
        .collect();
    for worker in workers {
        let (corrected, wer) = worker.join().expect("worker thread");
        assert_eq!(corrected, "the end");
        assert!((0.0..=1.0).contains(&wer));
    }
    assert_eq!(constructed.load(Ordering::SeqCst), 1);
}

#[test]
fn reports_serialize_with_expected_field_names() {
    let engine = engine();
    let comparison = serde_json::to_value(engine.compare("she likes pizza", "she likes pizzas"))
        .expect("comparison serializes");
    for key in [
        "pronunciation_score",
        "fluency_score",
        "completeness_score",
        "overall_score",
        "wer",
        "cer",
        "bleu_score",
        "semantic_similarity",
        "word_analysis",
        "error_details",
        "feedback",
        "timing_analysis",
        "expected_words",
        "recognized_words",
        "accuracy_percentage",
    ] {
        assert!(comparison.get(key).is_some(), "missing {key}");
    }
    assert_eq!(comparison["word_analysis"][2]["expected"], "pizza");
    assert_eq!(comparison["word_analysis"][2]["recognized"], "pizzas");
    assert_eq!(comparison["error_details"][0]["type"], "minor_mispronunciation");

    let correction = serde_json::to_value(engine.correct("She don't like it."))
        .expect("correction serializes");
    assert_eq!(correction["errors"][0]["severity"], "high");
    assert_eq!(correction["errors"][0]["context"], "**She don't** like it.");
    assert_eq!(correction["corrections_applied"][0]["correction"], "She doesn't");
}
