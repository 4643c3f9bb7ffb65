use crate::types::{MetricsBundle, ScoreResult};

pub const NO_SPEECH_MESSAGE: &str = "No speech was recognized. Please try again.";
pub const NO_REFERENCE_MESSAGE: &str = "There is no reference text to compare against.";

/// Score bands, checked top-down: first `overall >= floor` wins.
const OVERALL_BANDS: [(f64, &str); 4] = [
    (90.0, "Outstanding performance! Your pronunciation is excellent."),
    (80.0, "Great job! Your pronunciation is very good with minor areas for improvement."),
    (70.0, "Good work! Keep practicing to enhance your pronunciation further."),
    (60.0, "You're making progress! Focus on clarity and accuracy."),
];
const OVERALL_FLOOR_MESSAGE: &str = "Keep practicing! Take your time and speak clearly.";

/// Word error rate bands: first `wer < ceiling` wins.
const WER_BANDS: [(f64, &str); 3] = [
    (0.1, "Excellent word accuracy! Almost perfect recognition."),
    (0.3, "Good word accuracy with room for minor improvements."),
    (0.5, "Moderate accuracy. Focus on pronouncing each word clearly."),
];
const WER_FLOOR_MESSAGE: &str = "Work on word clarity. Practice difficult words separately.";

pub fn generate_feedback(scores: &ScoreResult, metrics: &MetricsBundle) -> Vec<String> {
    let mut feedback = Vec::with_capacity(4);

    let overall_message = OVERALL_BANDS
        .iter()
        .find(|(floor, _)| scores.overall >= *floor)
        .map(|(_, message)| *message)
        .unwrap_or(OVERALL_FLOOR_MESSAGE);
    feedback.push(overall_message.to_string());

    let wer_message = WER_BANDS
        .iter()
        .find(|(ceiling, _)| metrics.wer < *ceiling)
        .map(|(_, message)| *message)
        .unwrap_or(WER_FLOOR_MESSAGE);
    feedback.push(wer_message.to_string());

    if metrics.cer < 0.1 {
        feedback.push("Excellent pronunciation clarity!".to_string());
    } else if metrics.cer > 0.3 {
        feedback.push("Focus on articulating sounds more clearly.".to_string());
    }

    if metrics.semantic_similarity > 0.8 {
        feedback.push("Great content understanding and delivery!".to_string());
    } else if metrics.semantic_similarity < 0.5 {
        feedback.push("Make sure to include all the key words from the text.".to_string());
    }

    feedback
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(overall: f64) -> ScoreResult {
        ScoreResult {
            pronunciation: overall,
            fluency: overall,
            completeness: overall,
            overall,
        }
    }

    fn metrics(wer: f64, cer: f64, semantic_similarity: f64) -> MetricsBundle {
        MetricsBundle {
            wer,
            cer,
            bleu_approx: (1.0 - wer).max(0.0),
            semantic_similarity,
        }
    }

    #[test]
    fn perfect_result_feedback() {
        let feedback = generate_feedback(&scores(100.0), &metrics(0.0, 0.0, 1.0));
        assert_eq!(
            feedback,
            vec![
                "Outstanding performance! Your pronunciation is excellent.",
                "Excellent word accuracy! Almost perfect recognition.",
                "Excellent pronunciation clarity!",
                "Great content understanding and delivery!",
            ]
        );
    }

    #[test]
    fn band_edges_are_inclusive_for_scores() {
        assert!(generate_feedback(&scores(80.0), &metrics(0.2, 0.2, 0.6))[0].starts_with("Great job!"));
        assert!(generate_feedback(&scores(59.9), &metrics(0.2, 0.2, 0.6))[0].starts_with("Keep practicing!"));
    }

    #[test]
    fn middle_metrics_add_no_extra_lines() {
        let feedback = generate_feedback(&scores(72.0), &metrics(0.3, 0.2, 0.6));
        assert_eq!(feedback.len(), 2);
        assert_eq!(
            feedback[1],
            "Moderate accuracy. Focus on pronouncing each word clearly."
        );
    }

    #[test]
    fn weak_result_feedback() {
        let feedback = generate_feedback(&scores(10.0), &metrics(1.0, 0.9, 0.0));
        assert_eq!(
            feedback,
            vec![
                "Keep practicing! Take your time and speak clearly.",
                "Work on word clarity. Practice difficult words separately.",
                "Focus on articulating sounds more clearly.",
                "Make sure to include all the key words from the text.",
            ]
        );
    }

    #[test]
    fn feedback_is_deterministic() {
        let a = generate_feedback(&scores(65.0), &metrics(0.25, 0.35, 0.4));
        let b = generate_feedback(&scores(65.0), &metrics(0.25, 0.35, 0.4));
        assert_eq!(a, b);
    }
}
