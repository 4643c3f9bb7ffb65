use crate::config::{ScoringConfig, TimingConfig};
use crate::scoring::report::round_to;
use crate::types::{PaceRating, TimingAnalysis};

/// Pace estimate from token counts alone; no audio timestamps are involved.
pub fn analyze_timing(
    reference_count: usize,
    candidate_count: usize,
    timing: &TimingConfig,
    scoring: &ScoringConfig,
) -> TimingAnalysis {
    let estimated_duration = reference_count as f64 * timing.seconds_per_word;
    let actual_duration = candidate_count as f64 * timing.seconds_per_word;
    let rate_ratio = if estimated_duration > 0.0 {
        actual_duration / estimated_duration
    } else {
        1.0
    };

    let (pace_rating, pace_feedback) = if rate_ratio < scoring.min_length_ratio {
        (
            PaceRating::TooFast,
            "Try speaking more slowly for better clarity.",
        )
    } else if rate_ratio > scoring.max_length_ratio {
        (
            PaceRating::TooSlow,
            "You can speak a bit faster while maintaining clarity.",
        )
    } else {
        (PaceRating::Good, "Your speaking pace is good!")
    };

    let words_per_minute = if actual_duration > 0.0 {
        candidate_count as f64 / actual_duration * 60.0
    } else {
        0.0
    };

    TimingAnalysis {
        estimated_duration: round_to(estimated_duration, 1),
        actual_duration: round_to(actual_duration, 1),
        words_per_minute: round_to(words_per_minute, 1),
        pace_rating,
        pace_feedback: pace_feedback.to_string(),
        rate_ratio: round_to(rate_ratio, 2),
    }
}
