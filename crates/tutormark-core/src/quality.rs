//! Structural quality metrics and the engagement score.

use crate::model::QualityMetrics;

/// Computes objective structural metrics of a raw response.
///
/// Pure and total. A blank or whitespace-only response counts as zero words,
/// zero sentences.
pub fn analyze(response: &str) -> QualityMetrics {
    let word_count = response.split_whitespace().count();
    QualityMetrics {
        char_length: response.chars().count(),
        word_count,
        sentence_count: response
            .split(['.', '!', '?'])
            .filter(|segment| !segment.trim().is_empty())
            .count(),
        has_punctuation: response.contains(['.', '!', '?']),
        includes_details: word_count > 30,
    }
}

/// Converts quality metrics and the criteria verdict into a 0-100 score.
///
/// score = round( min(word_count / 125 * 40, 40)
///              + 15 if punctuated
///              + 15 if detailed
///              + 30 if expectations met )
///
/// The component maxima sum to exactly 100, so the result is in range by
/// construction.
pub fn engagement_score(quality: &QualityMetrics, meets_expectations: bool) -> u8 {
    let mut raw = (quality.word_count as f64 / 125.0 * 40.0).min(40.0);
    if quality.has_punctuation {
        raw += 15.0;
    }
    if quality.includes_details {
        raw += 15.0;
    }
    if meets_expectations {
        raw += 30.0;
    }
    raw.round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(word_count: usize, has_punctuation: bool, includes_details: bool) -> QualityMetrics {
        QualityMetrics {
            char_length: 0,
            word_count,
            sentence_count: 0,
            has_punctuation,
            includes_details,
        }
    }

    #[test]
    fn blank_response_is_all_zero() {
        for blank in ["", "   ", "\n\t "] {
            let q = analyze(blank);
            assert_eq!(q.word_count, 0);
            assert_eq!(q.sentence_count, 0);
            assert!(!q.has_punctuation);
            assert!(!q.includes_details);
        }
    }

    #[test]
    fn counts_words_sentences_and_chars() {
        let q = analyze("I interviewed users. They hated checkout!");
        assert_eq!(q.word_count, 6);
        assert_eq!(q.sentence_count, 2);
        assert_eq!(q.char_length, 41);
        assert!(q.has_punctuation);
        assert!(!q.includes_details);
    }

    #[test]
    fn consecutive_terminators_count_one_sentence() {
        let q = analyze("Really?! Yes... definitely.");
        assert_eq!(q.sentence_count, 3);
    }

    #[test]
    fn details_flag_flips_above_thirty_words() {
        let thirty = vec!["word"; 30].join(" ");
        let thirty_one = vec!["word"; 31].join(" ");
        assert!(!analyze(&thirty).includes_details);
        assert!(analyze(&thirty_one).includes_details);
    }

    #[test]
    fn score_components_add_up() {
        // 50 words: 50/125*40 = 16, plus all three bonuses.
        assert_eq!(engagement_score(&metrics(50, true, true), true), 76);
        // Word component caps at 40.
        assert_eq!(engagement_score(&metrics(500, true, true), true), 100);
        // Nothing at all.
        assert_eq!(engagement_score(&metrics(0, false, false), false), 0);
        // Expectations alone.
        assert_eq!(engagement_score(&metrics(0, false, false), true), 30);
    }

    #[test]
    fn score_rounds_the_word_component() {
        // 1 word: 0.32 rounds to 0; 2 words: 0.64 rounds to 1.
        assert_eq!(engagement_score(&metrics(1, false, false), false), 0);
        assert_eq!(engagement_score(&metrics(2, false, false), false), 1);
    }

    #[test]
    fn score_stays_in_range() {
        for word_count in 0..400 {
            for punct in [false, true] {
                for details in [false, true] {
                    for meets in [false, true] {
                        let score =
                            engagement_score(&metrics(word_count, punct, details), meets);
                        assert!(score <= 100);
                    }
                }
            }
        }
    }
}
