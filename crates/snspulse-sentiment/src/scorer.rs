//! General-purpose lexicon scorer for short social posts.

use crate::classifier::PolarityScorer;
use crate::error::SentimentError;

/// Word weights.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative. The final score is clamped to `[-1.0, 1.0]`.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    // Positive signals
    ("love", 0.5),
    ("loved", 0.5),
    ("loving", 0.5),
    ("great", 0.4),
    ("good", 0.3),
    ("nice", 0.3),
    ("excellent", 0.5),
    ("amazing", 0.5),
    ("awesome", 0.5),
    ("best", 0.5),
    ("better", 0.2),
    ("happy", 0.4),
    ("excited", 0.4),
    ("exciting", 0.4),
    ("fast", 0.2),
    ("easy", 0.2),
    ("useful", 0.3),
    ("helpful", 0.3),
    ("impressive", 0.4),
    ("powerful", 0.3),
    ("recommend", 0.4),
    ("thanks", 0.2),
    ("win", 0.4),
    ("wins", 0.4),
    ("fun", 0.3),
    ("cool", 0.2),
    ("beautiful", 0.4),
    ("reliable", 0.3),
    ("solid", 0.2),
    ("fixed", 0.2),
    // Negative signals
    ("hate", -0.6),
    ("hated", -0.6),
    ("bad", -0.4),
    ("worse", -0.4),
    ("worst", -0.6),
    ("terrible", -0.6),
    ("awful", -0.6),
    ("horrible", -0.6),
    ("broken", -0.4),
    ("bug", -0.2),
    ("buggy", -0.4),
    ("slow", -0.3),
    ("outage", -0.5),
    ("down", -0.2),
    ("crash", -0.4),
    ("crashed", -0.4),
    ("fail", -0.4),
    ("failed", -0.4),
    ("failure", -0.4),
    ("problem", -0.3),
    ("issue", -0.2),
    ("annoying", -0.4),
    ("expensive", -0.3),
    ("useless", -0.5),
    ("sad", -0.4),
    ("angry", -0.5),
    ("disappointed", -0.5),
    ("disappointing", -0.5),
    ("confusing", -0.3),
    ("scam", -0.7),
];

/// Words that flip the polarity of a lexicon word shortly after them.
const NEGATORS: &[&str] = &[
    "not", "no", "never", "nothing", "hardly", "cannot", "without",
];

/// How many preceding tokens a negator reaches ("not very good").
const NEGATION_WINDOW: usize = 2;

/// Weight multiplier for a negated word: "not good" is mildly negative.
const NEGATION_FACTOR: f64 = -0.5;

fn is_negator(word: &str) -> bool {
    NEGATORS.contains(&word) || word.ends_with("n't")
}

fn weight_of(word: &str) -> Option<f64> {
    LEXICON
        .iter()
        .find(|&&(lex_word, _)| lex_word == word)
        .map(|&(_, weight)| weight)
}

/// Lowercased words with surrounding punctuation removed. Tokens with no
/// alphabetic characters (numbers, emoji, URLs' punctuation) are dropped.
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphabetic())
                .to_lowercase()
                .replace('\u{2019}', "'")
        })
        .filter(|w| w.chars().any(char::is_alphabetic))
        .collect()
}

/// Score a text string using the lexicon.
///
/// Sums matching weights, flipping and halving a weight when a negator
/// appears within the previous two words, and clamps the result to
/// `[-1.0, 1.0]`. Returns `0.0` for empty or unknown text.
#[must_use]
pub fn lexicon_score(text: &str) -> f64 {
    let words = tokenize(text);
    let mut score = 0.0_f64;

    for (i, word) in words.iter().enumerate() {
        let Some(weight) = weight_of(word) else {
            continue;
        };
        let window_start = i.saturating_sub(NEGATION_WINDOW);
        let negated = words[window_start..i].iter().any(|w| is_negator(w));
        score += if negated {
            weight * NEGATION_FACTOR
        } else {
            weight
        };
    }

    score.clamp(-1.0, 1.0)
}

/// [`PolarityScorer`] backed by [`lexicon_score`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconScorer;

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> Result<f64, SentimentError> {
        if tokenize(text).is_empty() {
            return Err(SentimentError::EmptyText);
        }
        Ok(lexicon_score(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_returns_zero() {
        assert_eq!(lexicon_score(""), 0.0);
    }

    #[test]
    fn unknown_text_returns_zero() {
        assert_eq!(lexicon_score("the quick brown fox"), 0.0);
    }

    #[test]
    fn love_scores_half() {
        assert!((lexicon_score("I love ai and data") - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_keyword_returns_negative() {
        let score = lexicon_score("another cloud outage today");
        assert!(score < 0.0, "expected negative score, got {score}");
    }

    #[test]
    fn negation_flips_polarity() {
        let score = lexicon_score("this is not good");
        assert!(score < 0.0, "expected negated score, got {score}");
        assert!((score - (-0.15)).abs() < 1e-9);
    }

    #[test]
    fn contraction_negates() {
        let score = lexicon_score("I don't hate it");
        assert!(score > 0.0, "expected positive score, got {score}");
    }

    #[test]
    fn negator_outside_window_has_no_effect() {
        let score = lexicon_score("not that it matters but great");
        assert!(score > 0.0, "expected positive score, got {score}");
    }

    #[test]
    fn score_clamps_to_positive_one() {
        let text = "love great excellent amazing awesome best recommend";
        assert_eq!(lexicon_score(text), 1.0);
    }

    #[test]
    fn score_clamps_to_negative_one() {
        let text = "hate worst terrible awful horrible scam useless";
        assert_eq!(lexicon_score(text), -1.0);
    }

    #[test]
    fn punctuation_stripped_from_words() {
        assert!(lexicon_score("great!!!") > 0.0);
        assert!(lexicon_score("(terrible)") < 0.0);
    }

    #[test]
    fn balanced_text_is_exactly_zero() {
        // good (+0.3) + slow (-0.3)
        assert_eq!(lexicon_score("good but slow"), 0.0);
    }

    #[test]
    fn scorer_rejects_text_without_words() {
        let scorer = LexiconScorer;
        assert!(matches!(
            scorer.polarity("123 !!! 🚀"),
            Err(SentimentError::EmptyText)
        ));
        assert!(matches!(scorer.polarity("   "), Err(SentimentError::EmptyText)));
    }

    #[test]
    fn scorer_returns_lexicon_score() {
        let scorer = LexiconScorer;
        assert_eq!(scorer.polarity("awful").unwrap(), -0.6);
    }
}
