//! Text → (score, label), with a guaranteed neutral fallback.

use snspulse_core::Label;

use crate::error::SentimentError;
use crate::scorer::LexiconScorer;

/// A polarity algorithm. Implementations may fail on input they cannot
/// analyse; [`SentimentClassifier`] absorbs those failures.
pub trait PolarityScorer {
    /// Signed polarity, nominally in `[-1.0, 1.0]`.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError`] when no score can be produced for `text`.
    fn polarity(&self, text: &str) -> Result<f64, SentimentError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub score: f64,
    pub label: Label,
}

impl Classification {
    fn from_score(score: f64) -> Self {
        Self {
            score,
            label: Label::from_score(score),
        }
    }

    /// The fallback used whenever scoring fails.
    #[must_use]
    pub fn neutral() -> Self {
        Self::from_score(0.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SentimentClassifier<P = LexiconScorer> {
    scorer: P,
}

impl<P: PolarityScorer> SentimentClassifier<P> {
    pub fn new(scorer: P) -> Self {
        Self { scorer }
    }

    /// Classify `text`. Never fails: a scorer error or a non-finite score
    /// yields `(0.0, Neutral)`.
    pub fn classify(&self, text: &str) -> Classification {
        match self.scorer.polarity(text) {
            Ok(score) if score.is_finite() => Classification::from_score(score),
            Ok(score) => {
                tracing::debug!(score, "scorer returned non-finite score; using neutral");
                Classification::neutral()
            }
            Err(e) => {
                tracing::debug!(error = %e, "sentiment scoring failed; using neutral");
                Classification::neutral()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedScorer(Result<f64, &'static str>);

    impl PolarityScorer for FixedScorer {
        fn polarity(&self, _text: &str) -> Result<f64, SentimentError> {
            self.0.map_err(|m| SentimentError::Scorer(m.to_string()))
        }
    }

    #[test]
    fn label_matches_sign_of_score() {
        for (score, label) in [
            (0.5, Label::Positive),
            (1e-12, Label::Positive),
            (-0.3, Label::Negative),
            (0.0, Label::Neutral),
        ] {
            let c = SentimentClassifier::new(FixedScorer(Ok(score))).classify("x");
            assert_eq!(c.score, score);
            assert_eq!(c.label, label, "score {score}");
        }
    }

    #[test]
    fn scorer_error_falls_back_to_neutral() {
        let c = SentimentClassifier::new(FixedScorer(Err("boom"))).classify("x");
        assert_eq!(c, Classification::neutral());
        assert_eq!(c.label, Label::Neutral);
    }

    #[test]
    fn nan_score_falls_back_to_neutral() {
        let c = SentimentClassifier::new(FixedScorer(Ok(f64::NAN))).classify("x");
        assert_eq!(c, Classification::neutral());
    }

    #[test]
    fn infinite_score_falls_back_to_neutral() {
        let c = SentimentClassifier::new(FixedScorer(Ok(f64::INFINITY))).classify("x");
        assert_eq!(c.score, 0.0);
    }

    #[test]
    fn lexicon_classifier_uses_lexicon() {
        let c = SentimentClassifier::new(LexiconScorer).classify("I love ai and data");
        assert_eq!(c.score, 0.5);
        assert_eq!(c.label, Label::Positive);
    }

    #[test]
    fn lexicon_classifier_handles_wordless_text() {
        let c = SentimentClassifier::new(LexiconScorer).classify("🔥🔥🔥 100%");
        assert_eq!(c, Classification::neutral());
    }
}
