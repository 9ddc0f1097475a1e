use std::fmt;

use serde::{Deserialize, Serialize};

use super::prediction::{ProbabilityDistribution, SentimentLabel};

/// Confidence above which a polar label earns the extreme rating (1 or 5).
/// The comparison is strict.
pub const EXTREME_CONFIDENCE: f64 = 0.90;

/// An integer rating from 1 to 5 stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StarRating(u8);

impl StarRating {
    /// The rating used for neutral or unrecognized labels.
    pub const NEUTRAL: StarRating = StarRating(3);

    /// Create a rating, rejecting values outside `1..=5`.
    pub fn new(stars: u8) -> Option<Self> {
        (1..=5).contains(&stars).then_some(Self(stars))
    }

    /// Number of stars.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Display form used in the response summary, e.g. `4/5 ⭐`.
    pub fn summary(self) -> String {
        format!("{}/5 ⭐", self.0)
    }
}

impl TryFrom<u8> for StarRating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("star rating must be within 1..=5, got {value}"))
    }
}

impl From<StarRating> for u8 {
    fn from(value: StarRating) -> Self {
        value.0
    }
}

impl fmt::Display for StarRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/5", self.0)
    }
}

/// Map a predicted label and its distribution to a star rating.
///
/// The label decides the band and the label's own probability decides the extreme:
///
/// | label | rating |
/// |-------|--------|
/// | `NEU` | 3 |
/// | `POS` | 5 if P(POS) > 0.90, else 4 |
/// | `NEG` | 1 if P(NEG) > 0.90, else 2 |
/// | other | 3 |
///
/// # Examples
///
/// ```rust
/// use sentimiento::sentiment::{map_sentiment_to_stars, ProbabilityDistribution};
///
/// let probs = ProbabilityDistribution::new().with("POS", 0.95);
/// assert_eq!(map_sentiment_to_stars(&probs, "POS").get(), 5);
///
/// // Exactly at the threshold is not enough.
/// let probs = ProbabilityDistribution::new().with("NEG", 0.90);
/// assert_eq!(map_sentiment_to_stars(&probs, "NEG").get(), 2);
/// ```
pub fn map_sentiment_to_stars(probabilities: &ProbabilityDistribution, label: &str) -> StarRating {
    match SentimentLabel::from_code(label) {
        Some(SentimentLabel::Positive) => {
            if probabilities.probability(SentimentLabel::Positive) > EXTREME_CONFIDENCE {
                StarRating(5)
            } else {
                StarRating(4)
            }
        }
        Some(SentimentLabel::Negative) => {
            if probabilities.probability(SentimentLabel::Negative) > EXTREME_CONFIDENCE {
                StarRating(1)
            } else {
                StarRating(2)
            }
        }
        Some(SentimentLabel::Neutral) | None => StarRating::NEUTRAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probs(pos: f64, neg: f64, neu: f64) -> ProbabilityDistribution {
        ProbabilityDistribution::new()
            .with("POS", pos)
            .with("NEG", neg)
            .with("NEU", neu)
    }

    #[test]
    fn neutral_ignores_distribution() {
        for p in [probs(0.99, 0.0, 0.01), probs(0.0, 0.99, 0.01), probs(0.0, 0.0, 1.0)] {
            assert_eq!(map_sentiment_to_stars(&p, "NEU").get(), 3);
        }
    }

    #[test]
    fn positive_threshold_is_strict() {
        assert_eq!(map_sentiment_to_stars(&probs(0.9000001, 0.0, 0.0), "POS").get(), 5);
        assert_eq!(map_sentiment_to_stars(&probs(0.90, 0.05, 0.05), "POS").get(), 4);
        assert_eq!(map_sentiment_to_stars(&probs(0.0, 0.5, 0.5), "POS").get(), 4);
    }

    #[test]
    fn negative_threshold_is_strict() {
        assert_eq!(map_sentiment_to_stars(&probs(0.0, 0.91, 0.09), "NEG").get(), 1);
        assert_eq!(map_sentiment_to_stars(&probs(0.05, 0.90, 0.05), "NEG").get(), 2);
        assert_eq!(map_sentiment_to_stars(&probs(0.4, 0.3, 0.3), "NEG").get(), 2);
    }

    #[test]
    fn missing_probability_counts_as_zero() {
        let empty = ProbabilityDistribution::new();
        assert_eq!(map_sentiment_to_stars(&empty, "POS").get(), 4);
        assert_eq!(map_sentiment_to_stars(&empty, "NEG").get(), 2);
    }

    #[test]
    fn unrecognized_label_defaults_to_three() {
        assert_eq!(map_sentiment_to_stars(&probs(1.0, 0.0, 0.0), "positive").get(), 3);
        assert_eq!(map_sentiment_to_stars(&probs(1.0, 0.0, 0.0), "").get(), 3);
    }

    #[test]
    fn rating_bounds_are_enforced() {
        assert!(StarRating::new(0).is_none());
        assert!(StarRating::new(6).is_none());
        assert_eq!(StarRating::new(5).map(StarRating::get), Some(5));
        assert!(serde_json::from_str::<StarRating>("7").is_err());
        assert_eq!(serde_json::to_string(&StarRating(4)).unwrap(), "4");
    }

    #[test]
    fn summary_format() {
        assert_eq!(StarRating(5).summary(), "5/5 ⭐");
        assert_eq!(StarRating(2).to_string(), "2/5");
    }
}
