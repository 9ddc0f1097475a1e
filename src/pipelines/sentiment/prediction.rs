use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The three sentiment classes, with the short codes the classifier reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SentimentLabel {
    /// `POS`
    Positive,
    /// `NEG`
    Negative,
    /// `NEU`
    Neutral,
}

impl SentimentLabel {
    /// Every label, in response order.
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    /// Wire code used by the classifier and in responses.
    pub fn code(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POS",
            SentimentLabel::Negative => "NEG",
            SentimentLabel::Neutral => "NEU",
        }
    }

    /// Parse a classifier code. Unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "POS" => Some(SentimentLabel::Positive),
            "NEG" => Some(SentimentLabel::Negative),
            "NEU" => Some(SentimentLabel::Neutral),
            _ => None,
        }
    }

    /// Polarity description when this label is the predicted one.
    pub fn active_description(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positiva",
            SentimentLabel::Negative => "Negativa",
            SentimentLabel::Neutral => "Neutral",
        }
    }

    /// Polarity description when another label was predicted.
    pub fn inactive_description(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "No Positiva",
            SentimentLabel::Negative => "No Negativa",
            SentimentLabel::Neutral => "No Neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Per-label confidence reported by the classifier, keyed by label code.
///
/// Values are taken as given: they are not checked to lie in `[0, 1]` or to sum to one.
/// Looking up a label the classifier did not report yields `0.0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProbabilityDistribution(BTreeMap<String, f64>);

impl ProbabilityDistribution {
    /// An empty distribution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the probability of `code`, replacing any previous value.
    pub fn insert(&mut self, code: impl Into<String>, probability: f64) {
        self.0.insert(code.into(), probability);
    }

    /// Builder-style [`Self::insert`].
    pub fn with(mut self, code: impl Into<String>, probability: f64) -> Self {
        self.insert(code, probability);
        self
    }

    /// Probability stored under `code`, or `0.0`.
    pub fn get(&self, code: &str) -> f64 {
        self.0.get(code).copied().unwrap_or(0.0)
    }

    /// Probability of `label`, or `0.0`.
    pub fn probability(&self, label: SentimentLabel) -> f64 {
        self.get(label.code())
    }

    /// Probability of `label` as a percentage rounded to two decimals.
    pub fn percentage(&self, label: SentimentLabel) -> f64 {
        round_percentage(self.probability(label))
    }

}

impl<K: Into<String>> FromIterator<(K, f64)> for ProbabilityDistribution {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, p)| (k.into(), p)).collect())
    }
}

/// Scale a probability to percent and round to two decimals.
///
/// Halfway cases round away from zero, so `0.00125` reports `0.13`.
pub(crate) fn round_percentage(probability: f64) -> f64 {
    (probability * 100.0 * 100.0).round() / 100.0
}

/// What a [`SentimentModel`](super::SentimentModel) returns for one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted label code, normally `POS`, `NEG` or `NEU`. Kept verbatim.
    pub label: String,
    /// Confidence per label code.
    pub probabilities: ProbabilityDistribution,
}

impl Prediction {
    /// Create a prediction from a label code and a distribution.
    pub fn new(label: impl Into<String>, probabilities: ProbabilityDistribution) -> Self {
        Self {
            label: label.into(),
            probabilities,
        }
    }

    /// The predicted label, if it is one of the three known codes.
    pub fn sentiment(&self) -> Option<SentimentLabel> {
        SentimentLabel::from_code(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for label in SentimentLabel::ALL {
            assert_eq!(SentimentLabel::from_code(label.code()), Some(label));
        }
        assert_eq!(SentimentLabel::from_code("pos"), None);
        assert_eq!(SentimentLabel::from_code("MIXED"), None);
    }

    #[test]
    fn absent_label_reads_as_zero() {
        let probs = ProbabilityDistribution::new().with("NEG", 0.9);
        assert_eq!(probs.probability(SentimentLabel::Negative), 0.9);
        assert_eq!(probs.probability(SentimentLabel::Positive), 0.0);
        assert_eq!(probs.percentage(SentimentLabel::Neutral), 0.0);
    }

    #[test]
    fn percentages_round_to_two_decimals() {
        assert_eq!(round_percentage(0.95), 95.0);
        assert_eq!(round_percentage(0.123456), 12.35);
        assert_eq!(round_percentage(0.0), 0.0);
        assert_eq!(round_percentage(1.0), 100.0);
        assert_eq!(round_percentage(0.987_654_3), 98.77);
    }

    #[test]
    fn halfway_percentages_round_up() {
        assert_eq!(round_percentage(0.00125), 0.13);
        assert_eq!(round_percentage(0.125), 12.5);
    }

    #[test]
    fn distribution_serializes_as_plain_map() {
        let probs: ProbabilityDistribution = [("POS", 0.5), ("NEG", 0.25)].into_iter().collect();
        let json = serde_json::to_value(&probs).unwrap();
        assert_eq!(json, serde_json::json!({ "NEG": 0.25, "POS": 0.5 }));
    }

    #[test]
    fn unknown_label_is_kept_verbatim() {
        let prediction = Prediction::new("MIXED", ProbabilityDistribution::new());
        assert_eq!(prediction.label, "MIXED");
        assert_eq!(prediction.sentiment(), None);
    }
}
