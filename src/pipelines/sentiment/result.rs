use serde::{Deserialize, Serialize};

use super::prediction::{Prediction, SentimentLabel};
use super::rating::{map_sentiment_to_stars, StarRating};

/// Structured outcome of analysing one review. This is the response body of
/// `POST /analyze-sentiment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The input as received and as fed to the classifier.
    pub review_data: ReviewData,
    /// Label, rating and per-label percentages.
    pub sentiment_analysis: SentimentAnalysis,
    /// Human-readable summary.
    pub summary: Summary,
}

/// Original and preprocessed review text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewData {
    /// Text exactly as submitted.
    pub text_original: String,
    /// Text after social-media preprocessing.
    pub text_processed: String,
}

/// Classifier verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    /// Label code reported by the classifier (`POS`, `NEG`, `NEU`).
    pub label: String,
    /// Derived star rating.
    pub score_1_to_5: StarRating,
    /// Per-label confidence in percent.
    pub probabilities: Percentages,
}

/// Label probabilities scaled to 0–100 and rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentages {
    /// Positive confidence.
    pub positive: f64,
    /// Negative confidence.
    pub negative: f64,
    /// Neutral confidence.
    pub neutral: f64,
}

/// Star summary and polarity descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Rating rendered as `N/5 ⭐`.
    pub puntuacion_estrellas: String,
    /// One description per label stating whether it was the predicted one.
    pub polaridad_completa: Polarity,
}

/// Per-label polarity description, e.g. `Positiva` / `No Positiva`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polarity {
    /// Positive description.
    #[serde(rename = "POS")]
    pub positive: String,
    /// Negative description.
    #[serde(rename = "NEG")]
    pub negative: String,
    /// Neutral description.
    #[serde(rename = "NEU")]
    pub neutral: String,
}

impl Polarity {
    fn for_label(predicted: Option<SentimentLabel>) -> Self {
        let describe = |label: SentimentLabel| {
            if predicted == Some(label) {
                label.active_description().to_string()
            } else {
                label.inactive_description().to_string()
            }
        };
        Self {
            positive: describe(SentimentLabel::Positive),
            negative: describe(SentimentLabel::Negative),
            neutral: describe(SentimentLabel::Neutral),
        }
    }

    /// Labels whose description marks them as the predicted one.
    pub fn active(&self) -> Vec<SentimentLabel> {
        SentimentLabel::ALL
            .into_iter()
            .filter(|label| self.description(*label) == label.active_description())
            .collect()
    }

    /// Description recorded for `label`.
    pub fn description(&self, label: SentimentLabel) -> &str {
        match label {
            SentimentLabel::Positive => &self.positive,
            SentimentLabel::Negative => &self.negative,
            SentimentLabel::Neutral => &self.neutral,
        }
    }
}

impl AnalysisResult {
    /// Assemble the response record from a classifier prediction.
    pub fn assemble(
        text_original: impl Into<String>,
        text_processed: impl Into<String>,
        prediction: &Prediction,
    ) -> Self {
        let rating = map_sentiment_to_stars(&prediction.probabilities, &prediction.label);
        let probabilities = &prediction.probabilities;

        Self {
            review_data: ReviewData {
                text_original: text_original.into(),
                text_processed: text_processed.into(),
            },
            sentiment_analysis: SentimentAnalysis {
                label: prediction.label.clone(),
                score_1_to_5: rating,
                probabilities: Percentages {
                    positive: probabilities.percentage(SentimentLabel::Positive),
                    negative: probabilities.percentage(SentimentLabel::Negative),
                    neutral: probabilities.percentage(SentimentLabel::Neutral),
                },
            },
            summary: Summary {
                puntuacion_estrellas: rating.summary(),
                polaridad_completa: Polarity::for_label(prediction.sentiment()),
            },
        }
    }

    /// Shortcut for `sentiment_analysis.score_1_to_5`.
    pub fn rating(&self) -> StarRating {
        self.sentiment_analysis.score_1_to_5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::ProbabilityDistribution;

    fn prediction(label: &str, probs: &[(&str, f64)]) -> Prediction {
        Prediction::new(label, probs.iter().copied().collect())
    }

    #[test]
    fn serializes_response_contract() {
        let result = AnalysisResult::assemble(
            "Me encantó",
            "me encantó",
            &prediction("POS", &[("POS", 0.95), ("NEG", 0.02), ("NEU", 0.03)]),
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "review_data": {
                    "text_original": "Me encantó",
                    "text_processed": "me encantó"
                },
                "sentiment_analysis": {
                    "label": "POS",
                    "score_1_to_5": 5,
                    "probabilities": {
                        "positive": 95.0,
                        "negative": 2.0,
                        "neutral": 3.0
                    }
                },
                "summary": {
                    "puntuacion_estrellas": "5/5 ⭐",
                    "polaridad_completa": {
                        "POS": "Positiva",
                        "NEG": "No Negativa",
                        "NEU": "No Neutral"
                    }
                }
            })
        );
    }

    #[test]
    fn exactly_one_active_polarity() {
        for label in SentimentLabel::ALL {
            let result = AnalysisResult::assemble("", "", &prediction(label.code(), &[]));
            assert_eq!(result.summary.polaridad_completa.active(), vec![label]);
        }
    }

    #[test]
    fn unknown_label_has_no_active_polarity() {
        let result = AnalysisResult::assemble("", "", &prediction("MIXED", &[("POS", 1.0)]));
        assert!(result.summary.polaridad_completa.active().is_empty());
        assert_eq!(result.rating().get(), 3);
        assert_eq!(result.sentiment_analysis.label, "MIXED");
    }

    #[test]
    fn missing_labels_report_zero_percent() {
        let result = AnalysisResult::assemble(
            "x",
            "x",
            &Prediction::new("NEG", ProbabilityDistribution::new().with("NEG", 0.9)),
        );
        let p = result.sentiment_analysis.probabilities;
        assert_eq!((p.positive, p.negative, p.neutral), (0.0, 90.0, 0.0));
        assert_eq!(result.rating().get(), 2);
    }
}
