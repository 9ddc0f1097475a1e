//! Sentiment analysis of Spanish reviews.
//!
//! Classify text as `POS`, `NEG` or `NEU`, keep the full probability distribution, and
//! derive a 1–5 star rating from it.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sentimiento::sentiment::SentimentAnalyzerBuilder;
//!
//! # fn main() -> sentimiento::error::Result<()> {
//! let analyzer = SentimentAnalyzerBuilder::robertuito().build();
//!
//! let result = analyzer.analyze_review_sentiment("El envío tardó muchísimo, no vuelvo a comprar")?;
//! println!(
//!     "{} ({}), positive {:.2}%",
//!     result.sentiment_analysis.label,
//!     result.summary.puntuacion_estrellas,
//!     result.sentiment_analysis.probabilities.positive,
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Star rating
//!
//! | label | rating |
//! |-------|--------|
//! | `NEU` | 3 |
//! | `POS` | 5 if P(POS) > 0.90, else 4 |
//! | `NEG` | 1 if P(NEG) > 0.90, else 2 |
//! | other | 3 |
//!
//! # Custom models
//!
//! Anything implementing [`SentimentModel`] can stand in for the bundled classifier,
//! which is how the tests drive the analyzer without downloading weights.

// ============ Internal API ============

pub(crate) mod builder;
pub(crate) mod model;
pub(crate) mod pipeline;
pub(crate) mod prediction;
pub(crate) mod preprocess;
pub(crate) mod rating;
pub(crate) mod result;

// ============ Public API ============

pub use builder::SentimentAnalyzerBuilder;
pub use model::SentimentModel;
pub use pipeline::SentimentAnalyzer;
pub use prediction::{Prediction, ProbabilityDistribution, SentimentLabel};
pub use preprocess::{Identity, Preprocessor, TweetPreprocessor};
pub use rating::{map_sentiment_to_stars, StarRating, EXTREME_CONFIDENCE};
pub use result::{AnalysisResult, Percentages, Polarity, ReviewData, SentimentAnalysis, Summary};

pub use crate::models::{RobertuitoOptions, RobertuitoSentimentModel};
