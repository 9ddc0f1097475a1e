//! Spanish review sentiment analysis with a 1-5 star rating.
//!
//! Powered by [Candle](https://github.com/huggingface/candle) and the RoBERTuito sentiment
//! classifier. The model is loaded lazily and shared by every caller; each review gets a
//! label, the full probability distribution and a star rating derived from it.
//! [`server`] exposes the analyzer over HTTP.

#![deny(missing_docs)]

// ============ Internal API ============

pub(crate) mod loaders;
pub(crate) mod models;
pub(crate) mod pipelines;

// ============ Public API ============

pub mod config;
pub mod error;
pub mod server;

pub use pipelines::{provider, sentiment};
