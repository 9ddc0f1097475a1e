use candle_core::{DType, Device, Tensor, D};
use candle_nn::{ops::softmax, VarBuilder};
use candle_transformers::models::xlm_roberta::{Config, XLMRobertaForSequenceClassification};
use tokenizers::Tokenizer;

use crate::config::{RuntimeConfig, DEFAULT_MODEL_REPO};
use crate::error::{AnalyzerError, Result};
use crate::loaders::{ClassifierConfigLoader, TokenizerLoader, WeightsFile, WeightsLoader};
use crate::pipelines::sentiment::{Prediction, ProbabilityDistribution, SentimentModel};

/// Sequence length RoBERTuito was trained with.
const DEFAULT_MAX_LENGTH: usize = 128;

/// Where to load RoBERTuito from and how much text it sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobertuitoOptions {
    /// Hugging Face repository holding `config.json`, `tokenizer.json` and the weights.
    pub repo: String,
    /// Longest token sequence fed to the model.
    pub max_length: usize,
}

impl Default for RobertuitoOptions {
    fn default() -> Self {
        Self {
            repo: DEFAULT_MODEL_REPO.to_string(),
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

/// RoBERTuito fine-tuned for Spanish tweet sentiment (`NEG`, `NEU`, `POS`).
///
/// Runs through candle's XLM-RoBERTa sequence classifier, which shares RoBERTa's
/// architecture and weight layout.
pub struct RobertuitoSentimentModel {
    model: XLMRobertaForSequenceClassification,
    tokenizer: Tokenizer,
    device: Device,
    labels: Vec<String>,
}

impl RobertuitoSentimentModel {
    /// Returns the device the model is running on.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Label codes ordered by class index.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    fn encode(&self, text: &str) -> Result<(Tensor, Tensor, Tensor)> {
        let tokens = self.tokenizer.encode(text, true).map_err(|e| {
            AnalyzerError::Tokenization(format!(
                "Tokenization failed on '{}': {}",
                &text.chars().take(50).collect::<String>(),
                e
            ))
        })?;

        let input_ids = Tensor::new(tokens.get_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(tokens.get_attention_mask(), &self.device)?.unsqueeze(0)?;
        let token_type_ids = Tensor::new(tokens.get_type_ids(), &self.device)?.unsqueeze(0)?;
        Ok((input_ids, attention_mask, token_type_ids))
    }
}

impl SentimentModel for RobertuitoSentimentModel {
    type Options = RobertuitoOptions;

    fn load(options: RobertuitoOptions, runtime: &RuntimeConfig) -> Result<Self> {
        let device = runtime.device()?;

        let classifier = ClassifierConfigLoader::new(&options.repo).load()?;
        let config: Config = serde_json::from_str(&classifier.raw).map_err(|e| {
            AnalyzerError::Construction(format!(
                "Incompatible model config in '{}': {e}",
                options.repo
            ))
        })?;
        let tokenizer =
            TokenizerLoader::new(&options.repo, "tokenizer.json", options.max_length).load()?;

        // Plain tensors, not trainable vars: nothing here records gradients.
        let vb = match WeightsLoader::new(&options.repo).load()? {
            WeightsFile::SafeTensors(path) => unsafe {
                VarBuilder::from_mmaped_safetensors(&[path], DType::F32, &device)
            },
            WeightsFile::Pickle(path) => VarBuilder::from_pth(&path, DType::F32, &device),
        }
        .map_err(|e| AnalyzerError::Construction(format!("Failed to load weights: {e}")))?;

        let model = XLMRobertaForSequenceClassification::new(classifier.labels.len(), &config, vb)
            .map_err(|e| {
                AnalyzerError::Construction(format!(
                    "Failed to build classifier from '{}': {e}",
                    options.repo
                ))
            })?;

        Ok(Self {
            model,
            tokenizer,
            device,
            labels: classifier.labels,
        })
    }

    fn predict(&self, text: &str) -> Result<Prediction> {
        let (input_ids, attention_mask, token_type_ids) = self.encode(text)?;

        let logits = self
            .model
            .forward(&input_ids, &attention_mask, &token_type_ids)?;
        let probs = softmax(&logits, D::Minus1)?.squeeze(0)?.to_vec1::<f32>()?;

        if probs.len() != self.labels.len() {
            return Err(AnalyzerError::Prediction(format!(
                "Model returned {} scores for {} labels",
                probs.len(),
                self.labels.len()
            )));
        }

        let label = probs
            .iter()
            .zip(&self.labels)
            .max_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, label)| label.clone())
            .ok_or_else(|| AnalyzerError::Prediction("Model returned no scores".into()))?;

        let probabilities: ProbabilityDistribution = self
            .labels
            .iter()
            .zip(&probs)
            .map(|(label, p)| (label.clone(), f64::from(*p)))
            .collect();

        Ok(Prediction::new(label, probabilities))
    }
}
