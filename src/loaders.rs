use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tokenizers::{Tokenizer, TruncationParams};

use crate::error::{AnalyzerError, Result};

#[derive(Debug, Clone)]
pub struct HfLoader {
    pub repo: String,
    pub filename: String,
}

impl HfLoader {
    pub fn new(repo: &str, filename: &str) -> Self {
        Self {
            repo: repo.into(),
            filename: filename.into(),
        }
    }

    /// Resolve the file from the local hub cache, downloading it if needed.
    pub fn load(&self) -> Result<PathBuf> {
        let hf_api = hf_hub::api::sync::ApiBuilder::new()
            .with_progress(false)
            .build()
            .map_err(|e| {
                AnalyzerError::Download(format!("Failed to initialize HuggingFace API: {e}"))
            })?;
        let hf_api = hf_api.model(self.repo.clone());

        let max_retries = 3;
        let mut attempts = 0u32;

        for attempt in 0..max_retries {
            match hf_api.get(self.filename.as_str()) {
                Ok(path) => return Ok(path),
                Err(e) => {
                    let error_msg = e.to_string();
                    attempts = attempt + 1;
                    // Another process holds the cache lock while it downloads the same file.
                    if error_msg.contains("Lock acquisition failed") && attempt < max_retries - 1 {
                        std::thread::sleep(Duration::from_millis(100 * (1 << attempt)));
                        continue;
                    }
                    return Err(AnalyzerError::Download(format!(
                        "Failed to download '{}' from '{}': {}",
                        self.filename, self.repo, error_msg
                    )));
                }
            }
        }

        Err(AnalyzerError::Download(format!(
            "Download timed out for '{}' from '{}' after {} attempt(s)",
            self.filename, self.repo, attempts
        )))
    }
}

#[derive(Clone)]
pub struct TokenizerLoader {
    pub tokenizer_file_loader: HfLoader,
    pub max_length: usize,
}

impl TokenizerLoader {
    pub fn new(repo: &str, filename: &str, max_length: usize) -> Self {
        Self {
            tokenizer_file_loader: HfLoader::new(repo, filename),
            max_length,
        }
    }

    /// Load the tokenizer with right truncation at `max_length` and no padding.
    pub fn load(&self) -> Result<Tokenizer> {
        let tokenizer_file_path = self.tokenizer_file_loader.load()?;
        let path_str = tokenizer_file_path.display().to_string();

        let mut tokenizer = Tokenizer::from_file(&tokenizer_file_path).map_err(|e| {
            AnalyzerError::Tokenization(format!(
                "Failed to load tokenizer from '{path_str}': {e}"
            ))
        })?;

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: self.max_length,
                ..Default::default()
            }))
            .map_err(|e| {
                AnalyzerError::Tokenization(format!("Failed to configure truncation: {e}"))
            })?;
        tokenizer.with_padding(None);

        Ok(tokenizer)
    }
}

/// `config.json` of a sequence classifier, read twice: once raw for the backbone
/// config, once for the label table.
pub struct ClassifierConfig {
    pub raw: String,
    /// Labels ordered by class index.
    pub labels: Vec<String>,
}

#[derive(Deserialize)]
struct LabelTable {
    #[serde(default)]
    id2label: HashMap<String, String>,
}

pub struct ClassifierConfigLoader {
    pub config_file_loader: HfLoader,
}

impl ClassifierConfigLoader {
    pub fn new(repo: &str) -> Self {
        Self {
            config_file_loader: HfLoader::new(repo, "config.json"),
        }
    }

    pub fn load(&self) -> Result<ClassifierConfig> {
        let path = self.config_file_loader.load()?;
        let raw = std::fs::read_to_string(path)?;
        let labels = parse_labels(&raw)?;
        Ok(ClassifierConfig { raw, labels })
    }
}

/// Order the `id2label` table by class index, rejecting gaps.
pub(crate) fn parse_labels(config_json: &str) -> Result<Vec<String>> {
    let table: LabelTable = serde_json::from_str(config_json)?;
    if table.id2label.is_empty() {
        return Err(AnalyzerError::Construction(
            "config.json has no id2label table".into(),
        ));
    }
    (0..table.id2label.len())
        .map(|i| {
            table.id2label.get(&i.to_string()).cloned().ok_or_else(|| {
                AnalyzerError::Construction(format!(
                    "id2label has no entry for class {i}; found {:?}",
                    table.id2label.keys().collect::<Vec<_>>()
                ))
            })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub enum WeightsFile {
    SafeTensors(PathBuf),
    Pickle(PathBuf),
}

pub struct WeightsLoader {
    pub repo: String,
}

impl WeightsLoader {
    pub fn new(repo: &str) -> Self {
        Self { repo: repo.into() }
    }

    /// Prefer `model.safetensors`, falling back to `pytorch_model.bin`.
    pub fn load(&self) -> Result<WeightsFile> {
        match HfLoader::new(&self.repo, "model.safetensors").load() {
            Ok(path) => Ok(WeightsFile::SafeTensors(path)),
            Err(safetensors_err) => HfLoader::new(&self.repo, "pytorch_model.bin")
                .load()
                .map(WeightsFile::Pickle)
                .map_err(|e| {
                    AnalyzerError::Download(format!(
                        "No usable weights in '{}': {safetensors_err}; {e}",
                        self.repo
                    ))
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_ordered_by_index() {
        let json = r#"{"id2label": {"2": "POS", "0": "NEG", "1": "NEU"}, "hidden_size": 768}"#;
        assert_eq!(parse_labels(json).unwrap(), vec!["NEG", "NEU", "POS"]);
    }

    #[test]
    fn missing_label_table_is_a_construction_error() {
        let err = parse_labels(r#"{"hidden_size": 768}"#).unwrap_err();
        assert!(matches!(err, AnalyzerError::Construction(_)));
    }

    #[test]
    fn gap_in_label_indices_is_rejected() {
        let err = parse_labels(r#"{"id2label": {"0": "NEG", "2": "POS"}}"#).unwrap_err();
        assert!(err.to_string().contains("class 1"));
    }
}
