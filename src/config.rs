//! Runtime and server configuration.
//!
//! [`RuntimeConfig`] describes how the inference runtime is tuned (threads, device,
//! tokenizer parallelism). It is immutable and handed to the analyzer provider.
//! [`ServerConfig`] is layered with figment: defaults, then an optional
//! `sentimiento.toml`, then `SENTIMIENTO_*` variables, then the bare `PORT`/`HOST`
//! variables that hosting platforms set.

use std::path::PathBuf;

use candle_core::Device;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, Result};

/// Optional configuration file read from the working directory.
pub const CONFIG_FILE: &str = "sentimiento.toml";

/// Default model repository on the Hugging Face hub.
pub const DEFAULT_MODEL_REPO: &str = "pysentimiento/robertuito-sentiment-analysis";

const DEFAULT_PORT: u16 = 8000;

/// Inference runtime tuning, applied when the analyzer is constructed.
///
/// The default is the memory-constrained profile: one compute thread, CPU only and
/// no tokenizer parallelism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Threads available to the math kernels.
    pub compute_threads: usize,
    /// Hide accelerators and run on CPU.
    pub cpu_only: bool,
    /// Let the tokenizer parallelize encoding.
    pub tokenizer_parallelism: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            compute_threads: 1,
            cpu_only: true,
            tokenizer_parallelism: false,
        }
    }
}

impl RuntimeConfig {
    /// Resolve the device inference runs on.
    pub fn device(&self) -> Result<Device> {
        if self.cpu_only {
            return Ok(Device::Cpu);
        }
        Device::cuda_if_available(0)
            .map_err(|e| AnalyzerError::Device(format!("Failed to select device: {e}")))
    }

    /// Environment variables read by the math and tokenizer libraries.
    pub fn process_env(&self) -> Vec<(&'static str, String)> {
        let threads = self.compute_threads.max(1).to_string();
        let mut vars = vec![
            ("TOKENIZERS_PARALLELISM", self.tokenizer_parallelism.to_string()),
            ("OMP_NUM_THREADS", threads.clone()),
            ("MKL_NUM_THREADS", threads.clone()),
            ("RAYON_NUM_THREADS", threads),
        ];
        if self.cpu_only {
            vars.push(("CUDA_VISIBLE_DEVICES", String::new()));
        }
        vars
    }

    /// Export [`Self::process_env`] into the process environment.
    ///
    /// Must run once at startup, before the async runtime or any thread pool is built:
    /// the libraries read these variables when their pools first initialize.
    pub fn apply_to_process(&self) {
        for (key, value) in self.process_env() {
            std::env::set_var(key, value);
        }
    }
}

/// HTTP service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listening port. Set by hosting platforms through `PORT`.
    pub port: Option<u16>,
    /// Bind address. Resolved from `port` when absent, see [`Self::host`].
    pub host: Option<String>,
    /// Hugging Face repository of the sentiment model.
    pub model_repo: String,
    /// Landing page served at `/`.
    pub index_path: PathBuf,
    /// Build the analyzer at startup instead of on the first request.
    pub preload: bool,
    /// Inference runtime tuning.
    pub runtime: RuntimeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: None,
            host: None,
            model_repo: DEFAULT_MODEL_REPO.to_string(),
            index_path: PathBuf::from("index.html"),
            preload: false,
            runtime: RuntimeConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Layered configuration sources, lowest precedence first.
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed("SENTIMIENTO_").split("__"))
            .merge(Env::raw().only(&["port", "host"]))
    }

    /// Load configuration from the file and the environment.
    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment())
    }

    /// Extract configuration from an arbitrary figment.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        Ok(figment.extract()?)
    }

    /// Port to listen on.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Address to bind.
    ///
    /// An explicit host wins. Otherwise a platform-assigned port means a deployed
    /// instance that must accept outside connections; without one we stay on loopback.
    pub fn host(&self) -> String {
        match (&self.host, self.port) {
            (Some(host), _) => host.clone(),
            (None, Some(_)) => "0.0.0.0".to_string(),
            (None, None) => "127.0.0.1".to_string(),
        }
    }

    /// `host:port` string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host(), self.port())
    }
}
