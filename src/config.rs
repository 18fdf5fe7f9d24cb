use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;

use crate::inference::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT, InferenceConfig};
use crate::naming::RenameMode;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub inference: InferenceConfig,
    pub mode: RenameMode,
    pub pattern: String,
    pub log_file: Option<PathBuf>,
}

pub struct ConfigBuilder {
    endpoint: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
    mode: RenameMode,
    pattern: String,
    log_file: Option<PathBuf>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            endpoint: None,
            model: None,
            timeout: None,
            mode: RenameMode::default(),
            pattern: String::new(),
            log_file: None,
        }
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }

    pub fn mode(mut self, mode: RenameMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn log_file<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        self.log_file = path.map(|p| p.as_ref().to_path_buf());
        self
    }

    pub fn build(self) -> Result<AppConfig> {
        let endpoint = self
            .endpoint
            .map(|e| e.trim().to_string())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "Endpoint must start with http:// or https://, got '{}'",
                endpoint
            ));
        }

        let model = self
            .model
            .map(|m| m.trim().to_string())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        if model.is_empty() {
            return Err(anyhow::anyhow!("Model name must not be empty"));
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(anyhow::anyhow!("Timeout must be at least one second"));
        }

        Ok(AppConfig {
            inference: InferenceConfig {
                endpoint,
                model,
                timeout,
            },
            mode: self.mode,
            pattern: self.pattern,
            log_file: self.log_file,
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
