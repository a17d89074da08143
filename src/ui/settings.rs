use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::engine::error::GenerationError;
use crate::engine::llm_client::ClientConfig;
use crate::model::generation_input::{CanvasSize, GenerationParams};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GeneratorSettings {
    pub ui_scale: f32,

    /// OpenAI-compatible base URL, up to and including `/v1`.
    pub endpoint: String,
    pub model: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,

    // Name of the environment variable holding the API key; empty means none.
    pub api_key_env: String,

    pub canvas_width: f32,
    pub canvas_height: f32,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        let params = GenerationParams::default();
        let canvas = CanvasSize::default();

        Self {
            ui_scale: 1.0,
            endpoint: "http://localhost:1234/v1".into(),
            model: params.model,
            max_output_tokens: params.max_output_tokens,
            temperature: params.temperature,
            timeout_secs: 120,
            api_key_env: String::new(),
            canvas_width: canvas.width,
            canvas_height: canvas.height,
        }
    }
}

impl GeneratorSettings {
    pub fn params(&self) -> GenerationParams {
        GenerationParams {
            model: self.model.clone(),
            max_output_tokens: self.max_output_tokens,
            temperature: self.temperature,
        }
    }

    pub fn canvas(&self) -> CanvasSize {
        CanvasSize {
            width: self.canvas_width,
            height: self.canvas_height,
        }
    }

    pub fn client_config(&self) -> Result<ClientConfig, GenerationError> {
        self.client_config_with(|name| std::env::var(name).ok())
    }

    fn client_config_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<ClientConfig, GenerationError> {
        let var = self.api_key_env.trim();
        let api_key = if var.is_empty() {
            None
        } else {
            Some(
                lookup(var)
                    .filter(|k| !k.trim().is_empty())
                    .ok_or_else(|| GenerationError::MissingApiKey(var.to_string()))?,
            )
        };

        Ok(ClientConfig {
            base_url: self.endpoint.trim().to_string(),
            api_key,
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let s: GeneratorSettings = serde_json::from_str(r#"{"model":"qwen"}"#).unwrap();
        assert_eq!(s.model, "qwen");
        assert_eq!(s.endpoint, GeneratorSettings::default().endpoint);
        assert_eq!(s.params().model, "qwen");
    }

    #[test]
    fn test_client_config_without_key() {
        let config = GeneratorSettings::default()
            .client_config_with(|_| panic!("no lookup expected"))
            .unwrap();
        assert_eq!(config.api_key, None);
        assert_eq!(config.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_client_config_reads_named_key() {
        let settings = GeneratorSettings {
            api_key_env: "CODEGEN_KEY".into(),
            ..Default::default()
        };

        let config = settings
            .client_config_with(|name| (name == "CODEGEN_KEY").then(|| "sk-1".to_string()))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-1"));

        let err = settings.client_config_with(|_| None).unwrap_err();
        assert!(matches!(err, GenerationError::MissingApiKey(name) if name == "CODEGEN_KEY"));
    }
}
