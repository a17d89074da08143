use serde::{Deserialize, Serialize};

use crate::model::component::Component;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Free-text description.
    #[default]
    Text,
    /// Component layout drawn on the canvas.
    Structured,
}

impl GenerationMode {
    pub fn label(self) -> &'static str {
        match self {
            GenerationMode::Text => "Describe",
            GenerationMode::Structured => "Visual",
        }
    }
}

/// Target page dimensions the structured layout is drawn against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

/// Immutable snapshot of everything a prompt is built from.
///
/// Taken when a generation starts; later edits to the session never reach it.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationInput {
    Text(String),
    Structured {
        components: Vec<Component>,
        canvas: CanvasSize,
    },
}

impl GenerationInput {
    pub fn mode(&self) -> GenerationMode {
        match self {
            GenerationInput::Text(_) => GenerationMode::Text,
            GenerationInput::Structured { .. } => GenerationMode::Structured,
        }
    }
}

/// Knobs forwarded to the generative service with every prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub model: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model: "local-model".into(),
            max_output_tokens: 8192,
            temperature: 0.7,
        }
    }
}

/// A generation accepted by the session and waiting to be run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationJob {
    pub id: u64,
    pub input: GenerationInput,
    pub params: GenerationParams,
}
