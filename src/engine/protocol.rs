use crate::engine::error::PipelineError;
use crate::engine::llm_client::GenerationClient;
use crate::model::artifacts::GeneratedArtifacts;
use crate::model::generation_input::GenerationJob;

pub enum EngineCommand {
    Generate(GenerationJob),
    /// Swap the transport, e.g. after the endpoint settings changed.
    ReplaceClient(Box<dyn GenerationClient>),
}

pub enum EngineResponse {
    Generated {
        job_id: u64,
        result: Result<GeneratedArtifacts, PipelineError>,
    },
}
