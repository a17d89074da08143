pub mod engine;
pub mod protocol;
pub mod error;

pub mod prompt_builder;
pub mod llm_client;
pub mod artifact_parser;
pub mod document;
pub mod pipeline;
