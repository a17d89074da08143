use crate::engine::artifact_parser::parse_artifacts;
use crate::engine::error::PipelineError;
use crate::engine::llm_client::{GenerationClient, GenerationRequest};
use crate::engine::prompt_builder::PromptBuilder;
use crate::model::artifacts::GeneratedArtifacts;
use crate::model::generation_input::{GenerationInput, GenerationParams};

/// Build the prompt, call the service once and extract the artifacts.
pub fn generate(
    client: &dyn GenerationClient,
    input: &GenerationInput,
    params: &GenerationParams,
) -> Result<GeneratedArtifacts, PipelineError> {
    let request = GenerationRequest {
        prompt: PromptBuilder::build(input),
        params: params.clone(),
    };

    tracing::info!(
        mode = ?input.mode(),
        model = %params.model,
        "starting generation"
    );

    let raw = client.complete(&request)?;
    let artifacts = parse_artifacts(&raw)?;

    tracing::info!(
        html_chars = artifacts.html.len(),
        css_chars = artifacts.css.len(),
        js_chars = artifacts.javascript.len(),
        "generation produced artifacts"
    );

    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::{ExtractError, GenerationError};
    use crate::engine::llm_client::MockGenerationClient;

    #[test]
    fn test_generate_sends_prompt_and_params() {
        let mut client = MockGenerationClient::new();
        client
            .expect_complete()
            .withf(|req| {
                req.prompt.contains("a pricing table")
                    && req.params.model == "m"
                    && req.params.max_output_tokens == 100
            })
            .times(1)
            .returning(|_| Ok(r#"{"html":"<table></table>"}"#.to_string()));

        let params = GenerationParams {
            model: "m".into(),
            max_output_tokens: 100,
            temperature: 0.1,
        };
        let out = generate(&client, &GenerationInput::Text("a pricing table".into()), &params).unwrap();
        assert_eq!(out, GeneratedArtifacts::new("<table></table>", "", ""));
    }

    #[test]
    fn test_generate_surfaces_transport_failure() {
        let mut client = MockGenerationClient::new();
        client
            .expect_complete()
            .returning(|_| Err(GenerationError::Transport("connection refused".into())));

        let err = generate(
            &client,
            &GenerationInput::Text("x".into()),
            &GenerationParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Generation(GenerationError::Transport(_))));
    }

    #[test]
    fn test_generate_surfaces_extraction_failure() {
        let mut client = MockGenerationClient::new();
        client
            .expect_complete()
            .returning(|_| Ok("I'd rather not.".to_string()));

        let err = generate(
            &client,
            &GenerationInput::Text("x".into()),
            &GenerationParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Extract(ExtractError::Parse { .. })));
        assert_eq!(err.raw_response(), Some("I'd rather not."));
    }
}
