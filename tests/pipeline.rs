use mockall::mock;

use sketch_codegen::engine::engine::Engine;
use sketch_codegen::engine::error::{ExtractError, GenerationError, PipelineError};
use sketch_codegen::engine::llm_client::{GenerationClient, GenerationRequest};
use sketch_codegen::engine::pipeline::generate;
use sketch_codegen::engine::protocol::{EngineCommand, EngineResponse};
use sketch_codegen::model::artifacts::GeneratedArtifacts;
use sketch_codegen::model::component::{ComponentKind, Position};
use sketch_codegen::model::generation_input::{CanvasSize, GenerationMode, GenerationParams};
use sketch_codegen::model::session::{GenerationOutcome, GenerationPhase, SessionError, SessionState};
use std::time::Duration;

mock! {
    pub Client {}

    impl GenerationClient for Client {
        fn complete(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
    }
}

fn client_returning(raw: &'static str) -> MockClient {
    let mut client = MockClient::new();
    client
        .expect_complete()
        .returning(move |_| Ok(raw.to_string()));
    client
}

#[test]
fn test_text_mode_end_to_end() {
    let client = client_returning(
        r#"{"html":"<button>Hi</button>","css":"button{color:red}","javascript":""}"#,
    );

    let mut session = SessionState::new();
    session.set_mode(GenerationMode::Text);
    session.set_text_input("a button that says Hi");

    let job = session
        .begin_generation(&GenerationParams::default(), CanvasSize::default())
        .unwrap();
    let result = generate(&client, &job.input, &job.params);
    let outcome = session.complete_generation(job.id, result).unwrap();

    assert!(matches!(outcome, GenerationOutcome::Succeeded));
    assert_eq!(session.phase(), GenerationPhase::Idle);
    assert_eq!(
        session.artifacts(),
        &GeneratedArtifacts::new("<button>Hi</button>", "button{color:red}", "")
    );

    let doc = session.assembled_document();
    assert!(doc.contains("<style>button{color:red}</style></head>"));
    assert!(doc.contains("<button>Hi</button>"));
    assert!(!doc.contains("<script>"));
}

#[test]
fn test_structured_mode_through_engine_thread() {
    let mut client = MockClient::new();
    client
        .expect_complete()
        .withf(|req: &GenerationRequest| req.prompt.contains("\"kind\": \"card\""))
        .times(1)
        .returning(|_| {
            Ok("Sure! ```json\n{\"html\":\"<div class=\\\"card\\\"></div>\",\"css\":\".card{}\"}\n```".to_string())
        });

    let (tx, rx, handle) = Engine::spawn(Box::new(client));

    let mut session = SessionState::new();
    session.set_mode(GenerationMode::Structured);
    session
        .add_component(ComponentKind::Card, Position::new(20.0, 20.0))
        .unwrap();

    let job = session
        .begin_generation(&GenerationParams::default(), CanvasSize::default())
        .unwrap();
    tx.send(EngineCommand::Generate(job)).unwrap();

    // Still interactive and still refusing a second request while suspended.
    session
        .add_component(ComponentKind::Button, Position::new(20.0, 300.0))
        .unwrap();
    assert_eq!(
        session
            .begin_generation(&GenerationParams::default(), CanvasSize::default())
            .unwrap_err(),
        SessionError::GenerationInFlight
    );

    let EngineResponse::Generated { job_id, result } =
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
    session.complete_generation(job_id, result).unwrap();

    assert_eq!(session.phase(), GenerationPhase::Idle);
    assert_eq!(session.artifacts().html, "<div class=\"card\"></div>");
    assert_eq!(session.artifacts().javascript, "");
    assert_eq!(session.components().len(), 2);

    drop(tx);
    handle.join().unwrap();
}

#[test]
fn test_failed_generation_leaves_artifacts_for_editing() {
    let client = client_returning("The service is overloaded, please retry later.");

    let mut session = SessionState::new();
    session.set_text_input("a blog layout");

    let job = session
        .begin_generation(&GenerationParams::default(), CanvasSize::default())
        .unwrap();
    let result = generate(&client, &job.input, &job.params);
    assert!(matches!(
        result,
        Err(PipelineError::Extract(ExtractError::Parse { .. }))
    ));

    let outcome = session.complete_generation(job.id, result).unwrap();
    assert!(matches!(outcome, GenerationOutcome::Failed(_)));
    assert_eq!(session.phase(), GenerationPhase::Idle);
    assert_eq!(session.artifacts(), &GeneratedArtifacts::placeholders());
    assert_eq!(session.assembled_document(), "");
}
