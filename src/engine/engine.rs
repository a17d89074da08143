use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use crate::engine::llm_client::GenerationClient;
use crate::engine::pipeline::generate;
use crate::engine::protocol::{EngineCommand, EngineResponse};

/// Runs generations off the UI thread, one command at a time.
pub struct Engine {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    client: Box<dyn GenerationClient>,
}

impl Engine {
    pub fn new(
        rx: Receiver<EngineCommand>,
        tx: Sender<EngineResponse>,
        client: Box<dyn GenerationClient>,
    ) -> Self {
        Self { rx, tx, client }
    }

    /// Start an engine on its own thread and hand back its channel ends.
    pub fn spawn(
        client: Box<dyn GenerationClient>,
    ) -> (Sender<EngineCommand>, Receiver<EngineResponse>, JoinHandle<()>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        let handle = std::thread::spawn(move || {
            let mut engine = Engine::new(cmd_rx, resp_tx, client);
            engine.run();
        });

        (cmd_tx, resp_rx, handle)
    }

    /// Process commands until every sender is dropped.
    pub fn run(&mut self) {
        while let Ok(cmd) = self.rx.recv() {
            match cmd {
                EngineCommand::Generate(job) => {
                    let result = generate(self.client.as_ref(), &job.input, &job.params);
                    if let Err(e) = &result {
                        tracing::warn!(job_id = job.id, error = %e, "generation failed");
                    }

                    if self
                        .tx
                        .send(EngineResponse::Generated {
                            job_id: job.id,
                            result,
                        })
                        .is_err()
                    {
                        break;
                    }
                }

                EngineCommand::ReplaceClient(client) => {
                    tracing::info!("generation client replaced");
                    self.client = client;
                }
            }
        }

        tracing::debug!("engine stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::llm_client::MockGenerationClient;
    use crate::model::generation_input::{GenerationInput, GenerationJob, GenerationParams};
    use std::time::Duration;

    fn job(id: u64) -> GenerationJob {
        GenerationJob {
            id,
            input: GenerationInput::Text("a card".into()),
            params: GenerationParams::default(),
        }
    }

    #[test]
    fn test_engine_replies_with_job_id() {
        let mut client = MockGenerationClient::new();
        client
            .expect_complete()
            .returning(|_| Ok(r#"{"html":"<div>card</div>"}"#.to_string()));

        let (tx, rx, handle) = Engine::spawn(Box::new(client));
        tx.send(EngineCommand::Generate(job(7))).unwrap();

        let EngineResponse::Generated { job_id, result } =
            rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(job_id, 7);
        assert_eq!(result.unwrap().html, "<div>card</div>");

        drop(tx);
        handle.join().unwrap();
    }

    #[test]
    fn test_replaced_client_serves_next_job() {
        let mut first = MockGenerationClient::new();
        first.expect_complete().times(0);

        let mut second = MockGenerationClient::new();
        second
            .expect_complete()
            .times(1)
            .returning(|_| Ok(r#"{"css":"a{}"}"#.to_string()));

        let (tx, rx, handle) = Engine::spawn(Box::new(first));
        tx.send(EngineCommand::ReplaceClient(Box::new(second))).unwrap();
        tx.send(EngineCommand::Generate(job(1))).unwrap();

        let EngineResponse::Generated { result, .. } =
            rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(result.unwrap().css, "a{}");

        drop(tx);
        handle.join().unwrap();
    }
}
