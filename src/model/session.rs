use std::collections::HashSet;

use thiserror::Error;

use crate::engine::document::{assemble_document, preview_document};
use crate::engine::error::PipelineError;
use crate::model::artifacts::{ArtifactKind, GeneratedArtifacts};
use crate::model::component::{Component, ComponentKind, Position};
use crate::model::generation_input::{
    CanvasSize, GenerationInput, GenerationJob, GenerationMode, GenerationParams,
};
use crate::model::graph::{to_graph, EditRejection, Graph, GraphEdit};
use crate::model::notice::Notice;

/// Oldest notices are dropped once this many are waiting to be taken.
const MAX_PENDING_NOTICES: usize = 32;

/// Where the session is in the generation lifecycle.
///
/// Success and failure are reported through [`GenerationOutcome`] and drop
/// straight back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationPhase {
    #[default]
    Idle,
    Generating { job_id: u64 },
}

#[derive(Debug)]
pub enum GenerationOutcome {
    Succeeded,
    Failed(PipelineError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a generation is already running")]
    GenerationInFlight,

    #[error("describe the page you want first")]
    EmptyDescription,

    #[error("add at least one component to the canvas first")]
    EmptyCanvas,

    #[error("duplicate component id '{0}'")]
    DuplicateComponentId(String),

    #[error("component '{0}' needs a non-negative position and a positive size")]
    InvalidGeometry(String),

    #[error("no generation with id {0} is running")]
    UnexpectedCompletion(u64),
}

/// Everything one editing session owns. Mutated only through these methods.
#[derive(Debug, Default)]
pub struct SessionState {
    mode: GenerationMode,
    text_input: String,
    graph: Graph,
    artifacts: GeneratedArtifacts,
    phase: GenerationPhase,
    active_tab: ArtifactKind,
    next_job_id: u64,
    notices: Vec<Notice>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /* ---------- reads ---------- */

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    pub fn text_input(&self) -> &str {
        &self.text_input
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Canonical components, derived from the graph.
    pub fn components(&self) -> Vec<Component> {
        self.graph.components()
    }

    pub fn selected(&self) -> Option<&str> {
        self.graph.selected_id()
    }

    pub fn artifacts(&self) -> &GeneratedArtifacts {
        &self.artifacts
    }

    pub fn active_tab(&self) -> ArtifactKind {
        self.active_tab
    }

    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, GenerationPhase::Generating { .. })
    }

    pub fn assembled_document(&self) -> String {
        assemble_document(&self.artifacts)
    }

    pub fn preview_document(&self) -> String {
        preview_document(&self.artifacts)
    }

    /// Drain pending notifications.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /* ---------- edits, allowed in every phase ---------- */

    pub fn set_mode(&mut self, mode: GenerationMode) {
        self.mode = mode;
    }

    pub fn set_text_input(&mut self, text: impl Into<String>) {
        self.text_input = text.into();
    }

    pub fn set_active_tab(&mut self, tab: ArtifactKind) {
        self.active_tab = tab;
    }

    /// Hand edit from the code-edit surface.
    pub fn edit_artifact(&mut self, kind: ArtifactKind, text: impl Into<String>) {
        self.artifacts.set(kind, text);
    }

    pub fn apply_edit(&mut self, edit: GraphEdit) -> Result<(), EditRejection> {
        self.graph = self.graph.apply(edit)?;
        Ok(())
    }

    /// Drop a new component of `kind` at `at` and return its id.
    pub fn add_component(&mut self, kind: ComponentKind, at: Position) -> Result<String, EditRejection> {
        self.apply_edit(GraphEdit::AddNode { kind, at })?;
        Ok(self
            .graph
            .nodes
            .last()
            .map(|n| n.id.clone())
            .unwrap_or_default())
    }

    pub fn select(&mut self, id: Option<String>) -> Result<(), EditRejection> {
        self.apply_edit(GraphEdit::SelectNode { id })
    }

    /// Replace the whole canvas. Ids must be unique, positions non-negative
    /// and sizes positive.
    pub fn replace_components(&mut self, components: Vec<Component>) -> Result<(), SessionError> {
        let mut seen = HashSet::new();
        for c in &components {
            if !seen.insert(c.id.as_str()) {
                return Err(SessionError::DuplicateComponentId(c.id.clone()));
            }
            if !c.position.is_valid() || !c.size.is_valid() {
                return Err(SessionError::InvalidGeometry(c.id.clone()));
            }
        }
        self.graph = to_graph(&components);
        Ok(())
    }

    /* ---------- generation lifecycle ---------- */

    /// Snapshot the current inputs into a job and enter `Generating`.
    ///
    /// Rejected while another job is running.
    pub fn begin_generation(
        &mut self,
        params: &GenerationParams,
        canvas: CanvasSize,
    ) -> Result<GenerationJob, SessionError> {
        if self.is_loading() {
            tracing::warn!("generation requested while one is in flight");
            return Err(SessionError::GenerationInFlight);
        }

        let input = match self.mode {
            GenerationMode::Text => {
                if self.text_input.trim().is_empty() {
                    return Err(SessionError::EmptyDescription);
                }
                GenerationInput::Text(self.text_input.clone())
            }
            GenerationMode::Structured => {
                if self.graph.is_empty() {
                    return Err(SessionError::EmptyCanvas);
                }
                GenerationInput::Structured {
                    components: self.components(),
                    canvas,
                }
            }
        };

        self.next_job_id += 1;
        let job = GenerationJob {
            id: self.next_job_id,
            input,
            params: params.clone(),
        };

        self.phase = GenerationPhase::Generating { job_id: job.id };
        self.push_notice(Notice::Loading("Generating code...".into()));
        tracing::info!(job_id = job.id, mode = ?self.mode, "generation started");

        Ok(job)
    }

    /// Record the result of the running job and return to `Idle`.
    pub fn complete_generation(
        &mut self,
        job_id: u64,
        result: Result<GeneratedArtifacts, PipelineError>,
    ) -> Result<GenerationOutcome, SessionError> {
        if self.phase != (GenerationPhase::Generating { job_id }) {
            return Err(SessionError::UnexpectedCompletion(job_id));
        }
        self.phase = GenerationPhase::Idle;

        match result {
            Ok(artifacts) => {
                self.artifacts = artifacts;
                self.push_notice(Notice::Success("Code generated successfully".into()));
                tracing::info!(job_id, "generation succeeded");
                Ok(GenerationOutcome::Succeeded)
            }
            Err(e) => {
                self.push_notice(Notice::Error(e.user_message()));
                tracing::warn!(job_id, error = %e, "generation failed");
                Ok(GenerationOutcome::Failed(e))
            }
        }
    }

    fn push_notice(&mut self, notice: Notice) {
        if self.notices.len() >= MAX_PENDING_NOTICES {
            self.notices.remove(0);
        }
        self.notices.push(notice);
    }
}
