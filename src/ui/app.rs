use eframe::egui;
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crate::engine::engine::Engine;
use crate::engine::error::GenerationError;
use crate::engine::llm_client::{GenerationClient, GenerationRequest, HttpGenerationClient};
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::artifacts::ArtifactKind;
use crate::model::component::ComponentKind;
use crate::model::generation_input::GenerationMode;
use crate::model::graph::GraphEdit;
use crate::model::notice::Notice;
use crate::model::session::{GenerationOutcome, SessionState};
use crate::ui::canvas::{draw_canvas, next_drop_point};
use crate::ui::code_panel::draw_code_panel;
use crate::ui::inspector::{draw_inspector, InspectorState};
use crate::ui::settings::GeneratorSettings;
use crate::ui::settings_io::{export_text, load_settings, save_settings};

const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Stand-in transport when the configured one cannot be built.
struct UnavailableClient {
    reason: String,
}

impl GenerationClient for UnavailableClient {
    fn complete(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
        Err(GenerationError::Transport(self.reason.clone()))
    }
}

fn build_client(settings: &GeneratorSettings) -> Box<dyn GenerationClient> {
    match settings
        .client_config()
        .and_then(HttpGenerationClient::new)
    {
        Ok(client) => Box::new(client),
        Err(e) => {
            tracing::warn!(error = %e, "generation client unavailable");
            Box::new(UnavailableClient {
                reason: e.to_string(),
            })
        }
    }
}

type ConnectionCheck = mpsc::Receiver<Result<String, GenerationError>>;

/// Run the connection check on its own thread so the UI keeps drawing.
fn spawn_connection_check(settings: &GeneratorSettings) -> ConnectionCheck {
    let config = settings.client_config();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let status = config
            .and_then(HttpGenerationClient::new)
            .and_then(|c| c.test_connection());
        // The window may be gone by now.
        let _ = tx.send(status);
    });

    rx
}

/// Persist `settings`, then hand the engine a transport built from them.
/// A failed save leaves the running transport untouched.
fn persist_settings(
    settings: &GeneratorSettings,
    save: impl FnOnce(&GeneratorSettings) -> anyhow::Result<()>,
    cmd_tx: &mpsc::Sender<EngineCommand>,
) -> Notice {
    if let Err(e) = save(settings) {
        return Notice::Error(format!("{e:#}"));
    }

    if cmd_tx
        .send(EngineCommand::ReplaceClient(build_client(settings)))
        .is_err()
    {
        tracing::error!("generation worker stopped; new settings not applied");
        return Notice::Error("Settings saved, but the generation worker has stopped".into());
    }

    Notice::Success("Settings saved".into())
}

/* =========================
   UI State
   ========================= */

#[derive(Default)]
struct UiState {
    show_settings: bool,
    show_document: bool,
    connection_status: Option<String>,
    connection_check: Option<ConnectionCheck>,
    last_raw_response: Option<String>,
    notices: Vec<(Notice, Instant)>,
    inspector: InspectorState,
}

/* =========================
   App
   ========================= */

pub struct CodegenApp {
    session: SessionState,
    settings: GeneratorSettings,
    ui: UiState,

    cmd_tx: mpsc::Sender<EngineCommand>,
    resp_rx: mpsc::Receiver<EngineResponse>,
}

impl CodegenApp {
    pub fn new() -> Self {
        let settings = load_settings();
        let (cmd_tx, resp_rx, _handle) = Engine::spawn(build_client(&settings));

        Self {
            session: SessionState::new(),
            settings,
            ui: UiState::default(),
            cmd_tx,
            resp_rx,
        }
    }

    fn push_notice(&mut self, notice: Notice) {
        self.ui.notices.push((notice, Instant::now()));
    }

    fn poll_engine(&mut self) {
        while let Ok(resp) = self.resp_rx.try_recv() {
            match resp {
                EngineResponse::Generated { job_id, result } => {
                    match self.session.complete_generation(job_id, result) {
                        Ok(GenerationOutcome::Succeeded) => {
                            self.ui.last_raw_response = None;
                            self.session.set_active_tab(ArtifactKind::Html);
                        }
                        Ok(GenerationOutcome::Failed(e)) => {
                            self.ui.last_raw_response = e.raw_response().map(str::to_string);
                        }
                        Err(e) => tracing::warn!(error = %e, "dropping engine response"),
                    }
                }
            }
        }

        if let Some(check) = &self.ui.connection_check {
            let status = match check.try_recv() {
                Ok(Ok(status)) => Some(status),
                Ok(Err(e)) => Some(e.to_string()),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => Some("connection check stopped".into()),
            };
            if status.is_some() {
                self.ui.connection_status = status;
                self.ui.connection_check = None;
            }
        }

        for notice in self.session.take_notices() {
            self.push_notice(notice);
        }
        let loading = self.session.is_loading();
        self.ui.notices.retain(|(n, at)| match n {
            Notice::Loading(_) => loading,
            _ => at.elapsed() < NOTICE_TTL,
        });
    }

    fn request_generation(&mut self) {
        let job = match self
            .session
            .begin_generation(&self.settings.params(), self.settings.canvas())
        {
            Ok(job) => job,
            Err(e) => {
                self.push_notice(Notice::Error(e.to_string()));
                return;
            }
        };

        let job_id = job.id;
        if self.cmd_tx.send(EngineCommand::Generate(job)).is_err() {
            let _ = self.session.complete_generation(
                job_id,
                Err(GenerationError::Transport("generation worker stopped".into()).into()),
            );
        }
    }

    fn apply_settings(&mut self) {
        let notice = persist_settings(&self.settings, save_settings, &self.cmd_tx);
        self.push_notice(notice);
    }

    fn export(&mut self, file_name: &str, extension: &str, contents: String) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(file_name)
            .add_filter(extension, &[extension])
            .save_file()
        else {
            return;
        };

        let notice = match export_text(&path, &contents) {
            Ok(()) => Notice::Success(format!("Saved {}", path.display())),
            Err(e) => Notice::Error(format!("{e:#}")),
        };
        self.push_notice(notice);
    }

    fn draw_top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mut mode = self.session.mode();
            for m in [GenerationMode::Text, GenerationMode::Structured] {
                ui.selectable_value(&mut mode, m, m.label());
            }
            if mode != self.session.mode() {
                self.session.set_mode(mode);
            }

            ui.separator();

            let loading = self.session.is_loading();
            if ui
                .add_enabled(!loading, egui::Button::new("Generate"))
                .clicked()
            {
                self.request_generation();
            }
            if loading {
                ui.spinner();
                ui.label("Generating...");
            }

            ui.separator();

            ui.menu_button("Export", |ui| {
                if ui.button("Preview document").clicked() {
                    let doc = self.session.preview_document();
                    self.export("index.html", "html", doc);
                    ui.close();
                }
                for kind in ArtifactKind::ALL {
                    if ui.button(kind.label()).clicked() {
                        let text = self.session.artifacts().get(kind).to_string();
                        let name = format!("generated.{}", kind.file_extension());
                        self.export(&name, kind.file_extension(), text);
                        ui.close();
                    }
                }
            });

            if ui.button("Settings").clicked() {
                self.ui.show_settings = true;
            }
        });
    }

    fn draw_palette(&mut self, ui: &mut egui::Ui) {
        ui.heading("Components");
        ui.separator();

        for kind in ComponentKind::ALL {
            if ui.button(format!("Add {kind}")).clicked() {
                let at = next_drop_point(self.session.graph());
                if let Err(e) = self.session.add_component(kind, at) {
                    tracing::warn!(error = %e, "palette add rejected");
                }
            }
        }

        ui.separator();
        if ui.button("Clear canvas").clicked() {
            let _ = self.session.apply_edit(GraphEdit::Clear);
        }
    }

    fn draw_settings_window(&mut self, ctx: &egui::Context) {
        let mut open = self.ui.show_settings;
        let mut save = false;
        let mut test = false;

        egui::Window::new("Settings").open(&mut open).show(ctx, |ui| {
            let s = &mut self.settings;

            ui.label("UI Scale");
            ui.add(egui::Slider::new(&mut s.ui_scale, 0.75..=2.0));

            ui.separator();
            ui.label("Endpoint");
            ui.text_edit_singleline(&mut s.endpoint);
            ui.label("Model");
            ui.text_edit_singleline(&mut s.model);
            ui.label("API key environment variable");
            ui.text_edit_singleline(&mut s.api_key_env);

            ui.horizontal(|ui| {
                ui.label("Max output tokens");
                ui.add(egui::DragValue::new(&mut s.max_output_tokens).range(256..=65536));
            });
            ui.horizontal(|ui| {
                ui.label("Temperature");
                ui.add(egui::Slider::new(&mut s.temperature, 0.0..=2.0));
            });
            ui.horizontal(|ui| {
                ui.label("Timeout (s)");
                ui.add(egui::DragValue::new(&mut s.timeout_secs).range(1..=600));
            });

            ui.separator();
            ui.horizontal(|ui| {
                ui.label("Canvas");
                ui.add(egui::DragValue::new(&mut s.canvas_width).range(200.0..=4000.0));
                ui.label("x");
                ui.add(egui::DragValue::new(&mut s.canvas_height).range(200.0..=4000.0));
            });

            ui.separator();
            let checking = self.ui.connection_check.is_some();
            ui.horizontal(|ui| {
                save = ui.button("Save").clicked();
                test = ui
                    .add_enabled(!checking, egui::Button::new("Test connection"))
                    .clicked();
                if checking {
                    ui.spinner();
                }
            });
            if let Some(status) = &self.ui.connection_status {
                ui.label(status);
            }
        });

        self.ui.show_settings = open;

        if save {
            self.apply_settings();
        }
        if test {
            self.ui.connection_status = None;
            self.ui.connection_check = Some(spawn_connection_check(&self.settings));
        }
    }

    fn draw_status_bar(&mut self, ui: &mut egui::Ui) {
        for (notice, _) in &self.ui.notices {
            let color = match notice {
                Notice::Error(_) => egui::Color32::from_rgb(220, 90, 90),
                Notice::Success(_) => egui::Color32::from_rgb(90, 200, 120),
                Notice::Loading(_) => egui::Color32::GRAY,
            };
            ui.colored_label(color, notice.message());
        }

        if let Some(raw) = &self.ui.last_raw_response {
            ui.collapsing("Last raw response", |ui| {
                egui::ScrollArea::vertical().max_height(160.0).show(ui, |ui| {
                    ui.monospace(raw);
                });
            });
        }
    }
}

/* =========================
   egui App
   ========================= */

impl eframe::App for CodegenApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.settings.ui_scale);

        self.poll_engine();
        if self.session.is_loading()
            || !self.ui.notices.is_empty()
            || self.ui.connection_check.is_some()
        {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("top").show(ctx, |ui| self.draw_top_bar(ui));

        egui::TopBottomPanel::bottom("status")
            .resizable(false)
            .show(ctx, |ui| self.draw_status_bar(ui));

        /* LEFT PANEL */
        if self.session.mode() == GenerationMode::Structured {
            egui::SidePanel::left("palette")
                .resizable(false)
                .default_width(160.0)
                .show(ctx, |ui| self.draw_palette(ui));
        }

        /* RIGHT PANEL */
        egui::SidePanel::right("code")
            .resizable(true)
            .default_width(420.0)
            .min_width(280.0)
            .show(ctx, |ui| {
                if self.session.mode() == GenerationMode::Structured {
                    let edit = draw_inspector(ui, self.session.graph(), &mut self.ui.inspector);
                    if let Some(edit) = edit {
                        if let Err(e) = self.session.apply_edit(edit) {
                            self.push_notice(Notice::Error(e.to_string()));
                        }
                    }
                    ui.separator();
                }
                draw_code_panel(ui, &mut self.session, &mut self.ui.show_document);
            });

        /* CENTER */
        egui::CentralPanel::default().show(ctx, |ui| match self.session.mode() {
            GenerationMode::Text => {
                ui.heading("Describe your page");
                let mut text = self.session.text_input().to_string();
                let response = ui.add(
                    egui::TextEdit::multiline(&mut text)
                        .hint_text("e.g. a landing page with a hero header and a sign-up form")
                        .desired_rows(12)
                        .desired_width(f32::INFINITY),
                );
                if response.changed() {
                    self.session.set_text_input(text);
                }
            }
            GenerationMode::Structured => {
                let canvas = self.settings.canvas();
                let edits = draw_canvas(ui, self.session.graph(), canvas);
                for edit in edits {
                    if let Err(e) = self.session.apply_edit(edit) {
                        tracing::debug!(error = %e, "canvas edit ignored");
                    }
                }
            }
        });

        if self.ui.show_settings {
            self.draw_settings_window(ctx);
        }
    }
}
