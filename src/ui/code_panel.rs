use eframe::egui;

use crate::model::artifacts::ArtifactKind;
use crate::model::session::SessionState;

/// Tabbed editor over the three artifacts plus a read-only assembled view.
pub fn draw_code_panel(ui: &mut egui::Ui, session: &mut SessionState, show_document: &mut bool) {
    ui.horizontal(|ui| {
        for kind in ArtifactKind::ALL {
            let active = !*show_document && session.active_tab() == kind;
            if ui.selectable_label(active, kind.label()).clicked() {
                session.set_active_tab(kind);
                *show_document = false;
            }
        }
        if ui.selectable_label(*show_document, "Document").clicked() {
            *show_document = true;
        }
    });

    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| {
        if *show_document {
            let mut doc = session.preview_document();
            ui.add(
                egui::TextEdit::multiline(&mut doc)
                    .code_editor()
                    .interactive(false)
                    .desired_width(f32::INFINITY),
            );
            return;
        }

        let tab = session.active_tab();
        let mut text = session.artifacts().get(tab).to_string();
        let response = ui.add(
            egui::TextEdit::multiline(&mut text)
                .code_editor()
                .desired_rows(24)
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            session.edit_artifact(tab, text);
        }
    });
}
