use eframe::egui;

use crate::model::graph::{Graph, GraphEdit, NodePatch};

#[derive(Default)]
pub struct InspectorState {
    new_key: String,
    new_value: String,
}

/// Property editor for the selected node. Returns an update when anything changed.
pub fn draw_inspector(ui: &mut egui::Ui, graph: &Graph, state: &mut InspectorState) -> Option<GraphEdit> {
    let Some(node) = graph.selected_id().and_then(|id| graph.node(id)) else {
        ui.label("Select a component to edit it.");
        return None;
    };

    let mut text = node.data.text.clone().unwrap_or_default();
    let mut size = node.data.size;
    let mut properties = node.data.properties.clone();
    let mut changed = false;

    ui.heading(format!("{} · {}", node.data.kind, node.id));

    ui.label("Text");
    changed |= ui.text_edit_singleline(&mut text).changed();

    ui.horizontal(|ui| {
        ui.label("W");
        changed |= ui
            .add(egui::DragValue::new(&mut size.width).range(1.0..=4000.0))
            .changed();
        ui.label("H");
        changed |= ui
            .add(egui::DragValue::new(&mut size.height).range(1.0..=4000.0))
            .changed();
    });

    /* -------- Properties -------- */

    ui.collapsing("Properties", |ui| {
        let mut to_remove: Option<String> = None;

        for (key, value) in properties.iter_mut() {
            ui.horizontal(|ui| {
                ui.label(key.as_str());
                changed |= ui.text_edit_singleline(value).changed();

                if ui.small_button("❌").clicked() {
                    to_remove = Some(key.clone());
                }
            });
        }

        if let Some(key) = to_remove {
            properties.remove(&key);
            changed = true;
        }

        ui.separator();

        ui.label("Add property");
        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(&mut state.new_key).hint_text("key").desired_width(80.0));
            ui.add(egui::TextEdit::singleline(&mut state.new_value).hint_text("value").desired_width(120.0));

            if ui.button("Add").clicked() {
                let key = state.new_key.trim();
                if !key.is_empty() && !properties.contains_key(key) {
                    properties.insert(key, state.new_value.clone());
                    state.new_key.clear();
                    state.new_value.clear();
                    changed = true;
                }
            }
        });
    });

    changed.then(|| GraphEdit::UpdateNode {
        id: node.id.clone(),
        patch: NodePatch {
            text: Some((!text.is_empty()).then_some(text)),
            size: Some(size),
            properties: Some(properties),
        },
    })
}
