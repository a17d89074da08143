use eframe::egui;
use egui::{Align2, Color32, FontId, Key, Pos2, Rect, Sense, Stroke, StrokeKind, Vec2};

use crate::model::component::{ComponentKind, Position};
use crate::model::generation_input::CanvasSize;
use crate::model::graph::{Graph, GraphEdit, GraphNode};

fn kind_color(kind: ComponentKind) -> Color32 {
    match kind {
        ComponentKind::Header => Color32::from_rgb(40, 70, 120),
        ComponentKind::Button => Color32::from_rgb(40, 90, 60),
        ComponentKind::Input => Color32::from_rgb(90, 60, 120),
        ComponentKind::Text => Color32::from_rgb(80, 80, 80),
        ComponentKind::Image => Color32::from_rgb(120, 80, 40),
        ComponentKind::Card => Color32::from_rgb(60, 95, 100),
    }
}

fn node_rect(origin: Pos2, node: &GraphNode) -> Rect {
    Rect::from_min_size(
        origin + Vec2::new(node.position.x, node.position.y),
        Vec2::new(node.data.size.width, node.data.size.height),
    )
}

/// Draw the editable graph and return the edits the user made this frame.
pub fn draw_canvas(ui: &mut egui::Ui, graph: &Graph, canvas: CanvasSize) -> Vec<GraphEdit> {
    let mut edits = Vec::new();
    let selected = graph.selected_id();

    let (background, painter) = ui.allocate_painter(ui.available_size(), Sense::click());
    let origin = background.rect.min;

    painter.rect_filled(background.rect, 0.0, Color32::from_gray(24));
    painter.rect_stroke(
        Rect::from_min_size(origin, Vec2::new(canvas.width, canvas.height)),
        0.0,
        Stroke::new(1.0, Color32::from_gray(70)),
        StrokeKind::Inside,
    );

    /* -------- Edges -------- */

    for edge in &graph.edges {
        if let (Some(s), Some(t)) = (graph.node(&edge.source), graph.node(&edge.target)) {
            painter.line_segment(
                [node_rect(origin, s).center(), node_rect(origin, t).center()],
                Stroke::new(1.5, Color32::from_gray(140)),
            );
        }
    }

    /* -------- Nodes -------- */

    for node in &graph.nodes {
        let rect = node_rect(origin, node);
        let response = ui.interact(rect, ui.id().with(("node", &node.id)), Sense::click_and_drag());

        if (response.clicked() || response.drag_started()) && !node.selected {
            edits.push(GraphEdit::SelectNode {
                id: Some(node.id.clone()),
            });
        }

        if response.dragged() {
            let delta = response.drag_delta();
            if delta != Vec2::ZERO {
                edits.push(GraphEdit::MoveNode {
                    id: node.id.clone(),
                    dx: delta.x,
                    dy: delta.y,
                });
            }
        }

        response.context_menu(|ui| {
            if let Some(source) = selected.filter(|s| *s != node.id) {
                if ui.button(format!("Connect from {source}")).clicked() {
                    edits.push(GraphEdit::Connect {
                        source: source.to_string(),
                        target: node.id.clone(),
                    });
                    ui.close();
                }
            }
            if ui.button("Delete").clicked() {
                edits.push(GraphEdit::DeleteNode { id: node.id.clone() });
                ui.close();
            }
        });

        painter.rect_filled(rect, 4.0, kind_color(node.data.kind));
        if node.selected {
            painter.rect_stroke(rect, 4.0, Stroke::new(2.0, Color32::YELLOW), StrokeKind::Outside);
        }
        painter.text(
            rect.left_top() + Vec2::new(4.0, 2.0),
            Align2::LEFT_TOP,
            node.data.kind.as_str(),
            FontId::proportional(10.0),
            Color32::from_gray(200),
        );
        if let Some(text) = &node.data.text {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                text,
                FontId::proportional(13.0),
                Color32::WHITE,
            );
        }
    }

    if background.clicked() && selected.is_some() {
        edits.push(GraphEdit::SelectNode { id: None });
    }

    let nothing_focused = ui.ctx().memory(|m| m.focused().is_none());
    if let Some(id) = selected {
        if nothing_focused && ui.input(|i| i.key_pressed(Key::Delete)) {
            edits.push(GraphEdit::DeleteNode { id: id.to_string() });
        }
    }

    edits
}

/// Where a palette click drops the next component.
pub fn next_drop_point(graph: &Graph) -> Position {
    let step = graph.nodes.len() as f32 * 24.0;
    Position::new(40.0 + step % 480.0, 40.0 + step % 360.0)
}
