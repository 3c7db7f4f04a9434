use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Stroke, Ui, vec2};

use codegraph_view::view::Emphasis;

use crate::util::{format_location, truncate_label};

use super::super::ViewModel;
use super::super::render_utils::{
    blend_color, circle_visible, dim_color, draw_background, draw_boundary, kind_color,
    segment_may_be_visible,
};

const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
const CONNECTED_EDGE_COLOR: Color32 = Color32::from_rgb(241, 146, 94);
const HOVER_COLOR: Color32 = Color32::from_rgb(255, 164, 101);

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pointer(ui, rect, &response);

        let transform = *self.session.transform();
        draw_background(&painter, rect, transform.pan, transform.zoom);
        draw_boundary(
            &painter,
            transform.world_to_screen(rect, self.session.engine().config().center()),
            self.session.engine().config().boundary_radius() * transform.zoom,
        );

        let session = &self.session;
        let nodes = session.layout_nodes();
        let graph = session.graph();
        let zoom_sqrt = transform.zoom.sqrt();

        let screen_positions = nodes
            .iter()
            .map(|node| transform.world_to_screen(rect, node.position))
            .collect::<Vec<Pos2>>();

        for (edge_index, edge) in graph.edges.iter().enumerate() {
            if !session.is_edge_visible(edge_index) {
                continue;
            }
            let (Some(&start), Some(&end)) =
                (screen_positions.get(edge.source), screen_positions.get(edge.target))
            else {
                continue;
            };
            if !segment_may_be_visible(rect, start, end, 2.0) {
                continue;
            }

            let base_width = if edge.is_containment() { 0.8 } else { 1.3 };
            let base_color = if edge.is_containment() {
                Color32::from_rgba_unmultiplied(96, 104, 116, 150)
            } else {
                Color32::from_rgba_unmultiplied(150, 150, 150, 190)
            };
            let (width, color) = match session.edge_emphasis(edge_index) {
                Emphasis::Connected | Emphasis::Selected => {
                    ((2.2 * zoom_sqrt).clamp(1.2, 4.4), CONNECTED_EDGE_COLOR)
                }
                Emphasis::Dimmed => (
                    (base_width * 0.7 * zoom_sqrt).clamp(0.4, 2.0),
                    dim_color(base_color, 0.35),
                ),
                Emphasis::Normal => ((base_width * zoom_sqrt).clamp(0.5, 3.0), base_color),
            };

            painter.line_segment([start, end], Stroke::new(width, color));
        }

        let hovered = session.hovered();
        let dragged = session.engine().dragged();
        for (index, node) in nodes.iter().enumerate() {
            if !session.is_node_visible(index) {
                continue;
            }

            let position = screen_positions[index];
            let radius = node.radius * transform.zoom;
            if !circle_visible(rect, position, radius + 4.0) {
                continue;
            }

            let emphasis = session.node_emphasis(index);
            let is_hovered = hovered == Some(index) || dragged == Some(index);
            let base_color = kind_color(node.kind);
            let color = match emphasis {
                Emphasis::Selected => blend_color(base_color, SELECTED_COLOR, 0.65),
                Emphasis::Connected => base_color,
                Emphasis::Dimmed => dim_color(base_color, 0.3),
                Emphasis::Normal if is_hovered => blend_color(base_color, HOVER_COLOR, 0.35),
                Emphasis::Normal => base_color,
            };

            painter.circle_filled(position, radius, color);
            let stroke = match emphasis {
                Emphasis::Selected => Stroke::new(2.4, SELECTED_COLOR),
                Emphasis::Connected => Stroke::new(1.8, CONNECTED_EDGE_COLOR),
                _ => Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
            };
            painter.circle_stroke(position, radius, stroke);
            if is_hovered {
                painter.circle_stroke(position, radius + 4.0, Stroke::new(1.5, HOVER_COLOR));
            }

            if session.is_label_visible(index) {
                let label_color = if emphasis == Emphasis::Dimmed {
                    Color32::from_gray(110)
                } else {
                    Color32::from_gray(238)
                };
                painter.text(
                    position + vec2(0.0, radius + 4.0),
                    Align2::CENTER_TOP,
                    truncate_label(&graph.nodes[index].name),
                    FontId::proportional(12.0),
                    label_color,
                );
            }
        }

        if hovered.is_some() || session.is_dragging() {
            ui.output_mut(|output| {
                output.cursor_icon = if session.is_dragging() {
                    egui::CursorIcon::Grabbing
                } else {
                    egui::CursorIcon::PointingHand
                };
            });
        }

        if let Some(node) = hovered.and_then(|index| graph.nodes.get(index)) {
            let panel_text = format!(
                "{}  |  {}  |  {}  |  {} children",
                node.name,
                node.kind.tag(),
                format_location(&node.file, node.line, node.column),
                node.child_count
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                panel_text,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if nodes.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "The graph has no nodes.",
                FontId::proportional(15.0),
                Color32::from_gray(200),
            );
        }
    }
}
