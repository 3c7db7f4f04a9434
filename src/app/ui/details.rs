use eframe::egui::{self, RichText, Ui};

use crate::util::{format_location, truncate_label};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        // Clone out of the cell: clearing the selection below notifies the
        // listener, which writes back into it.
        let details = self.details.borrow().clone();
        let Some(details) = details else {
            ui.label("Click a node in the graph or a search match.");
            return;
        };

        ui.label(RichText::new(&details.name).strong());
        ui.small(details.id.as_str());
        ui.add_space(6.0);

        ui.label(format!("Kind: {}", details.kind.tag()));
        ui.label(format!(
            "Location: {}",
            format_location(&details.file, details.line, details.column)
        ));
        ui.label(format!("Nesting level: {}", details.level));
        ui.label(format!("Children: {}", details.child_count));

        if !details.metadata.is_empty() {
            ui.separator();
            ui.label(RichText::new("Metadata").strong());
            egui::Grid::new("metadata_grid")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    for (key, value) in &details.metadata {
                        ui.label(key.as_str());
                        ui.label(value.as_str());
                        ui.end_row();
                    }
                });
        }

        ui.separator();
        if ui.button("Clear selection").clicked() {
            self.session.clear_selection();
            return;
        }

        let Some(selected) = self.session.selected() else {
            return;
        };
        let mut connected = self
            .session
            .highlight()
            .connected()
            .iter()
            .copied()
            .filter(|index| *index != selected)
            .collect::<Vec<_>>();
        connected.sort_unstable();

        ui.label(RichText::new(format!("Connected nodes ({})", connected.len())).strong());
        if connected.is_empty() {
            ui.label("No edges touch this node.");
            return;
        }

        let mut next_selection = None;
        egui::ScrollArea::vertical()
            .id_salt("connected_nodes_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let graph = self.session.graph();
                for index in connected {
                    let Some(node) = graph.nodes.get(index) else {
                        continue;
                    };
                    let relations = graph
                        .incident_edges(selected)
                        .filter(|edge| edge.other_endpoint(selected) == Some(index))
                        .map(|edge| edge.kind.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    let label = format!("{}  [{}]", truncate_label(&node.name), relations);
                    let visible = self.session.is_node_visible(index);
                    let response = ui.add_enabled(visible, egui::Link::new(label));
                    if response.on_hover_text(node.id.as_str()).clicked() {
                        next_selection = Some(index);
                    }
                }
            });

        if let Some(index) = next_selection {
            self.session.select_index(index);
        }
    }
}
