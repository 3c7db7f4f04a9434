use eframe::egui::{self, RichText, Ui};

use codegraph_view::graph::NodeKind;

use crate::util::truncate_label;

use super::super::ViewModel;
use super::super::render_utils::kind_color;

const SEARCH_MATCH_ROWS: usize = 40;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label(RichText::new("Node kinds").strong());
        let counts = self.session.stats().nodes_by_kind.clone();
        for kind in NodeKind::ALL {
            let count = counts.get(&kind).copied().unwrap_or(0);
            let mut visible = self.session.filters().kind_visible(kind);
            ui.horizontal(|ui| {
                let (swatch, _) =
                    ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
                ui.painter().circle_filled(swatch.center(), 5.0, kind_color(kind));
                if ui
                    .checkbox(&mut visible, format!("{} ({count})", kind.plural_label()))
                    .changed()
                {
                    self.session.set_kind_visible(kind, visible);
                }
            });
        }

        ui.separator();

        ui.label("Search by name")
            .on_hover_text("Case-insensitive substring match. Non-matching nodes are hidden.");
        let mut search = self.session.filters().search().to_owned();
        if ui.text_edit_singleline(&mut search).changed() {
            self.session.set_search(search);
        }

        let matches = self.session.search_matches(SEARCH_MATCH_ROWS);
        if !self.session.filters().search().trim().is_empty() {
            if matches.is_empty() {
                ui.small("No visible node matches.");
            } else {
                egui::ScrollArea::vertical()
                    .id_salt("search_matches_scroll")
                    .max_height(220.0)
                    .auto_shrink([false, true])
                    .show(ui, |ui| {
                        for index in matches {
                            let Some(node) = self.session.graph().nodes.get(index) else {
                                continue;
                            };
                            let label =
                                format!("{}  ({})", truncate_label(&node.name), node.kind.tag());
                            let hover = node.id.clone();
                            if ui.link(label).on_hover_text(hover).clicked() {
                                self.session.select_index(index);
                            }
                        }
                    });
            }
        }

        ui.separator();

        let mut show_connections = self.session.filters().show_connections();
        if ui
            .checkbox(&mut show_connections, "Show connections")
            .on_hover_text("Draw edges. Applies to every edge regardless of node filters.")
            .changed()
        {
            self.session.set_show_connections(show_connections);
        }

        if ui.button("Reset filters").clicked() {
            self.session.reset_filters();
        }

        ui.separator();
        ui.label(RichText::new("View").strong());
        ui.horizontal_wrapped(|ui| {
            if ui.button("Zoom in").clicked() {
                self.session.zoom_in();
            }
            if ui.button("Zoom out").clicked() {
                self.session.zoom_out();
            }
            if ui.button("Reset view").clicked() {
                self.session.reset_view();
            }
        });
        ui.label(format!("zoom: {:.2}x", self.session.transform().zoom));

        ui.separator();
        ui.label(RichText::new("Layout").strong());
        let can_reset = self.session.generation() > 0;
        if ui
            .add_enabled(can_reset, egui::Button::new("Reset positions"))
            .on_hover_text("Spread nodes on a spiral and run the simulation again.")
            .clicked()
        {
            self.session.reset_positions();
        }
        ui.small("Drag a node to move it. Drag empty space to pan, scroll to zoom.");
    }
}
