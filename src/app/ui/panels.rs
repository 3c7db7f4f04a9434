use eframe::egui::{self, Align, Context, Key, Layout, RichText};

use super::super::ViewModel;

impl ViewModel {
    /// Top bar plus both side panels. The canvas goes into the central panel
    /// afterwards.
    pub(in crate::app) fn show_chrome(
        &mut self,
        ctx: &Context,
        graph_path: &mut String,
        load_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("codegraph-view");
                    ui.separator();

                    ui.label("graph:");
                    let path_response = ui.add(
                        egui::TextEdit::singleline(graph_path)
                            .hint_text("path/to/graph.json")
                            .desired_width(320.0),
                    );
                    let submitted = path_response.lost_focus()
                        && ui.input(|input| input.key_pressed(Key::Enter));
                    let load_button = ui.add_enabled(!is_loading, egui::Button::new("Load"));
                    if (load_button.clicked() || submitted) && !is_loading {
                        *load_requested = true;
                    }
                    if is_loading {
                        ui.spinner();
                    }

                    if self.session.generation() > 0 {
                        ui.separator();
                        self.draw_stats_summary(ui);
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(text) = self.simulation_text() {
                            ui.label(text);
                        }
                    });
                });

                if let Some(error) = &self.load_error {
                    ui.label(RichText::new(error).color(egui::Color32::from_rgb(240, 110, 100)));
                }
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));
    }

    fn draw_stats_summary(&self, ui: &mut egui::Ui) {
        let graph = self.session.graph();
        let stats = self.session.stats();

        if !graph.language.is_empty() {
            ui.label(format!("language: {}", graph.language));
        }
        ui.label(format!("nodes: {}", stats.total_nodes));
        ui.label(format!("edges: {}", stats.total_edges))
            .on_hover_text(
                stats
                    .edges_by_kind
                    .iter()
                    .map(|(kind, count)| format!("{kind}: {count}"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        ui.label(format!("avg degree: {:.2}", stats.average_degree));
        ui.label(format!("components: {}", stats.connected_components));
        if graph.dropped_edges > 0 {
            ui.label(format!("dropped edges: {}", graph.dropped_edges))
                .on_hover_text("Edges whose source or target is not in the graph.");
        }
    }

    fn simulation_text(&self) -> Option<String> {
        if self.session.generation() == 0 {
            return None;
        }

        let readout = self.tick_readout.get();
        let engine = self.session.engine();
        Some(format!(
            "{:?}  |  alpha {:.3}  |  ticks {}  |  motion {:.1}",
            engine.state(),
            engine.alpha(),
            readout.ticks,
            readout.kinetic_energy
        ))
    }
}
