use eframe::egui::{self, Rect, Ui};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.session.transform_mut().zoom_at(rect, pointer, zoom_factor);
    }

    /// Primary drag on a node moves it, primary drag on empty canvas pans.
    /// Secondary and middle drags always pan.
    pub(in crate::app) fn handle_graph_pointer(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        let transform = *self.session.transform();

        // Grab whatever was under the press, not under the pointer once the
        // drag threshold was crossed.
        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(pointer) = ui
                .input(|input| input.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos())
        {
            self.session.drag_start(transform.screen_to_world(rect, pointer));
        }

        if response.dragged_by(egui::PointerButton::Primary) {
            if self.session.is_dragging() {
                if let Some(pointer) = response.interact_pointer_pos() {
                    self.session.drag_to(transform.screen_to_world(rect, pointer));
                }
            } else {
                self.session.transform_mut().pan_by(response.drag_delta());
            }
        }

        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.session.transform_mut().pan_by(response.drag_delta());
        }

        if response.drag_stopped() && self.session.is_dragging() {
            self.session.drag_end();
        }

        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            self.session.click(transform.screen_to_world(rect, pointer));
        }

        let hover = response
            .hover_pos()
            .map(|pointer| transform.screen_to_world(rect, pointer));
        self.session.hover(hover);
    }
}
