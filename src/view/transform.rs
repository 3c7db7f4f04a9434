use eframe::egui::{Pos2, Rect, Vec2};

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 10.0;
pub const ZOOM_IN_FACTOR: f32 = 1.3;
pub const ZOOM_OUT_FACTOR: f32 = 0.7;

/// Screen placement of the world: `screen = rect.center() + pan + world * zoom`.
/// Never touches node positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub pan: Vec2,
    pub zoom: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl ViewTransform {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Scales about the canvas center, so the world point shown there stays put.
    pub fn zoom_by(&mut self, factor: f32) {
        let old = self.zoom;
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan *= self.zoom / old;
    }

    pub fn zoom_in(&mut self) {
        self.zoom_by(ZOOM_IN_FACTOR);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_by(ZOOM_OUT_FACTOR);
    }

    /// Scales about `pointer`, keeping the world point under it fixed.
    pub fn zoom_at(&mut self, rect: Rect, pointer: Pos2, factor: f32) {
        let world_before = self.screen_to_world(rect, pointer);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    pub fn world_to_screen(&self, rect: Rect, world: Vec2) -> Pos2 {
        rect.center() + self.pan + world * self.zoom
    }

    pub fn screen_to_world(&self, rect: Rect, screen: Pos2) -> Vec2 {
        (screen - rect.center() - self.pan) / self.zoom
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};
    use pretty_assertions::assert_eq;

    use super::*;

    fn canvas() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0))
    }

    #[test]
    fn zoom_is_clamped() {
        let mut transform = ViewTransform::default();
        for _ in 0..50 {
            transform.zoom_in();
        }
        assert_eq!(transform.zoom, MAX_ZOOM);

        for _ in 0..50 {
            transform.zoom_out();
        }
        assert_eq!(transform.zoom, MIN_ZOOM);
    }

    #[test]
    fn zoom_at_keeps_pointer_world_point() {
        let rect = canvas();
        let mut transform = ViewTransform {
            pan: vec2(30.0, -12.0),
            zoom: 1.5,
        };
        let pointer = pos2(620.0, 140.0);
        let before = transform.screen_to_world(rect, pointer);

        transform.zoom_at(rect, pointer, 1.3);

        let after = transform.screen_to_world(rect, pointer);
        assert!((before - after).length() < 1e-3);
    }

    #[test]
    fn button_zoom_keeps_canvas_center() {
        let rect = canvas();
        let mut transform = ViewTransform {
            pan: vec2(80.0, 40.0),
            zoom: 1.0,
        };
        let before = transform.screen_to_world(rect, rect.center());

        transform.zoom_out();

        let after = transform.screen_to_world(rect, rect.center());
        assert!((before - after).length() < 1e-3);
    }

    #[test]
    fn screen_and_world_round_trip() {
        let rect = canvas();
        let transform = ViewTransform {
            pan: vec2(-45.0, 10.0),
            zoom: 2.0,
        };
        let world = vec2(12.5, -80.0);

        let screen = transform.world_to_screen(rect, world);

        assert!((transform.screen_to_world(rect, screen) - world).length() < 1e-4);
    }

    #[test]
    fn reset_restores_identity() {
        let mut transform = ViewTransform::default();
        transform.pan_by(vec2(5.0, 5.0));
        transform.zoom_in();

        transform.reset();

        assert_eq!(transform, ViewTransform::default());
    }
}
