use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use codegraph_view::graph::NodeKind;

pub(super) fn kind_color(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::File => Color32::from_rgb(0xFF, 0x6B, 0x6B),
        NodeKind::Class => Color32::from_rgb(0x4E, 0xCD, 0xC4),
        NodeKind::Interface => Color32::from_rgb(0x00, 0xCE, 0xD1),
        NodeKind::Method => Color32::from_rgb(0x45, 0xB7, 0xD1),
        NodeKind::Function => Color32::from_rgb(0x96, 0xCE, 0xB4),
        NodeKind::Variable => Color32::from_rgb(0xFE, 0xCA, 0x57),
        NodeKind::Import => Color32::from_rgb(0xDD, 0xA0, 0xDD),
        NodeKind::Module => Color32::from_rgb(0x98, 0xD8, 0xC8),
        NodeKind::Package => Color32::from_rgb(0xFF, 0xB6, 0xC1),
        NodeKind::Other => Color32::from_rgb(0xCC, 0xCC, 0xCC),
    }
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

/// Outline of the disk the layout keeps free nodes inside.
pub(super) fn draw_boundary(painter: &Painter, center: Pos2, radius: f32) {
    painter.circle_stroke(
        center,
        radius,
        Stroke::new(1.0, Color32::from_rgba_unmultiplied(90, 104, 120, 60)),
    );
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

/// Cheap bounding-box test; an edge may be drawn when only its box overlaps.
pub(super) fn segment_may_be_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}
