use skia_safe::{Canvas, Paint, PaintStyle, Rect};

use crate::model::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Circle,
    Rect,
    RoundRect,
}

impl ShapeKind {
    pub const OPTIONS: [&'static str; 3] = ["circle", "rect", "round_rect"];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "circle" => Some(ShapeKind::Circle),
            "rect" => Some(ShapeKind::Rect),
            "round_rect" => Some(ShapeKind::RoundRect),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub border_size: f32,
    pub border_color: Color,
    pub fill: Option<Color>,
}

/// Corner radius for `round_rect`: a quarter of the short side, at most 20.
pub fn round_rect_radius(width: u32, height: u32) -> f32 {
    (width.min(height) / 4).min(20) as f32
}

fn draw_kind(canvas: &Canvas, kind: ShapeKind, bounds: Rect, radius: f32, paint: &Paint) {
    match kind {
        ShapeKind::Circle => {
            canvas.draw_oval(bounds, paint);
        }
        ShapeKind::Rect => {
            canvas.draw_rect(bounds, paint);
        }
        ShapeKind::RoundRect => {
            canvas.draw_round_rect(bounds, radius, radius, paint);
        }
    }
}

/// Fills, then strokes the border inside `bounds`.
pub fn draw_shape(canvas: &Canvas, kind: ShapeKind, bounds: Rect, style: &ShapeStyle) {
    let radius = round_rect_radius(bounds.width() as u32, bounds.height() as u32);

    if let Some(fill) = style.fill {
        let mut paint = Paint::default();
        paint.set_anti_alias(true);
        paint.set_style(PaintStyle::Fill);
        paint.set_color(fill.to_skia());
        draw_kind(canvas, kind, bounds, radius, &paint);
    }

    if style.border_size > 0.0 {
        let half = style.border_size / 2.0;
        let inner = bounds.with_inset((half, half));
        let mut paint = Paint::default();
        paint.set_anti_alias(true);
        paint.set_style(PaintStyle::Stroke);
        paint.set_stroke_width(style.border_size);
        paint.set_color(style.border_color.to_skia());
        draw_kind(canvas, kind, inner, (radius - half).max(0.0), &paint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_is_capped() {
        assert_eq!(round_rect_radius(400, 300), 20.0);
        assert_eq!(round_rect_radius(40, 100), 10.0);
        assert_eq!(round_rect_radius(3, 3), 0.0);
    }

    #[test]
    fn parses_object_types() {
        assert_eq!(ShapeKind::parse("round_rect"), Some(ShapeKind::RoundRect));
        assert_eq!(ShapeKind::parse("triangle"), None);
    }
}
