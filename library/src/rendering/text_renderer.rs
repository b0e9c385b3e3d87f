use skia_safe::{Canvas, Font, Paint};

use crate::model::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justification {
    #[default]
    Left,
    Center,
    Right,
}

impl Justification {
    pub const OPTIONS: [&'static str; 3] = ["left", "center", "right"];

    /// Unknown values fall back to left.
    pub fn parse(value: &str) -> Self {
        match value {
            "center" => Justification::Center,
            "right" => Justification::Right,
            _ => Justification::Left,
        }
    }

    /// Left edge of a line `line_width` wide inside `[x, x + width]`.
    pub fn line_x(self, x: f32, width: f32, line_width: f32) -> f32 {
        match self {
            Justification::Left => x,
            Justification::Center => x + ((width - line_width) / 2.0).floor(),
            Justification::Right => x + width - line_width,
        }
    }
}

/// Box the text block is laid out in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Draws `text` line by line: each line justified horizontally, the whole
/// block centred vertically.
pub fn draw_text_block(
    canvas: &Canvas,
    text: &str,
    font: &Font,
    color: Color,
    area: TextBox,
    justification: Justification,
) {
    let lines: Vec<&str> = text.split('\n').collect();
    let (line_height, metrics) = font.metrics();
    let block_height =
        line_height * (lines.len() as f32 - 1.0) + (metrics.descent - metrics.ascent);
    let top = area.y + ((area.height - block_height) / 2.0).floor();

    let mut paint = Paint::default();
    paint.set_anti_alias(true);
    paint.set_color(color.to_skia());

    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let (advance, _) = font.measure_str(line, Some(&paint));
        let x = justification.line_x(area.x, area.width, advance);
        let baseline = top - metrics.ascent + line_height * i as f32;
        canvas.draw_str(line, (x, baseline), font, &paint);
    }
}
