use std::sync::Arc;

use log::error;
use skia_safe::Font;

use crate::error::NodeError;
use crate::model::{Color, NodeInputs, NodeOutputs, NodeValue};
use crate::plugin::node_types::{PinDataType, inp, int_inp, out, placement_inputs};
use crate::plugin::{ExecutionContext, NodeCategory, NodePlugin, NodeTypeDefinition};
use crate::rendering::font::FontResolver;
use crate::rendering::skia_utils::draw_on_copy;
use crate::rendering::text_renderer::{Justification, TextBox, draw_text_block};

pub const TYPE_ID: &str = "drawing.add_single_text";

pub struct AddSingleTextNode {
    fonts: Arc<FontResolver>,
}

impl AddSingleTextNode {
    pub fn new(fonts: Arc<FontResolver>) -> Self {
        Self { fonts }
    }
}

impl NodePlugin for AddSingleTextNode {
    fn definition(&self) -> NodeTypeDefinition {
        let mut inputs = vec![
            inp("image", "Image", PinDataType::Image),
            inp("text", "Text", PinDataType::String)
                .multiline()
                .with_default(NodeValue::string("Sample Text")),
        ];
        inputs.extend(placement_inputs(300, 100));
        inputs.extend([
            inp("justification", "Justification", PinDataType::Enum)
                .with_options(&Justification::OPTIONS),
            int_inp("font_size", "Font Size", 32, 8, 256),
            inp("font_family", "Font Family", PinDataType::String)
                .with_default(NodeValue::string("Arial")),
            inp("text_color", "Text Color", PinDataType::Color)
                .with_default(NodeValue::string("#ffffff")),
        ]);
        NodeTypeDefinition::new(TYPE_ID, "MisterMR - Text", NodeCategory::Drawing)
            .with_inputs(inputs)
            .with_outputs(vec![out("image", "Image", PinDataType::Image)])
    }

    fn execute(
        &self,
        _ctx: &ExecutionContext,
        inputs: &NodeInputs,
    ) -> Result<NodeOutputs, NodeError> {
        let image = inputs.first_image("image")?;
        let text = inputs.string_or("text", "");
        let font_size = inputs.integer_or("font_size", 32).clamp(8, 256) as f32;
        let family = inputs.string_or("font_family", "Arial");
        let color = inputs.color("text_color").unwrap_or(Color::WHITE);
        let justification = Justification::parse(inputs.string_or("justification", "left"));
        let area = TextBox {
            x: inputs.integer_or("x", 0) as f32,
            y: inputs.integer_or("y", 0) as f32,
            width: inputs.integer_or("width", 300).max(1) as f32,
            height: inputs.integer_or("height", 100).max(1) as f32,
        };

        let Some(typeface) = self.fonts.typeface(family) else {
            error!("AddSingleText: no usable font for '{}', image unchanged", family);
            return Ok(vec![NodeValue::image(image.clone())]);
        };
        let font = Font::from_typeface(typeface, font_size);

        match draw_on_copy(image, |canvas| {
            draw_text_block(canvas, text, &font, color, area, justification);
            Ok(())
        }) {
            Ok(result) => Ok(vec![NodeValue::image(result)]),
            Err(e) => {
                error!("Error drawing text: {}", e);
                Ok(vec![NodeValue::image(image.clone())])
            }
        }
    }
}
