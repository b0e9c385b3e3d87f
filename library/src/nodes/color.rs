use crate::error::NodeError;
use crate::model::{Color, NodeInputs, NodeOutputs, NodeValue};
use crate::plugin::node_types::{PinDataType, inp, int_inp, out};
use crate::plugin::{ExecutionContext, NodeCategory, NodePlugin, NodeTypeDefinition};

pub const TYPE_ID: &str = "drawing.color";

/// Builds an RGBA colour for the drawing nodes, plus its hex string.
pub struct ColorNode;

fn channel(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}

impl ColorNode {
    pub fn create_color(red: i64, green: i64, blue: i64, alpha: f64) -> (Color, String) {
        let alpha = (alpha.clamp(0.0, 1.0) * 255.0) as u8;
        let color = Color::rgba(channel(red), channel(green), channel(blue), alpha);
        (color, color.to_hex())
    }
}

impl NodePlugin for ColorNode {
    fn definition(&self) -> NodeTypeDefinition {
        NodeTypeDefinition::new(TYPE_ID, "MisterMR - Color", NodeCategory::Drawing)
            .with_inputs(vec![
                int_inp("red", "Red", 255, 0, 255),
                int_inp("green", "Green", 255, 0, 255),
                int_inp("blue", "Blue", 255, 0, 255),
                inp("alpha", "Alpha", PinDataType::Float)
                    .with_default(NodeValue::float(1.0))
                    .with_range(0.0, 1.0),
            ])
            .with_outputs(vec![
                out("color", "Color", PinDataType::Color),
                out("hex_color", "Hex Color", PinDataType::String),
            ])
    }

    fn execute(
        &self,
        _ctx: &ExecutionContext,
        inputs: &NodeInputs,
    ) -> Result<NodeOutputs, NodeError> {
        let (color, hex) = Self::create_color(
            inputs.integer("red")?,
            inputs.integer("green")?,
            inputs.integer("blue")?,
            inputs.float_or("alpha", 1.0),
        );
        Ok(vec![NodeValue::Color(color), NodeValue::String(hex)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_truncates_to_byte() {
        let (color, hex) = ColorNode::create_color(255, 128, 0, 0.5);
        assert_eq!(color, Color::rgba(255, 128, 0, 127));
        assert_eq!(hex, "#ff8000");
    }

    #[test]
    fn out_of_range_channels_clamp() {
        let (color, _) = ColorNode::create_color(-3, 300, 12, 7.0);
        assert_eq!(color, Color::rgba(0, 255, 12, 255));
    }
}
