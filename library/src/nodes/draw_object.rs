use log::{error, warn};
use skia_safe::Rect;

use crate::error::NodeError;
use crate::model::{Color, NodeInputs, NodeOutputs, NodeValue};
use crate::plugin::node_types::{PinDataType, inp, int_inp, out, placement_inputs};
use crate::plugin::{ExecutionContext, NodeCategory, NodePlugin, NodeTypeDefinition, Reexecution};
use crate::rendering::shape_renderer::{ShapeKind, ShapeStyle, draw_shape};
use crate::rendering::skia_utils::draw_on_copy;

pub const TYPE_ID: &str = "drawing.add_single_object";

/// Draws one circle, rectangle or rounded rectangle onto the first frame.
pub struct AddSingleObjectNode;

impl NodePlugin for AddSingleObjectNode {
    fn definition(&self) -> NodeTypeDefinition {
        let mut inputs = vec![inp("image", "Image", PinDataType::Image)];
        inputs.extend(placement_inputs(100, 100));
        inputs.extend([
            inp("object_type", "Object Type", PinDataType::Enum)
                .with_options(&ShapeKind::OPTIONS),
            int_inp("border_size", "Border Size", 2, 0, 100),
            inp("border_color", "Border Color", PinDataType::Color)
                .with_default(NodeValue::string("#ffffff")),
            inp("show_fill", "Show Fill", PinDataType::Enum).with_options(&["yes", "no"]),
            inp("fill_color", "Fill Color", PinDataType::Color)
                .with_default(NodeValue::string("#000000"))
                .optional(),
        ]);
        NodeTypeDefinition::new(TYPE_ID, "MisterMR - Object", NodeCategory::Drawing)
            .with_inputs(inputs)
            .with_outputs(vec![out("image", "Image", PinDataType::Image)])
    }

    fn execute(
        &self,
        _ctx: &ExecutionContext,
        inputs: &NodeInputs,
    ) -> Result<NodeOutputs, NodeError> {
        let image = inputs.first_image("image")?;
        let object_type = inputs.string_or("object_type", "circle");
        let Some(kind) = ShapeKind::parse(object_type) else {
            warn!("AddSingleObject: unknown object type '{}', image unchanged", object_type);
            return Ok(vec![NodeValue::image(image.clone())]);
        };

        let show_fill = inputs.switch_or("show_fill", "yes", true);
        let style = ShapeStyle {
            border_size: inputs.integer_or("border_size", 2).max(0) as f32,
            border_color: inputs.color("border_color").unwrap_or(Color::WHITE),
            fill: inputs.color("fill_color").filter(|_| show_fill),
        };
        let bounds = Rect::from_xywh(
            inputs.integer_or("x", 0) as f32,
            inputs.integer_or("y", 0) as f32,
            inputs.integer_or("width", 100).max(1) as f32,
            inputs.integer_or("height", 100).max(1) as f32,
        );

        match draw_on_copy(image, |canvas| {
            draw_shape(canvas, kind, bounds, &style);
            Ok(())
        }) {
            Ok(result) => Ok(vec![NodeValue::image(result)]),
            Err(e) => {
                error!("Error drawing object: {}", e);
                Ok(vec![NodeValue::image(image.clone())])
            }
        }
    }

    fn reexecution(&self, _inputs: &NodeInputs) -> Reexecution {
        Reexecution::AlwaysReexecute
    }
}
