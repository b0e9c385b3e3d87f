use log::error;

use crate::error::NodeError;
use crate::model::{NodeInputs, NodeOutputs, NodeValue};
use crate::plugin::node_types::{PinDataType, inp, out, placement_inputs};
use crate::plugin::{ExecutionContext, NodeCategory, NodePlugin, NodeTypeDefinition};
use crate::rendering::compositing::{LogoPlacement, composite_logo};

pub const TYPE_ID: &str = "drawing.add_logo";

/// Pastes a resized, optionally faded logo onto the first frame.
pub struct AddLogoNode;

impl NodePlugin for AddLogoNode {
    fn definition(&self) -> NodeTypeDefinition {
        let mut inputs = vec![
            inp("image", "Image", PinDataType::Image),
            inp("logo", "Logo", PinDataType::Image),
        ];
        inputs.extend(placement_inputs(100, 100));
        inputs.extend([
            inp("preserve_aspect_ratio", "Preserve Aspect Ratio", PinDataType::Enum)
                .with_options(&["yes", "no"]),
            inp("opacity", "Opacity", PinDataType::Float)
                .with_default(NodeValue::float(1.0))
                .with_range(0.0, 1.0),
        ]);
        NodeTypeDefinition::new(TYPE_ID, "MisterMR - Logo", NodeCategory::Drawing)
            .with_inputs(inputs)
            .with_outputs(vec![out("image", "Image", PinDataType::Image)])
    }

    fn execute(
        &self,
        _ctx: &ExecutionContext,
        inputs: &NodeInputs,
    ) -> Result<NodeOutputs, NodeError> {
        let image = inputs.first_image("image")?;
        let logo = inputs.first_image("logo")?;
        let placement = LogoPlacement {
            x: inputs.integer_or("x", 0),
            y: inputs.integer_or("y", 0),
            width: inputs.integer_or("width", 100).clamp(1, 10000) as u32,
            height: inputs.integer_or("height", 100).clamp(1, 10000) as u32,
            preserve_aspect_ratio: inputs.switch_or("preserve_aspect_ratio", "yes", true),
            opacity: inputs.float_or("opacity", 1.0),
        };

        match composite_logo(image, logo, &placement) {
            Ok(result) => Ok(vec![NodeValue::image(result)]),
            Err(e) => {
                error!("Error adding logo: {}", e);
                Ok(vec![NodeValue::image(image.clone())])
            }
        }
    }
}
