use chrono::{DateTime, Local};
use log::info;

use crate::error::NodeError;
use crate::model::{NodeInputs, NodeOutputs, NodeValue};
use crate::plugin::node_types::{PinDataType, inp, out};
use crate::plugin::{ExecutionContext, NodeCategory, NodePlugin, NodeTypeDefinition};

pub const TYPE_ID: &str = "utils.log";

/// Logs a timestamped message and passes `any_input` through untouched.
pub struct LogNode;

/// `yyyy-MM-dd HH.mm.ss.fff`
pub fn format_log_line(now: DateTime<Local>, text: &str) -> String {
    format!("{} - {}", now.format("%Y-%m-%d %H.%M.%S%.3f"), text)
}

impl NodePlugin for LogNode {
    fn definition(&self) -> NodeTypeDefinition {
        NodeTypeDefinition::new(TYPE_ID, "MisterMR - Log", NodeCategory::Utils)
            .with_inputs(vec![
                inp("text", "Text", PinDataType::String)
                    .multiline()
                    .with_default(NodeValue::string("")),
                inp("any_input", "Any Input", PinDataType::Any).optional(),
            ])
            .with_outputs(vec![out("output", "Output", PinDataType::Any)])
    }

    fn execute(
        &self,
        _ctx: &ExecutionContext,
        inputs: &NodeInputs,
    ) -> Result<NodeOutputs, NodeError> {
        info!("{}", format_log_line(Local::now(), inputs.string_or("text", "")));
        let passthrough = inputs.get("any_input").cloned().unwrap_or(NodeValue::None);
        Ok(vec![passthrough])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_has_millisecond_precision() {
        let at = Local
            .with_ymd_and_hms(2024, 3, 9, 7, 5, 2)
            .unwrap()
            + chrono::Duration::milliseconds(42);
        assert_eq!(format_log_line(at, "hello"), "2024-03-09 07.05.02.042 - hello");
    }

    #[test]
    fn passes_input_through() {
        let inputs = NodeInputs::new()
            .with("text", NodeValue::string("x"))
            .with("any_input", NodeValue::Integer(5));
        let out = LogNode.execute(&ExecutionContext::anonymous(), &inputs).unwrap();
        assert_eq!(out, vec![NodeValue::Integer(5)]);

        let out = LogNode
            .execute(&ExecutionContext::anonymous(), &NodeInputs::new())
            .unwrap();
        assert_eq!(out, vec![NodeValue::None]);
    }
}
