//! Minimal host: runs a JSON workflow through the node registry.
//!
//! ```json
//! { "runs": 3,
//!   "steps": [
//!     { "node": "text.prompt_selector", "id": "1",
//!       "inputs": { "replacement_words": "sunset\ndawn" } },
//!     { "node": "utils.log", "inputs": { "text": { "from": 0 } } } ] }
//! ```
//!
//! Steps without an `id` are keyed as `step-<index>`. Inputs of the form
//! `{"image_path": ..}` load an image file; `{"from": step, "output": n}` link
//! to an earlier step's output in the same run.

use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

use log::{debug, info};
use mrm_nodes::model::value::InputFingerprint;
use mrm_nodes::nodes::prompt_selector::UPDATE_TOPIC;
use mrm_nodes::ui::{TokioUiChannel, UiMessage};
use mrm_nodes::{
    ExecutionContext, Image, NodeError, NodeInputs, NodeOutputs, NodeValue, Reexecution,
    create_node_registry, load_config,
};
use serde::Deserialize;
use serde_json::Value;

fn one() -> u32 {
    1
}

#[derive(Deserialize)]
struct Workflow {
    #[serde(default = "one")]
    runs: u32,
    steps: Vec<Step>,
}

#[derive(Deserialize)]
struct Step {
    node: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    inputs: serde_json::Map<String, Value>,
}

impl Step {
    /// Graph node id; steps without one are keyed by position.
    fn node_id(&self, index: usize) -> String {
        self.id.clone().unwrap_or_else(|| format!("step-{}", index))
    }
}

fn resolve_input(value: &Value, outputs: &[NodeOutputs]) -> Result<NodeValue, NodeError> {
    if let Some(path) = value.get("image_path").and_then(Value::as_str) {
        return Ok(NodeValue::image(Image::open(path)?));
    }
    if let Some(step) = value.get("from").and_then(Value::as_u64) {
        let index = value.get("output").and_then(Value::as_u64).unwrap_or(0);
        return outputs
            .get(step as usize)
            .and_then(|out| out.get(index as usize))
            .cloned()
            .ok_or_else(|| {
                NodeError::InvalidArgument(format!("no output {} on step {}", index, step))
            });
    }
    Ok(NodeValue::from_json(value.clone()))
}

/// The host persists the index a selector pushes into its widget.
fn apply_ui_message(message: &UiMessage, steps: &[Step], widgets: &mut HashMap<usize, NodeInputs>) {
    if message.topic != UPDATE_TOPIC {
        return;
    }
    let node = message.payload["node"].as_str();
    let Some(index) = message.payload["selected_index"].as_i64() else {
        return;
    };
    for (i, step) in steps.iter().enumerate() {
        if node == Some(step.node_id(i).as_str()) {
            debug!("widget selected_index of step {} -> {}", i, index);
            widgets
                .entry(i)
                .or_default()
                .insert("selected_index", NodeValue::Integer(index));
        }
    }
}

fn main() -> Result<(), NodeError> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| NodeError::InvalidArgument("usage: mrm-nodes <workflow.json>".into()))?;
    let workflow: Workflow = serde_json::from_str(&fs::read_to_string(&path)?)?;

    let config = load_config();
    let (channel, mut ui_rx) = TokioUiChannel::new();
    let registry = create_node_registry(&config, Arc::new(channel));

    let mut widgets: HashMap<usize, NodeInputs> = HashMap::new();
    let mut cache: HashMap<usize, (InputFingerprint, NodeOutputs)> = HashMap::new();

    for run in 1..=workflow.runs {
        let mut outputs: Vec<NodeOutputs> = Vec::with_capacity(workflow.steps.len());
        for (i, step) in workflow.steps.iter().enumerate() {
            let mut inputs = NodeInputs::new();
            for (name, value) in &step.inputs {
                inputs.insert(name, resolve_input(value, &outputs)?);
            }
            if let Some(overrides) = widgets.get(&i) {
                for (name, value) in overrides.iter() {
                    inputs.insert(name, value.clone());
                }
            }

            let reexecution = registry.reexecution(&step.node, inputs.clone())?;
            let cached = cache
                .get(&i)
                .filter(|(previous, _)| !reexecution.should_run(Some(previous)))
                .map(|(_, result)| result.clone());
            let result = match cached {
                Some(result) => {
                    info!("run {} step {}: inputs unchanged, reusing outputs", run, i);
                    result
                }
                None => {
                    let ctx = ExecutionContext::for_node(step.node_id(i));
                    registry.execute(&step.node, &ctx, inputs)?
                }
            };
            match reexecution {
                Reexecution::ReexecuteIfChanged(fingerprint) => {
                    cache.insert(i, (fingerprint, result.clone()));
                }
                Reexecution::AlwaysReexecute => {
                    cache.remove(&i);
                }
            }

            let shown: Vec<Value> = result.iter().map(NodeValue::to_json).collect();
            println!("[run {}] {} -> {}", run, step.node, Value::Array(shown));
            outputs.push(result);
        }

        while let Ok(message) = ui_rx.try_recv() {
            apply_ui_message(&message, &workflow.steps, &mut widgets);
        }
    }
    Ok(())
}
