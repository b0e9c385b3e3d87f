//! Node registry: registers node plugins and dispatches host invocations.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, warn};

use crate::error::NodeError;
use crate::model::{NodeInputs, NodeOutputs};
use crate::plugin::node_types::{NodeTypeDefinition, PinRequirement};
use crate::plugin::traits::{ExecutionContext, NodePlugin, Reexecution};
use crate::util::timing::ScopedTimer;

struct RegisteredNode {
    definition: NodeTypeDefinition,
    plugin: Arc<dyn NodePlugin>,
}

#[derive(Default)]
struct NodeRepository {
    nodes: HashMap<String, RegisteredNode>,
    order: Vec<String>,
}

/// Main node registry.
pub struct NodeRegistry {
    inner: RwLock<NodeRepository>,
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(NodeRepository::default()),
        }
    }

    pub fn register(&self, plugin: Arc<dyn NodePlugin>) {
        let definition = plugin.definition();
        let type_id = definition.type_id.clone();
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if inner.nodes.contains_key(&type_id) {
            warn!("NodeRegistry: replacing node type '{}'", type_id);
        } else {
            inner.order.push(type_id.clone());
        }
        debug!("NodeRegistry: registered '{}'", type_id);
        inner
            .nodes
            .insert(type_id, RegisteredNode { definition, plugin });
    }

    /// Definitions in registration order.
    pub fn definitions(&self) -> Vec<NodeTypeDefinition> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .order
            .iter()
            .filter_map(|id| inner.nodes.get(id).map(|n| n.definition.clone()))
            .collect()
    }

    pub fn definition(&self, type_id: &str) -> Option<NodeTypeDefinition> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.nodes.get(type_id).map(|n| n.definition.clone())
    }

    /// `(type_id, display_name)` pairs, as the host's name mapping.
    pub fn display_names(&self) -> Vec<(String, String)> {
        self.definitions()
            .into_iter()
            .map(|d| (d.type_id, d.display_name))
            .collect()
    }

    fn lookup(&self, type_id: &str) -> Result<(NodeTypeDefinition, Arc<dyn NodePlugin>), NodeError> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .nodes
            .get(type_id)
            .map(|n| (n.definition.clone(), n.plugin.clone()))
            .ok_or_else(|| NodeError::UnknownNode(type_id.to_string()))
    }

    /// Fills declared defaults for absent inputs and checks required ones.
    fn resolve_inputs(
        definition: &NodeTypeDefinition,
        mut inputs: NodeInputs,
    ) -> Result<NodeInputs, NodeError> {
        for pin in &definition.inputs {
            if inputs.get(&pin.name).is_some() {
                continue;
            }
            match (&pin.default_value, pin.requirement) {
                (Some(default), PinRequirement::Required | PinRequirement::Optional) => {
                    inputs.insert(&pin.name, default.clone());
                }
                (None, PinRequirement::Required) => {
                    return Err(NodeError::MissingInput(pin.name.clone()));
                }
                _ => {}
            }
        }
        Ok(inputs)
    }

    pub fn execute(
        &self,
        type_id: &str,
        ctx: &ExecutionContext,
        inputs: NodeInputs,
    ) -> Result<NodeOutputs, NodeError> {
        let (definition, plugin) = self.lookup(type_id)?;
        let inputs = Self::resolve_inputs(&definition, inputs)?;
        let _timer = ScopedTimer::debug_lazy(|| {
            format!("NodeRegistry: '{}' (node {:?})", type_id, ctx.node_id)
        });
        let outputs = plugin.execute(ctx, &inputs)?;
        if outputs.len() != definition.outputs.len() {
            return Err(NodeError::InvalidArgument(format!(
                "node '{}' returned {} outputs, expected {}",
                type_id,
                outputs.len(),
                definition.outputs.len()
            )));
        }
        Ok(outputs)
    }

    pub fn reexecution(&self, type_id: &str, inputs: NodeInputs) -> Result<Reexecution, NodeError> {
        let (definition, plugin) = self.lookup(type_id)?;
        let inputs = Self::resolve_inputs(&definition, inputs)?;
        Ok(plugin.reexecution(&inputs))
    }
}
