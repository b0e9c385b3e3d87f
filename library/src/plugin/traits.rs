//! Core node plugin traits.

use crate::error::NodeError;
use crate::model::value::InputFingerprint;
use crate::model::{NodeInputs, NodeOutputs};
use crate::plugin::node_types::NodeTypeDefinition;

/// Per-invocation data the host supplies alongside the inputs.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    /// Stable identifier of the graph node being executed, if the host has one.
    pub node_id: Option<String>,
}

impl ExecutionContext {
    pub fn for_node(node_id: impl Into<String>) -> Self {
        Self {
            node_id: Some(node_id.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Signal to the host's memoization layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reexecution {
    /// Run on every graph execution, whatever the inputs.
    AlwaysReexecute,
    /// Skip when the fingerprint equals the one from the previous run.
    ReexecuteIfChanged(InputFingerprint),
}

impl Reexecution {
    /// Whether the host must run the node given the fingerprint it cached last time.
    pub fn should_run(&self, previous: Option<&InputFingerprint>) -> bool {
        match self {
            Reexecution::AlwaysReexecute => true,
            Reexecution::ReexecuteIfChanged(current) => previous != Some(current),
        }
    }
}

/// A node the host graph can invoke.
pub trait NodePlugin: Send + Sync {
    fn definition(&self) -> NodeTypeDefinition;

    fn execute(
        &self,
        ctx: &ExecutionContext,
        inputs: &NodeInputs,
    ) -> Result<NodeOutputs, NodeError>;

    fn reexecution(&self, inputs: &NodeInputs) -> Reexecution {
        Reexecution::ReexecuteIfChanged(inputs.fingerprint())
    }
}
