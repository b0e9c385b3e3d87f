//! Node type definitions: the declared input/output schema of each node.

use crate::model::NodeValue;

/// Category of a node type, shown as `MisterMR/<category>` in the host menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    /// Shapes, text, logos, colours
    Drawing,
    /// Prompt/string manipulation
    Text,
    /// Logging and passthrough helpers
    Utils,
    /// File output
    Io,
}

impl std::fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NodeCategory::Drawing => "MisterMR/Drawing",
            NodeCategory::Text => "MisterMR/Text",
            NodeCategory::Utils => "MisterMR/Utils",
            NodeCategory::Io => "MisterMR/IO",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinDataType {
    Image,
    Integer,
    Float,
    Boolean,
    Color,
    String,
    /// One of a fixed list of string options
    Enum,
    /// Arbitrary JSON supplied by the host (prompt graph, png info)
    Json,
    /// Wildcard, accepts anything
    Any,
}

/// How the host supplies an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinRequirement {
    Required,
    Optional,
    /// Filled in by the host itself (node id, prompt graph, ...)
    Hidden,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PinDefinition {
    pub name: String,
    pub display_name: String,
    pub data_type: PinDataType,
    pub requirement: PinRequirement,
    pub default_value: Option<NodeValue>,
    /// Inclusive numeric range for integer/float widgets
    pub range: Option<(f64, f64)>,
    pub options: Vec<String>,
    pub multiline: bool,
}

impl PinDefinition {
    pub fn new(name: &str, display_name: &str, data_type: PinDataType) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            data_type,
            requirement: PinRequirement::Required,
            default_value: None,
            range: None,
            options: Vec::new(),
            multiline: false,
        }
    }

    pub fn with_default(mut self, value: NodeValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        if self.default_value.is_none() {
            self.default_value = options.first().map(|o| NodeValue::string(*o));
        }
        self
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.requirement = PinRequirement::Optional;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.requirement = PinRequirement::Hidden;
        self
    }
}

/// Definition of a node type, registered in the `NodeRegistry`.
#[derive(Debug, Clone)]
pub struct NodeTypeDefinition {
    /// Unique type identifier (e.g. "text.prompt_selector")
    pub type_id: String,
    /// Human-readable name (e.g. "MisterMR - Prompt Selector")
    pub display_name: String,
    pub category: NodeCategory,
    pub description: String,
    pub inputs: Vec<PinDefinition>,
    pub outputs: Vec<PinDefinition>,
    /// Output nodes are always scheduled by the host even when nothing consumes them.
    pub output_node: bool,
}

impl NodeTypeDefinition {
    pub fn new(type_id: &str, display_name: &str, category: NodeCategory) -> Self {
        Self {
            type_id: type_id.to_string(),
            display_name: display_name.to_string(),
            category,
            description: String::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            output_node: false,
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    pub fn with_inputs(mut self, inputs: Vec<PinDefinition>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_outputs(mut self, outputs: Vec<PinDefinition>) -> Self {
        self.outputs = outputs;
        self
    }

    pub fn as_output_node(mut self) -> Self {
        self.output_node = true;
        self
    }

    pub fn input(&self, name: &str) -> Option<&PinDefinition> {
        self.inputs.iter().find(|pin| pin.name == name)
    }
}

// ---------------------------------------------------------------------------
// Pin helpers
// ---------------------------------------------------------------------------

pub(crate) fn inp(name: &str, display: &str, dt: PinDataType) -> PinDefinition {
    PinDefinition::new(name, display, dt)
}

pub(crate) fn out(name: &str, display: &str, dt: PinDataType) -> PinDefinition {
    PinDefinition::new(name, display, dt)
}

/// Integer input with default and inclusive range.
pub(crate) fn int_inp(name: &str, display: &str, default: i64, min: i64, max: i64) -> PinDefinition {
    inp(name, display, PinDataType::Integer)
        .with_default(NodeValue::Integer(default))
        .with_range(min as f64, max as f64)
}

/// Position and size inputs shared by the drawing nodes.
pub(crate) fn placement_inputs(default_width: i64, default_height: i64) -> Vec<PinDefinition> {
    vec![
        int_inp("x", "X", 0, 0, 10000),
        int_inp("y", "Y", 0, 0, 10000),
        int_inp("width", "Width", default_width, 1, 10000),
        int_inp("height", "Height", default_height, 1, 10000),
    ]
}
