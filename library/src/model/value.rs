//! Values flowing through node pins.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use serde_json::{Value, json};

use crate::error::NodeError;
use crate::model::{Color, Image};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeValue {
    None,
    String(String),
    Integer(i64),
    Float(OrderedFloat<f64>),
    Boolean(bool),
    Color(Color),
    /// Image batch; drawing nodes work on the first frame.
    Image(Vec<Image>),
    Json(Value),
}

impl NodeValue {
    pub fn string(value: impl Into<String>) -> Self {
        NodeValue::String(value.into())
    }

    pub fn float(value: f64) -> Self {
        NodeValue::Float(OrderedFloat(value))
    }

    pub fn image(image: Image) -> Self {
        NodeValue::Image(vec![image])
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            NodeValue::None => "none",
            NodeValue::String(_) => "string",
            NodeValue::Integer(_) => "integer",
            NodeValue::Float(_) => "float",
            NodeValue::Boolean(_) => "boolean",
            NodeValue::Color(_) => "color",
            NodeValue::Image(_) => "image",
            NodeValue::Json(_) => "json",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NodeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NodeValue::Integer(i) => Some(*i),
            NodeValue::Float(f) => Some(f.0 as i64),
            NodeValue::Boolean(b) => Some(*b as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NodeValue::Float(f) => Some(f.0),
            NodeValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Scalar JSON maps onto the matching variant; arrays and objects stay JSON.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => NodeValue::None,
            Value::Bool(b) => NodeValue::Boolean(b),
            Value::String(s) => NodeValue::String(s),
            Value::Number(n) => match n.as_i64() {
                Some(i) => NodeValue::Integer(i),
                None => NodeValue::float(n.as_f64().unwrap_or_default()),
            },
            other => NodeValue::Json(other),
        }
    }

    /// JSON summary for display; image batches are reduced to their sizes.
    pub fn to_json(&self) -> Value {
        match self {
            NodeValue::None => Value::Null,
            NodeValue::String(s) => json!(s),
            NodeValue::Integer(i) => json!(i),
            NodeValue::Float(f) => json!(f.0),
            NodeValue::Boolean(b) => json!(b),
            NodeValue::Color(c) => json!({
                "hex": c.to_hex(),
                "rgba": [c.r, c.g, c.b, c.a],
            }),
            NodeValue::Image(frames) => Value::Array(
                frames
                    .iter()
                    .map(|f| json!({ "width": f.width, "height": f.height }))
                    .collect(),
            ),
            NodeValue::Json(v) => v.clone(),
        }
    }
}

pub type NodeOutputs = Vec<NodeValue>;

/// Literal input values in name order; the host compares these between runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputFingerprint(pub Vec<(String, NodeValue)>);

/// Named inputs resolved by the host for one invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeInputs {
    values: BTreeMap<String, NodeValue>,
}

impl NodeInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: NodeValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: NodeValue) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&NodeValue> {
        self.values
            .get(name)
            .filter(|value| !matches!(value, NodeValue::None))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn fingerprint(&self) -> InputFingerprint {
        InputFingerprint(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    fn required(&self, name: &str) -> Result<&NodeValue, NodeError> {
        self.get(name)
            .ok_or_else(|| NodeError::MissingInput(name.to_string()))
    }

    fn mismatch(name: &str, expected: &str, found: &NodeValue) -> NodeError {
        NodeError::InvalidArgument(format!(
            "input '{}' expected {}, found {}",
            name,
            expected,
            found.type_name()
        ))
    }

    pub fn string(&self, name: &str) -> Result<&str, NodeError> {
        let value = self.required(name)?;
        value
            .as_str()
            .ok_or_else(|| Self::mismatch(name, "string", value))
    }

    pub fn string_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).and_then(NodeValue::as_str).unwrap_or(default)
    }

    pub fn integer(&self, name: &str) -> Result<i64, NodeError> {
        let value = self.required(name)?;
        value
            .as_i64()
            .ok_or_else(|| Self::mismatch(name, "integer", value))
    }

    pub fn integer_or(&self, name: &str, default: i64) -> i64 {
        self.get(name).and_then(NodeValue::as_i64).unwrap_or(default)
    }

    pub fn float_or(&self, name: &str, default: f64) -> f64 {
        self.get(name).and_then(NodeValue::as_f64).unwrap_or(default)
    }

    /// Two-valued switch: a boolean, or a string compared against `on`
    /// (e.g. `"enabled"`, `"yes"`).
    pub fn switch_or(&self, name: &str, on: &str, default: bool) -> bool {
        match self.get(name) {
            Some(NodeValue::Boolean(b)) => *b,
            Some(NodeValue::String(s)) => s.eq_ignore_ascii_case(on),
            Some(NodeValue::Integer(i)) => *i != 0,
            _ => default,
        }
    }

    /// Colour value or colour string. Absent → `None`; malformed → white.
    pub fn color(&self, name: &str) -> Option<Color> {
        match self.get(name)? {
            NodeValue::Color(c) => Some(*c),
            NodeValue::String(s) => Some(Color::parse_or_white(s)),
            NodeValue::Json(v) => Some(color_from_json(v)),
            _ => Some(Color::WHITE),
        }
    }

    pub fn images(&self, name: &str) -> Result<&[Image], NodeError> {
        match self.required(name)? {
            NodeValue::Image(frames) => Ok(frames),
            other => Err(Self::mismatch(name, "image", other)),
        }
    }

    pub fn first_image(&self, name: &str) -> Result<&Image, NodeError> {
        self.images(name)?
            .first()
            .ok_or_else(|| NodeError::InvalidArgument(format!("input '{}' is an empty batch", name)))
    }

    pub fn json(&self, name: &str) -> Option<Value> {
        self.get(name).map(NodeValue::to_json)
    }
}

/// Colour objects from other node packs: `{"rgba": [..]}` or `{"hex": .., "a": 0..1}`.
fn color_from_json(value: &Value) -> Color {
    if let Some(rgba) = value.get("rgba").and_then(Value::as_array) {
        let channel = |i: usize| {
            rgba.get(i)
                .and_then(Value::as_u64)
                .map(|c| c.min(255) as u8)
        };
        if let (Some(r), Some(g), Some(b)) = (channel(0), channel(1), channel(2)) {
            return Color::rgba(r, g, b, channel(3).unwrap_or(255));
        }
    }
    if let Some(hex) = value.get("hex").and_then(Value::as_str) {
        let base = Color::parse_or_white(hex);
        return match value.get("a").and_then(Value::as_f64) {
            Some(alpha) => base.with_alpha((alpha.clamp(0.0, 1.0) * 255.0) as u8),
            None => base,
        };
    }
    Color::WHITE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_counts_as_absent() {
        let inputs = NodeInputs::new().with("text", NodeValue::None);
        assert!(matches!(inputs.string("text"), Err(NodeError::MissingInput(_))));
        assert_eq!(inputs.string_or("text", "fallback"), "fallback");
    }

    #[test]
    fn type_mismatch_is_invalid_argument() {
        let inputs = NodeInputs::new().with("x", NodeValue::string("ten"));
        assert!(matches!(inputs.integer("x"), Err(NodeError::InvalidArgument(_))));
    }

    #[test]
    fn switch_accepts_strings_and_booleans() {
        let inputs = NodeInputs::new()
            .with("a", NodeValue::string("enabled"))
            .with("b", NodeValue::string("disabled"))
            .with("c", NodeValue::Boolean(true));
        assert!(inputs.switch_or("a", "enabled", false));
        assert!(!inputs.switch_or("b", "enabled", true));
        assert!(inputs.switch_or("c", "enabled", false));
        assert!(inputs.switch_or("missing", "enabled", true));
    }

    #[test]
    fn color_objects_from_json() {
        let inputs = NodeInputs::new()
            .with("rgba", NodeValue::Json(json!({ "rgba": [1, 2, 3, 4] })))
            .with("hex", NodeValue::Json(json!({ "hex": "#102030", "a": 0.5 })))
            .with("junk", NodeValue::Json(json!({ "nope": true })));
        assert_eq!(inputs.color("rgba"), Some(Color::rgba(1, 2, 3, 4)));
        assert_eq!(inputs.color("hex"), Some(Color::rgba(16, 32, 48, 127)));
        assert_eq!(inputs.color("junk"), Some(Color::WHITE));
        assert_eq!(inputs.color("absent"), None);
    }

    #[test]
    fn fingerprint_is_order_independent() {
        let a = NodeInputs::new()
            .with("x", NodeValue::Integer(1))
            .with("y", NodeValue::string("a"));
        let b = NodeInputs::new()
            .with("y", NodeValue::string("a"))
            .with("x", NodeValue::Integer(1));
        assert_eq!(a.fingerprint(), b.fingerprint());
        let c = b.with("x", NodeValue::Integer(2));
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn json_numbers_prefer_integers() {
        assert_eq!(NodeValue::from_json(json!(3)), NodeValue::Integer(3));
        assert_eq!(NodeValue::from_json(json!(0.5)), NodeValue::float(0.5));
        assert_eq!(NodeValue::from_json(json!(null)), NodeValue::None);
    }
}
