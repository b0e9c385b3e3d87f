pub mod manager;
pub mod node_types;
pub mod traits;

pub use manager::NodeRegistry;
pub use node_types::{NodeCategory, NodeTypeDefinition, PinDataType, PinDefinition};
pub use traits::{ExecutionContext, NodePlugin, Reexecution};
