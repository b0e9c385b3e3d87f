pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod nodes;
pub mod plugin;
pub mod rendering;
pub mod ui;
pub mod util;

use std::sync::Arc;

pub use config::{NodeConfig, load_config};
pub use error::NodeError;
pub use model::{Color, Image, NodeInputs, NodeOutputs, NodeValue};
pub use plugin::{ExecutionContext, NodePlugin, NodeRegistry, Reexecution};

use crate::io::output_path::CounterPathProvider;
use crate::nodes::prompt_selector::{InMemoryStateStore, SelectorStateStore};
use crate::nodes::{
    AddLogoNode, AddSingleObjectNode, AddSingleTextNode, ColorNode, LogNode, PromptSelector,
    SaveImageAndTextNode,
};
use crate::rendering::font::FontResolver;
use crate::ui::UiChannel;

/// Registry with every built-in node, wired to `ui` and a fresh selector state store.
pub fn create_node_registry(config: &NodeConfig, ui: Arc<dyn UiChannel>) -> NodeRegistry {
    create_node_registry_with_store(config, ui, Arc::new(InMemoryStateStore::new()))
}

pub fn create_node_registry_with_store(
    config: &NodeConfig,
    ui: Arc<dyn UiChannel>,
    store: Arc<dyn SelectorStateStore>,
) -> NodeRegistry {
    let registry = NodeRegistry::new();
    let fonts = Arc::new(FontResolver::new(
        &config.extra_font_dirs,
        config.font_cache_size,
    ));
    let paths = Arc::new(CounterPathProvider::new(config.output_dir.clone()));

    registry.register(Arc::new(
        PromptSelector::new(store, ui)
            .with_selection_policy(config.selection_policy)
            .with_identifier_policy(config.identifier_policy),
    ));
    registry.register(Arc::new(ColorNode));
    registry.register(Arc::new(AddSingleObjectNode));
    registry.register(Arc::new(AddSingleTextNode::new(fonts)));
    registry.register(Arc::new(AddLogoNode));
    registry.register(Arc::new(LogNode));
    registry.register(Arc::new(SaveImageAndTextNode::new(
        paths,
        config.compress_level,
    )));
    registry
}
