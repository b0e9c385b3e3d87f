//! Prompt selector: substitutes one word from a list into a prompt template,
//! advancing through the list across runs.

mod policy;
mod state;

pub use policy::{IdentifierPolicy, Selection, SelectionPolicy, clamp_index};
pub use state::{InMemoryStateStore, SelectorState, SelectorStateStore, parse_replacement_words};

use std::sync::Arc;

use log::{debug, warn};
use serde::Serialize;
use uuid::Uuid;

use crate::error::NodeError;
use crate::model::{NodeInputs, NodeOutputs, NodeValue};
use crate::plugin::node_types::{PinDataType, int_inp, inp, out};
use crate::plugin::{ExecutionContext, NodeCategory, NodePlugin, NodeTypeDefinition, Reexecution};
use crate::ui::{UiChannel, UiMessage};

pub const TYPE_ID: &str = "text.prompt_selector";
pub const UPDATE_TOPIC: &str = "mrm.promptselector.update";

#[derive(Serialize)]
struct SelectorUpdate<'a> {
    node: &'a str,
    selected_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorRequest<'a> {
    pub prompt: &'a str,
    pub word_to_replace: &'a str,
    pub replacement_words: &'a str,
    pub auto_increment: bool,
    pub selected_index: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorResult {
    pub prompt: String,
    /// Empty when the word list is empty.
    pub word: String,
    /// Index sent to the UI, `None` when nothing was pushed or delivery failed.
    pub pushed_index: Option<usize>,
}

pub struct PromptSelector {
    store: Arc<dyn SelectorStateStore>,
    ui: Arc<dyn UiChannel>,
    selection_policy: SelectionPolicy,
    identifier_policy: IdentifierPolicy,
    instance_id: Option<String>,
}

/// Key the selector state lives under for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeKey {
    pub id: String,
    /// `false` for a token minted for this invocation only; its state is
    /// never written to the store.
    pub persistent: bool,
}

impl PromptSelector {
    pub fn new(store: Arc<dyn SelectorStateStore>, ui: Arc<dyn UiChannel>) -> Self {
        Self {
            store,
            ui,
            selection_policy: SelectionPolicy::default(),
            identifier_policy: IdentifierPolicy::default(),
            instance_id: None,
        }
    }

    pub fn with_selection_policy(mut self, policy: SelectionPolicy) -> Self {
        self.selection_policy = policy;
        self
    }

    pub fn with_identifier_policy(mut self, policy: IdentifierPolicy) -> Self {
        self.identifier_policy = policy;
        self
    }

    /// Identifier used when the host does not pass one.
    pub fn with_instance_id(mut self, id: impl Into<String>) -> Self {
        self.instance_id = Some(id.into());
        self
    }

    pub fn selection_policy(&self) -> SelectionPolicy {
        self.selection_policy
    }

    /// Host id, else instance id, else (lenient) a fresh one-shot token.
    /// One registered selector serves every graph node of its type, so a
    /// generated token is never reused across invocations.
    pub fn resolve_node_id(&self, host_id: Option<&str>) -> Result<NodeKey, NodeError> {
        if let Some(id) = host_id.filter(|id| !id.is_empty()) {
            return Ok(NodeKey {
                id: id.to_string(),
                persistent: true,
            });
        }
        if let Some(id) = &self.instance_id {
            debug!("PromptSelector: no host id, using instance id {}", id);
            return Ok(NodeKey {
                id: id.clone(),
                persistent: true,
            });
        }
        match self.identifier_policy {
            IdentifierPolicy::Strict => Err(NodeError::MissingNodeIdentifier(TYPE_ID.to_string())),
            IdentifierPolicy::Lenient => {
                let id = format!("prompt-selector-{}", Uuid::new_v4());
                warn!(
                    "PromptSelector: host supplied no node id, using one-shot id {}; \
                     selection will not advance between runs",
                    id
                );
                Ok(NodeKey {
                    id,
                    persistent: false,
                })
            }
        }
    }

    pub fn select(
        &self,
        host_id: Option<&str>,
        request: &SelectorRequest<'_>,
    ) -> Result<SelectorResult, NodeError> {
        let key = self.resolve_node_id(host_id)?;
        let node_id = key.id.as_str();
        let mut state = if key.persistent {
            self.store.load(node_id).unwrap_or_default()
        } else {
            SelectorState::default()
        };

        if state.sync_words(request.replacement_words) {
            debug!(
                "PromptSelector: node {} word list now has {} entries",
                node_id,
                state.words.len()
            );
        }

        if state.words.is_empty() {
            self.save_state(&key, state);
            return Ok(SelectorResult {
                prompt: request.prompt.to_string(),
                word: String::new(),
                pushed_index: None,
            });
        }

        let selection =
            self.selection_policy
                .select(&mut state, request.selected_index, request.auto_increment);
        let word = state.words[selection.use_index].clone();
        let prompt = request.prompt.replace(request.word_to_replace, &word);
        debug!(
            "PromptSelector: node {} using '{}' at {}, next {}",
            node_id, word, selection.use_index, selection.next_ui_index
        );

        let pushed_index = match self.push_index(node_id, selection.next_ui_index) {
            Ok(()) => {
                if self.selection_policy == SelectionPolicy::Decoupled {
                    state.last_pushed_ui_index = Some(selection.next_ui_index);
                }
                Some(selection.next_ui_index)
            }
            Err(e) => {
                warn!("PromptSelector: could not update UI for node {}: {}", node_id, e);
                None
            }
        };

        self.save_state(&key, state);
        Ok(SelectorResult {
            prompt,
            word,
            pushed_index,
        })
    }

    fn save_state(&self, key: &NodeKey, state: SelectorState) {
        if key.persistent {
            self.store.save(&key.id, state);
        }
    }

    fn push_index(&self, node_id: &str, selected_index: usize) -> Result<(), NodeError> {
        let message = UiMessage::new(
            UPDATE_TOPIC,
            &SelectorUpdate {
                node: node_id,
                selected_index,
            },
        )?;
        self.ui.send(message)
    }
}

impl NodePlugin for PromptSelector {
    fn definition(&self) -> NodeTypeDefinition {
        use PinDataType::*;
        NodeTypeDefinition::new(TYPE_ID, "MisterMR - Prompt Selector", NodeCategory::Text)
            .with_description("Replaces a placeholder word with the next entry of a word list")
            .with_inputs(vec![
                inp("prompt", "Prompt", String)
                    .multiline()
                    .with_default(NodeValue::string("A beautiful landscape with REPLACE_WORD")),
                inp("word_to_replace", "Word To Replace", String)
                    .with_default(NodeValue::string("REPLACE_WORD")),
                inp("replacement_words", "Replacement Words", String)
                    .multiline()
                    .with_default(NodeValue::string("sunset\ndawn\nnoon\nmidnight")),
                inp("auto_increment", "Auto Increment", Enum).with_options(&["enabled", "disabled"]),
                int_inp("selected_index", "Selected Index", 0, 0, 100),
            ])
            .with_outputs(vec![
                out("prompt", "Prompt", String),
                out("word", "Word", String),
            ])
            .as_output_node()
    }

    fn execute(
        &self,
        ctx: &ExecutionContext,
        inputs: &NodeInputs,
    ) -> Result<NodeOutputs, NodeError> {
        let request = SelectorRequest {
            prompt: inputs.string("prompt")?,
            word_to_replace: inputs.string("word_to_replace")?,
            replacement_words: inputs.string("replacement_words")?,
            auto_increment: inputs.switch_or("auto_increment", "enabled", true),
            selected_index: inputs.integer_or("selected_index", 0),
        };
        let result = self.select(ctx.node_id.as_deref(), &request)?;
        Ok(vec![
            NodeValue::String(result.prompt),
            NodeValue::String(result.word),
        ])
    }

    fn reexecution(&self, inputs: &NodeInputs) -> Reexecution {
        if inputs.switch_or("auto_increment", "enabled", true) {
            Reexecution::AlwaysReexecute
        } else {
            Reexecution::ReexecuteIfChanged(inputs.fingerprint())
        }
    }
}
