use std::sync::Arc;

use mrm_nodes::nodes::prompt_selector::{
    InMemoryStateStore, PromptSelector, SelectionPolicy, SelectorStateStore, UPDATE_TOPIC,
};
use mrm_nodes::ui::RecordingUiChannel;
use mrm_nodes::{
    ExecutionContext, NodeConfig, NodeInputs, NodeValue, Reexecution, create_node_registry_with_store,
};

const TYPE_ID: &str = "text.prompt_selector";
const WORDS: &str = "sunset\ndawn\nnoon\nmidnight";

struct Harness {
    registry: mrm_nodes::NodeRegistry,
    ui: Arc<RecordingUiChannel>,
    store: Arc<InMemoryStateStore>,
}

fn harness(policy: SelectionPolicy) -> Harness {
    let config = NodeConfig {
        selection_policy: policy,
        ..NodeConfig::default()
    };
    let ui = Arc::new(RecordingUiChannel::new());
    let store = Arc::new(InMemoryStateStore::new());
    let registry = create_node_registry_with_store(&config, ui.clone(), store.clone());
    Harness { registry, ui, store }
}

fn inputs(words: &str, auto: bool, index: i64) -> NodeInputs {
    NodeInputs::new()
        .with("prompt", NodeValue::string("A lovely REPLACE_WORD"))
        .with("word_to_replace", NodeValue::string("REPLACE_WORD"))
        .with("replacement_words", NodeValue::string(words))
        .with(
            "auto_increment",
            NodeValue::string(if auto { "enabled" } else { "disabled" }),
        )
        .with("selected_index", NodeValue::Integer(index))
}

impl Harness {
    fn run(&self, node: &str, inputs: NodeInputs) -> (String, String) {
        let out = self
            .registry
            .execute(TYPE_ID, &ExecutionContext::for_node(node), inputs)
            .expect("selector run");
        match out.as_slice() {
            [NodeValue::String(prompt), NodeValue::String(word)] => (prompt.clone(), word.clone()),
            other => panic!("unexpected outputs {:?}", other),
        }
    }

    fn last_pushed(&self) -> Option<i64> {
        self.ui
            .messages()
            .last()
            .and_then(|m| m.payload["selected_index"].as_i64())
    }
}

#[test]
fn auto_increment_scenario() {
    let h = harness(SelectionPolicy::Decoupled);
    let (prompt, word) = h.run("5", inputs(WORDS, true, 0));
    assert_eq!(prompt, "A lovely sunset");
    assert_eq!(word, "sunset");
    assert_eq!(h.last_pushed(), Some(1));

    let message = h.ui.messages().pop().unwrap();
    assert_eq!(message.topic, UPDATE_TOPIC);
    assert_eq!(message.payload["node"], "5");
}

#[test]
fn manual_scenario_keeps_index() {
    let h = harness(SelectionPolicy::Decoupled);
    let (prompt, _) = h.run("5", inputs(WORDS, false, 2));
    assert_eq!(prompt, "A lovely noon");
    assert_eq!(h.last_pushed(), Some(2));
}

#[test]
fn blank_list_is_passthrough_without_push() {
    for policy in [SelectionPolicy::Decoupled, SelectionPolicy::UiAuthoritative] {
        let h = harness(policy);
        let (prompt, word) = h.run("5", inputs("   \n\n \t", true, 1));
        assert_eq!(prompt, "A lovely REPLACE_WORD");
        assert_eq!(word, "");
        assert!(h.ui.messages().is_empty());
    }
}

#[test]
fn huge_index_clamps_to_last() {
    let h = harness(SelectionPolicy::Decoupled);
    let (_, word) = h.run("5", inputs(WORDS, false, 999));
    assert_eq!(word, "midnight");
}

#[test]
fn any_index_stays_in_range() {
    for policy in [SelectionPolicy::Decoupled, SelectionPolicy::UiAuthoritative] {
        let h = harness(policy);
        for auto in [true, false] {
            for index in (-20..40).chain([i64::MIN, i64::MAX]) {
                let (_, word) = h.run("range", inputs(WORDS, auto, index));
                assert!(WORDS.lines().any(|w| w == word), "{} not in list", word);
            }
        }
    }
}

#[test]
fn following_the_pushed_index_is_pure_auto_increment() {
    let h = harness(SelectionPolicy::Decoupled);
    let mut ui_index = 0;
    let mut words = Vec::new();
    for _ in 0..6 {
        let (_, word) = h.run("5", inputs(WORDS, true, ui_index));
        words.push(word);
        ui_index = h.last_pushed().unwrap();
    }
    assert_eq!(
        words,
        vec!["sunset", "dawn", "noon", "midnight", "sunset", "dawn"]
    );
}

#[test]
fn edited_index_overrides_and_resumes_after_it() {
    let h = harness(SelectionPolicy::Decoupled);
    h.run("5", inputs(WORDS, true, 0));
    assert_eq!(h.last_pushed(), Some(1));

    // User types 3 into the widget instead of the pushed 1.
    let (_, word) = h.run("5", inputs(WORDS, true, 3));
    assert_eq!(word, "midnight");
    assert_eq!(h.last_pushed(), Some(0));

    let (_, word) = h.run("5", inputs(WORDS, true, 0));
    assert_eq!(word, "sunset");
}

#[test]
fn stale_ui_index_without_push_history_is_ignored() {
    let h = harness(SelectionPolicy::Decoupled);
    // Nothing pushed yet, so a non-zero widget value is not an edit.
    let (_, word) = h.run("5", inputs(WORDS, true, 2));
    assert_eq!(word, "sunset");
}

#[test]
fn changing_words_resets_cursor_and_override_tracking() {
    let h = harness(SelectionPolicy::Decoupled);
    h.run("5", inputs(WORDS, true, 0));
    h.run("5", inputs(WORDS, true, 1));
    let state = h.store.load("5").unwrap();
    assert_eq!(state.cursor_index, 2);

    // New list; the widget still shows 2, which must not count as an edit.
    let (_, word) = h.run("5", inputs("red\ngreen\nblue", true, 2));
    assert_eq!(word, "red");
    let state = h.store.load("5").unwrap();
    assert_eq!(state.cursor_index, 1);
    assert_eq!(state.last_pushed_ui_index, Some(1));
}

#[test]
fn manual_mode_has_no_drift() {
    let h = harness(SelectionPolicy::Decoupled);
    for _ in 0..5 {
        let (_, word) = h.run("5", inputs(WORDS, false, 1));
        assert_eq!(word, "dawn");
        assert_eq!(h.last_pushed(), Some(1));
    }
}

#[test]
fn switching_manual_to_auto_continues_from_manual_index() {
    let h = harness(SelectionPolicy::Decoupled);
    h.run("5", inputs(WORDS, false, 2));
    let (_, word) = h.run("5", inputs(WORDS, true, 2));
    assert_eq!(word, "noon");
    assert_eq!(h.last_pushed(), Some(3));
}

#[test]
fn ui_authoritative_always_uses_widget_value() {
    let h = harness(SelectionPolicy::UiAuthoritative);
    let (_, word) = h.run("5", inputs(WORDS, true, 2));
    assert_eq!(word, "noon");
    assert_eq!(h.last_pushed(), Some(3));

    let (_, word) = h.run("5", inputs(WORDS, true, 3));
    assert_eq!(word, "midnight");
    assert_eq!(h.last_pushed(), Some(0));

    let (_, word) = h.run("5", inputs(WORDS, true, 1));
    assert_eq!(word, "dawn");
    assert_eq!(h.store.load("5").unwrap().last_pushed_ui_index, None);
}

#[test]
fn nodes_keep_separate_state() {
    let h = harness(SelectionPolicy::Decoupled);
    h.run("a", inputs(WORDS, true, 0));
    h.run("a", inputs(WORDS, true, 1));
    let (_, word) = h.run("b", inputs(WORDS, true, 0));
    assert_eq!(word, "sunset");
    assert_eq!(h.store.len(), 2);
}

#[test]
fn registry_fills_declared_defaults() {
    let h = harness(SelectionPolicy::Decoupled);
    let out = h
        .registry
        .execute(TYPE_ID, &ExecutionContext::for_node("d"), NodeInputs::new())
        .unwrap();
    assert_eq!(
        out,
        vec![
            NodeValue::string("A beautiful landscape with sunset"),
            NodeValue::string("sunset"),
        ]
    );
}

#[test]
fn reexecution_contract() {
    let h = harness(SelectionPolicy::Decoupled);
    assert_eq!(
        h.registry.reexecution(TYPE_ID, inputs(WORDS, true, 0)).unwrap(),
        Reexecution::AlwaysReexecute
    );
    let a = h.registry.reexecution(TYPE_ID, inputs(WORDS, false, 1)).unwrap();
    let b = h.registry.reexecution(TYPE_ID, inputs(WORDS, false, 1)).unwrap();
    let c = h.registry.reexecution(TYPE_ID, inputs(WORDS, false, 2)).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn selector_can_be_used_without_registry() {
    let ui = Arc::new(RecordingUiChannel::new());
    let selector = PromptSelector::new(Arc::new(InMemoryStateStore::new()), ui.clone())
        .with_instance_id("standalone");
    let out = mrm_nodes::NodePlugin::execute(
        &selector,
        &ExecutionContext::anonymous(),
        &inputs(WORDS, true, 0),
    )
    .unwrap();
    assert_eq!(out[1], NodeValue::string("sunset"));
    assert_eq!(ui.messages()[0].payload["node"], "standalone");
}

#[test]
fn anonymous_nodes_do_not_share_state() {
    let h = harness(SelectionPolicy::Decoupled);
    let run_anonymous = |words: &str| {
        let out = h
            .registry
            .execute(TYPE_ID, &ExecutionContext::anonymous(), inputs(words, true, 0))
            .unwrap();
        let node = h.ui.messages().last().unwrap().payload["node"].clone();
        (out[1].clone(), node)
    };

    let mut nodes = Vec::new();
    for _ in 0..2 {
        let (word_a, node_a) = run_anonymous("a\nb\nc");
        let (word_b, node_b) = run_anonymous("x\ny");
        assert_eq!(word_a, NodeValue::string("a"));
        assert_eq!(word_b, NodeValue::string("x"));
        nodes.extend([node_a, node_b]);
    }
    nodes.sort_by_key(|n| n.to_string());
    nodes.dedup();
    assert_eq!(nodes.len(), 4);
    assert!(h.store.is_empty());
}
