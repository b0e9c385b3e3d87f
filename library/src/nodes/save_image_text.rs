use std::fs;
use std::sync::Arc;

use log::info;
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::NodeError;
use crate::io::output_path::OutputPathProvider;
use crate::io::png_export::write_png;
use crate::model::{NodeInputs, NodeOutputs, NodeValue};
use crate::plugin::node_types::{PinDataType, inp, out};
use crate::plugin::{ExecutionContext, NodeCategory, NodePlugin, NodeTypeDefinition};
use crate::util::timing::ScopedTimer;

pub const TYPE_ID: &str = "io.save_image_and_text";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedImage {
    pub filename: String,
    pub subfolder: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Saves every frame as PNG and, when given non-blank text, a `.txt` sidecar
/// with the same base name.
pub struct SaveImageAndTextNode {
    paths: Arc<dyn OutputPathProvider>,
    compress_level: u8,
}

impl SaveImageAndTextNode {
    pub fn new(paths: Arc<dyn OutputPathProvider>, compress_level: u8) -> Self {
        Self {
            paths,
            compress_level: compress_level.min(9),
        }
    }

    /// `prompt` plus one chunk per top-level `extra_pnginfo` key.
    fn metadata(prompt: Option<Value>, extra_pnginfo: Option<Value>) -> Vec<(String, String)> {
        let mut chunks = Vec::new();
        if let Some(prompt) = prompt {
            chunks.push(("prompt".to_string(), prompt.to_string()));
        }
        if let Some(Value::Object(extra)) = extra_pnginfo {
            for (key, value) in extra {
                chunks.push((key, value.to_string()));
            }
        }
        chunks
    }

    pub fn save(
        &self,
        inputs: &NodeInputs,
    ) -> Result<Vec<SavedImage>, NodeError> {
        let frames = inputs.images("image")?;
        let first = inputs.first_image("image")?;
        let prefix = inputs.string_or("filename_prefix", "ComfyUI");
        let text = inputs
            .get("text")
            .and_then(NodeValue::as_str)
            .filter(|t| !t.trim().is_empty());
        let chunks = Self::metadata(inputs.json("prompt"), inputs.json("extra_pnginfo"));

        let _timer = ScopedTimer::debug_lazy(|| format!("SaveImageAndText '{}'", prefix));
        let target = self.paths.save_path(prefix, first.width, first.height)?;
        let mut counter = target.counter;
        let mut results = Vec::with_capacity(frames.len());

        for (batch_index, frame) in frames.iter().enumerate() {
            let base = if batch_index == 0 {
                format!("{}_{:05}_", target.filename, counter)
            } else {
                format!("{}_{:05}_{:02}_", target.filename, counter, batch_index)
            };

            let image_filename = format!("{}.png", base);
            write_png(
                &target.folder.join(&image_filename),
                frame,
                self.compress_level,
                &chunks,
            )?;

            if let Some(text) = text {
                fs::write(target.folder.join(format!("{}.txt", base)), text)?;
            }

            info!("Saved {}", target.folder.join(&image_filename).display());
            results.push(SavedImage {
                filename: image_filename,
                subfolder: target.subfolder.clone(),
                kind: "output".to_string(),
            });
            counter += 1;
        }
        Ok(results)
    }
}

impl NodePlugin for SaveImageAndTextNode {
    fn definition(&self) -> NodeTypeDefinition {
        NodeTypeDefinition::new(TYPE_ID, "MisterMR - Save Image + Text", NodeCategory::Io)
            .with_inputs(vec![
                inp("image", "Image", PinDataType::Image),
                inp("filename_prefix", "Filename Prefix", PinDataType::String)
                    .with_default(NodeValue::string("ComfyUI")),
                inp("text", "Text", PinDataType::String).multiline().optional(),
                inp("prompt", "Prompt", PinDataType::Json).hidden(),
                inp("extra_pnginfo", "Extra PNG Info", PinDataType::Json).hidden(),
            ])
            .with_outputs(vec![out("ui", "UI", PinDataType::Json)])
            .as_output_node()
    }

    fn execute(
        &self,
        _ctx: &ExecutionContext,
        inputs: &NodeInputs,
    ) -> Result<NodeOutputs, NodeError> {
        let saved = self.save(inputs)?;
        Ok(vec![NodeValue::Json(json!({
            "ui": { "images": serde_json::to_value(saved)? }
        }))])
    }
}
