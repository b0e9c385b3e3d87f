//! Output file naming. The host owns this; `CounterPathProvider` mirrors its
//! numbering scheme for standalone use.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::NodeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavePath {
    /// Absolute folder files are written to.
    pub folder: PathBuf,
    /// File name stem taken from the prefix.
    pub filename: String,
    /// First free counter value.
    pub counter: u32,
    /// Folder relative to the output root, `/`-separated, empty for the root.
    pub subfolder: String,
}

pub trait OutputPathProvider: Send + Sync {
    fn save_path(&self, prefix: &str, width: u32, height: u32) -> Result<SavePath, NodeError>;
}

pub struct CounterPathProvider {
    output_dir: PathBuf,
}

impl CounterPathProvider {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// Highest `<filename>_<digits>_…` counter already present in `folder`.
fn highest_counter(folder: &Path, filename: &str) -> Option<u32> {
    let stem = format!("{}_", filename);
    fs::read_dir(folder)
        .ok()?
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            let rest = name.strip_prefix(&stem)?;
            rest.split('_').next()?.parse::<u32>().ok()
        })
        .max()
}

impl OutputPathProvider for CounterPathProvider {
    fn save_path(&self, prefix: &str, width: u32, height: u32) -> Result<SavePath, NodeError> {
        let prefix = prefix
            .replace("%width%", &width.to_string())
            .replace("%height%", &height.to_string());
        let relative = Path::new(&prefix);

        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(NodeError::InvalidArgument(format!(
                "filename prefix '{}' must stay inside the output folder",
                prefix
            )));
        }

        let filename = relative
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .ok_or_else(|| NodeError::InvalidArgument("empty filename prefix".to_string()))?;
        let subfolder_path = relative.parent().unwrap_or(Path::new(""));
        let subfolder = subfolder_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");

        let folder = self.output_dir.join(subfolder_path);
        fs::create_dir_all(&folder)?;
        let counter = highest_counter(&folder, &filename).map_or(1, |c| c + 1);

        Ok(SavePath {
            folder,
            filename,
            counter,
            subfolder,
        })
    }
}
