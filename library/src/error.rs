use thiserror::Error;

#[derive(Error, Debug)]
pub enum NodeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("PNG encoding error: {0}")]
    Png(#[from] png::EncodingError),
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Rendering error: {0}")]
    Render(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Missing input '{0}'")]
    MissingInput(String),
    #[error("Unknown node type '{0}'")]
    UnknownNode(String),
    #[error("No node identifier available for '{0}'")]
    MissingNodeIdentifier(String),
    #[error("UI push failed: {0}")]
    UiPush(String),
}
