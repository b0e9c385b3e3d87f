pub mod add_logo;
pub mod color;
pub mod draw_object;
pub mod draw_text;
pub mod log_node;
pub mod prompt_selector;
pub mod save_image_text;

pub use add_logo::AddLogoNode;
pub use color::ColorNode;
pub use draw_object::AddSingleObjectNode;
pub use draw_text::AddSingleTextNode;
pub use log_node::LogNode;
pub use prompt_selector::PromptSelector;
pub use save_image_text::SaveImageAndTextNode;
