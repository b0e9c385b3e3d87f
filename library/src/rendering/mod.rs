pub mod compositing;
pub mod font;
pub mod shape_renderer;
pub mod skia_utils;
pub mod text_renderer;
