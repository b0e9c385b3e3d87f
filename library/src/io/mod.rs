pub mod output_path;
pub mod png_export;
