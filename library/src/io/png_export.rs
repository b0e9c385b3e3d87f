use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use png::{BitDepth, ColorType, Compression, Encoder};

use crate::error::NodeError;
use crate::model::Image;

fn compression_for(level: u8) -> Compression {
    match level {
        0..=3 => Compression::Fast,
        4..=6 => Compression::Default,
        _ => Compression::Best,
    }
}

/// Writes an RGBA8 PNG with `(keyword, text)` metadata chunks. Latin-1 text
/// goes into `tEXt`, anything else into `iTXt`.
pub fn write_png(
    path: &Path,
    image: &Image,
    compress_level: u8,
    text_chunks: &[(String, String)],
) -> Result<(), NodeError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let mut encoder = Encoder::new(writer, image.width, image.height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(compression_for(compress_level));

    for (keyword, text) in text_chunks {
        if text.chars().all(|c| (c as u32) <= 0xFF) {
            encoder.add_text_chunk(keyword.clone(), text.clone())?;
        } else {
            encoder.add_itxt_chunk(keyword.clone(), text.clone())?;
        }
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&image.data)?;
    png_writer.finish()?;
    Ok(())
}
