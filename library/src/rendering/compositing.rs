//! Logo compositing on top of a frame.

use image::imageops::{self, FilterType};

use crate::error::NodeError;
use crate::model::Image;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoPlacement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
    pub preserve_aspect_ratio: bool,
    /// Multiplies the logo's alpha, `0.0..=1.0`.
    pub opacity: f64,
}

/// Target size for a `logo_width × logo_height` logo in a `width × height` box.
/// With aspect preservation the logo fits inside the box.
pub fn fit_logo_size(
    logo_width: u32,
    logo_height: u32,
    width: u32,
    height: u32,
    preserve_aspect_ratio: bool,
) -> (u32, u32) {
    if !preserve_aspect_ratio || logo_width == 0 || logo_height == 0 {
        return (width.max(1), height.max(1));
    }
    let aspect = logo_width as f64 / logo_height as f64;
    let (mut new_width, mut new_height) = (width, height);
    if width as f64 / height.max(1) as f64 > aspect {
        new_width = (height as f64 * aspect) as u32;
    } else {
        new_height = (width as f64 / aspect) as u32;
    }
    (new_width.max(1), new_height.max(1))
}

pub fn composite_logo(base: &Image, logo: &Image, placement: &LogoPlacement) -> Result<Image, NodeError> {
    let mut canvas = base.to_rgba_image()?;
    let logo_rgba = logo.to_rgba_image()?;

    let (width, height) = fit_logo_size(
        logo.width,
        logo.height,
        placement.width,
        placement.height,
        placement.preserve_aspect_ratio,
    );
    let mut resized = imageops::resize(&logo_rgba, width, height, FilterType::Lanczos3);

    let opacity = placement.opacity.clamp(0.0, 1.0);
    if opacity < 1.0 {
        for pixel in resized.pixels_mut() {
            pixel[3] = (pixel[3] as f64 * opacity) as u8;
        }
    }

    imageops::overlay(&mut canvas, &resized, placement.x, placement.y);
    Ok(Image::from(canvas))
}
