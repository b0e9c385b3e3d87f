use skia_safe::images::raster_from_data;
use skia_safe::surfaces;
use skia_safe::{AlphaType, BlendMode, ColorType, Data, ISize, Image as SkImage, ImageInfo, Paint, Surface};

use crate::error::NodeError;
use crate::model::Image;

fn rgba_info(width: u32, height: u32) -> ImageInfo {
    ImageInfo::new(
        ISize::new(width as i32, height as i32),
        ColorType::RGBA8888,
        AlphaType::Unpremul,
        None,
    )
}

pub fn create_raster_surface(width: u32, height: u32) -> Result<Surface, NodeError> {
    let info = ImageInfo::new_n32_premul((width as i32, height as i32), None);
    surfaces::raster(&info, None, None)
        .ok_or_else(|| NodeError::Render(format!("Cannot create {}x{} Skia surface", width, height)))
}

pub fn image_to_skia(image: &Image) -> Result<SkImage, NodeError> {
    let sk_data = Data::new_copy(image.data.as_slice());
    raster_from_data(&rgba_info(image.width, image.height), sk_data, (image.width * 4) as usize)
        .ok_or_else(|| NodeError::Render("Failed to create Skia image".to_string()))
}

/// Raster surface holding a copy of `image`, ready to draw on.
pub fn surface_from_image(image: &Image) -> Result<Surface, NodeError> {
    let mut surface = create_raster_surface(image.width, image.height)?;
    let sk_image = image_to_skia(image)?;
    let mut paint = Paint::default();
    paint.set_blend_mode(BlendMode::Src);
    surface.canvas().draw_image(&sk_image, (0.0, 0.0), Some(&paint));
    Ok(surface)
}

pub fn surface_to_image(surface: &mut Surface, width: u32, height: u32) -> Result<Image, NodeError> {
    let row_bytes = (width * 4) as usize;
    let mut buffer = vec![0u8; (height as usize) * row_bytes];
    if !surface.read_pixels(&rgba_info(width, height), &mut buffer, row_bytes, (0, 0)) {
        return Err(NodeError::Render(
            "Failed to read surface pixels".to_string(),
        ));
    }
    Ok(Image {
        width,
        height,
        data: buffer,
    })
}

/// Runs `draw` on a copy of `image` and reads the result back.
pub fn draw_on_copy<F>(image: &Image, draw: F) -> Result<Image, NodeError>
where
    F: FnOnce(&skia_safe::Canvas) -> Result<(), NodeError>,
{
    let mut surface = surface_from_image(image)?;
    draw(surface.canvas())?;
    surface_to_image(&mut surface, image.width, image.height)
}
