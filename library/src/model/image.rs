use std::path::Path;

use image::RgbaImage;

use crate::error::NodeError;

/// RGBA8 frame with straight (unpremultiplied) alpha.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Image {
    pub fn new(width: u32, height: u32, fill: crate::model::Color) -> Self {
        let pixel = [fill.r, fill.g, fill.b, fill.a];
        let data = pixel
            .iter()
            .copied()
            .cycle()
            .take((width as usize) * (height as usize) * 4)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let rgba = image::open(path.as_ref())?.to_rgba8();
        Ok(Self::from(rgba))
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(offset..offset + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn to_rgba_image(&self) -> Result<RgbaImage, NodeError> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
            NodeError::InvalidArgument(format!(
                "image buffer of {} bytes does not match {}x{}",
                self.data.len(),
                self.width,
                self.height
            ))
        })
    }
}

impl From<RgbaImage> for Image {
    fn from(rgba: RgbaImage) -> Self {
        Self {
            width: rgba.width(),
            height: rgba.height(),
            data: rgba.into_raw(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Color;

    #[test]
    fn pixel_reads_rgba_and_rejects_out_of_bounds() {
        let image = Image::new(3, 2, Color::rgba(1, 2, 3, 4));
        assert_eq!(image.pixel(2, 1), Some([1, 2, 3, 4]));
        assert_eq!(image.pixel(3, 0), None);
        assert_eq!(image.pixel(0, 2), None);
    }

    #[test]
    fn pixel_offset_does_not_overflow_on_huge_frames() {
        // Header only: 100k x 100k pixels would need 40 GB of data.
        let image = Image {
            width: 100_000,
            height: 100_000,
            data: Vec::new(),
        };
        assert_eq!(image.pixel(70_000, 70_000), None);
    }
}
