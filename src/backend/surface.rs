//! 2D raster drawing surface

use image::{Rgb, RgbImage};

use super::{BackendError, Viewport};

const BLANK: Rgb<u8> = Rgb([255, 255, 255]);

/// RGB raster a page is rendered into.
///
/// Resizing clears the contents, so a failed render leaves a blank page
/// rather than a stale one at the wrong size.
#[derive(Clone, Debug)]
pub struct Surface {
    image: RgbImage,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl Surface {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, BLANK),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Resize to the viewport's pixel dimensions and clear
    pub fn resize_to(&mut self, viewport: &Viewport) {
        self.image = RgbImage::from_pixel(viewport.width_px, viewport.height_px, BLANK);
    }

    /// Pixel at (x, y), or `None` outside the surface
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        if x < self.width() && y < self.height() {
            self.image.put_pixel(x, y, Rgb(rgb));
        }
    }

    pub fn fill(&mut self, rgb: [u8; 3]) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgb(rgb);
        }
    }

    /// Blit packed samples (`channels` bytes per pixel, `stride` bytes per row)
    /// into the surface, clipped to its current size. Only the first three
    /// channels are used.
    pub fn blit_samples(
        &mut self,
        samples: &[u8],
        width: u32,
        height: u32,
        stride: usize,
        channels: usize,
    ) -> Result<(), BackendError> {
        if channels < 3 {
            return Err(BackendError::generic(format!(
                "Unsupported pixmap format: {channels} channels"
            )));
        }
        let row_len = width as usize * channels;
        if stride < row_len || samples.len() < stride * height as usize {
            return Err(BackendError::generic("Pixmap buffer size mismatch"));
        }

        let rows = height.min(self.height()) as usize;
        let cols = width.min(self.width()) as usize;
        for (y, row) in samples.chunks(stride).take(rows).enumerate() {
            for (x, px) in row[..cols * channels].chunks_exact(channels).enumerate() {
                self.image
                    .put_pixel(x as u32, y as u32, Rgb([px[0], px[1], px[2]]));
            }
        }
        Ok(())
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_clears_to_white() {
        let mut surface = Surface::new(2, 2);
        surface.fill([0, 0, 0]);

        surface.resize_to(&Viewport {
            scale: 1.0,
            width_px: 3,
            height_px: 1,
        });

        assert_eq!((surface.width(), surface.height()), (3, 1));
        assert_eq!(surface.pixel(2, 0), Some([255, 255, 255]));
        assert_eq!(surface.pixel(0, 1), None);
    }

    #[test]
    fn copies_rgba_samples_with_padding() {
        // 2x2 RGBA with 2 bytes of row padding
        let samples = [
            1, 2, 3, 255, 4, 5, 6, 255, 0, 0, //
            7, 8, 9, 255, 10, 11, 12, 255, 0, 0,
        ];
        let mut surface = Surface::new(2, 2);
        surface.blit_samples(&samples, 2, 2, 10, 4).unwrap();

        assert_eq!(surface.pixel(0, 0), Some([1, 2, 3]));
        assert_eq!(surface.pixel(1, 1), Some([10, 11, 12]));
    }

    #[test]
    fn blit_clips_to_surface() {
        let samples = [9u8; 3 * 3 * 3];
        let mut surface = Surface::new(2, 1);
        surface.blit_samples(&samples, 3, 3, 9, 3).unwrap();

        assert_eq!(surface.pixel(1, 0), Some([9, 9, 9]));
        assert_eq!((surface.width(), surface.height()), (2, 1));
    }

    #[test]
    fn rejects_short_buffers() {
        let mut surface = Surface::new(2, 2);
        assert!(surface.blit_samples(&[0; 5], 2, 2, 6, 3).is_err());
    }
}
