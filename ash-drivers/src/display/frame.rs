//! Panel-sized frames and address windows

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};

use super::rgb565::{self, ByteOrder};
use super::DisplayError;

/// Inclusive address window in controller units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

impl Window {
    /// Validate a window against a `width` x `height` panel
    pub fn new(
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        width: u16,
        height: u16,
    ) -> Result<Self, DisplayError> {
        if x0 > x1 || y0 > y1 || x1 >= width || y1 >= height {
            return Err(DisplayError::InvalidWindow {
                x0,
                y0,
                x1,
                y1,
                width,
                height,
            });
        }
        Ok(Self { x0, y0, x1, y1 })
    }

    /// The whole panel
    pub fn full(width: u16, height: u16) -> Result<Self, DisplayError> {
        Self::new(
            0,
            0,
            width.saturating_sub(1),
            height.saturating_sub(1),
            width,
            height,
        )
    }

    /// CASET parameters
    pub fn column_bytes(&self) -> [u8; 4] {
        let [a, b] = self.x0.to_be_bytes();
        let [c, d] = self.x1.to_be_bytes();
        [a, b, c, d]
    }

    /// RASET parameters
    pub fn row_bytes(&self) -> [u8; 4] {
        let [a, b] = self.y0.to_be_bytes();
        let [c, d] = self.y1.to_be_bytes();
        [a, b, c, d]
    }
}

/// A fully populated RGB888 frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pixels: RgbImage,
}

impl Frame {
    /// Solid-color frame
    pub fn solid(width: u16, height: u16, color: Rgb<u8>) -> Self {
        Self {
            pixels: RgbImage::from_pixel(u32::from(width), u32::from(height), color),
        }
    }

    /// Convert an image to RGB and fit it to `width` x `height`
    ///
    /// Returns the frame and whether resampling (Lanczos3) was needed.
    pub fn fit(image: &DynamicImage, width: u16, height: u16) -> (Self, bool) {
        let (w, h) = (u32::from(width), u32::from(height));
        let rgb = image.to_rgb8();
        if rgb.dimensions() == (w, h) {
            return (Self { pixels: rgb }, false);
        }
        let pixels = imageops::resize(&rgb, w, h, FilterType::Lanczos3);
        (Self { pixels }, true)
    }

    pub fn width(&self) -> u16 {
        self.pixels.width() as u16
    }

    pub fn height(&self) -> u16 {
        self.pixels.height() as u16
    }

    /// Interleaved RGB888 bytes, row-major
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Pixel at (x, y)
    pub fn pixel(&self, x: u16, y: u16) -> Option<Rgb<u8>> {
        let (x, y) = (u32::from(x), u32::from(y));
        if x >= self.pixels.width() || y >= self.pixels.height() {
            return None;
        }
        Some(*self.pixels.get_pixel(x, y))
    }

    /// RGB565 byte stream
    pub fn to_rgb565(&self, order: ByteOrder) -> Vec<u8> {
        rgb565::encode(self.as_raw(), order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_window() {
        let window = Window::full(480, 320).unwrap();
        assert_eq!(window.column_bytes(), [0x00, 0x00, 0x01, 0xDF]);
        assert_eq!(window.row_bytes(), [0x00, 0x00, 0x01, 0x3F]);
    }

    #[test]
    fn test_window_bounds() {
        assert!(Window::new(0, 0, 479, 319, 480, 320).is_ok());
        assert!(Window::new(0, 0, 480, 319, 480, 320).is_err());
        assert!(Window::new(10, 0, 9, 0, 480, 320).is_err());
        assert!(matches!(
            Window::full(0, 0),
            Err(DisplayError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_matching_image_not_resized() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 2, Rgb([1, 2, 3])));
        let (frame, resized) = Frame::fit(&image, 4, 2);
        assert!(!resized);
        assert_eq!(frame.pixel(3, 1), Some(Rgb([1, 2, 3])));
    }

    #[test]
    fn test_mismatched_image_resized() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([200, 100, 50])));
        let (frame, resized) = Frame::fit(&image, 4, 2);
        assert!(resized);
        assert_eq!((frame.width(), frame.height()), (4, 2));
        assert_eq!(frame.as_raw().len(), 4 * 2 * 3);
    }

    #[test]
    fn test_rgba_converted() {
        let image = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            2,
            2,
            image::Rgba([255, 0, 0, 128]),
        ));
        let (frame, _) = Frame::fit(&image, 2, 2);
        assert_eq!(frame.pixel(0, 0), Some(Rgb([255, 0, 0])));
    }

    #[test]
    fn test_solid_frame_stream() {
        let frame = Frame::solid(3, 1, Rgb([0, 255, 0]));
        assert_eq!(
            frame.to_rgb565(ByteOrder::BigEndian),
            vec![0x07, 0xE0, 0x07, 0xE0, 0x07, 0xE0]
        );
    }
}
