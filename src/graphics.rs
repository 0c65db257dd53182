//! Graphics Support for the EPD
//!
//! [`Canvas`] is a full frame in panel format that embedded-graphics can draw on.
//! Hand its [`buffer`](Canvas::buffer) to
//! [`Epd7in5::display_frame`](crate::epd7in5_v2::Epd7in5::display_frame), no repacking needed.

use bit_field::BitField;
use embedded_graphics_core::{image::GetPixel, prelude::*};

use crate::color::Color;
use crate::epd7in5_v2::{BUFFER_LEN, DEFAULT_BACKGROUND_COLOR, HEIGHT, ROW_BYTES, WIDTH};
use crate::pack::PIXELS_PER_BYTE;
use crate::rect::Rect;

/// Display rotation, only 90° increments supported
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayRotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate by 90 degrees clockwise
    Rotate90,
    /// Rotate by 180 degrees clockwise
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

/// Display buffer used for drawing with embedded graphics
pub struct Canvas {
    buffer: [u8; BUFFER_LEN],
    rotation: DisplayRotation,
}

impl Default for Canvas {
    /// Initialize the canvas with the default background color (white)
    // inline is necessary here to allow heap allocation via Box on stack limited programs
    #[inline(always)]
    fn default() -> Self {
        Self {
            buffer: [DEFAULT_BACKGROUND_COLOR.get_byte_value(); BUFFER_LEN],
            rotation: DisplayRotation::default(),
        }
    }
}

/// For use with embedded_grahics
impl DrawTarget for Canvas {
    type Color = Color;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for pixel in pixels {
            self.set_pixel(pixel);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.buffer.fill(color.get_byte_value());
        Ok(())
    }
}

/// For use with embedded_grahics
impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        match self.rotation {
            DisplayRotation::Rotate0 | DisplayRotation::Rotate180 => Size::new(WIDTH, HEIGHT),
            DisplayRotation::Rotate90 | DisplayRotation::Rotate270 => Size::new(HEIGHT, WIDTH),
        }
    }
}

/// Lets a canvas be handed to [`Epd7in5::display_image`](crate::epd7in5_v2::Epd7in5::display_image)
/// like any other image, read in its current rotation
impl GetPixel for Canvas {
    type Color = Color;

    fn pixel(&self, point: Point) -> Option<Color> {
        self.get_pixel(point)
    }
}

impl Canvas {
    /// get internal buffer to use it (to draw in epd)
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Set the display rotation.
    ///
    /// This only concerns future drawing made to it. Anything aready drawn
    /// stays as it is in the buffer.
    pub fn set_rotation(&mut self, rotation: DisplayRotation) {
        self.rotation = rotation;
    }

    /// Get current rotation
    pub fn rotation(&self) -> DisplayRotation {
        self.rotation
    }

    /// Set a specific pixel color on this canvas, out of range pixels are ignored
    pub fn set_pixel(&mut self, pixel: Pixel<Color>) {
        let Pixel(point, color) = pixel;
        if let Some((index, bit)) = self.locate(point) {
            self.buffer[index].set_bit(bit, color == Color::Black);
        }
    }

    /// Color of a pixel in the current rotation
    pub fn get_pixel(&self, point: Point) -> Option<Color> {
        self.locate(point)
            .map(|(index, bit)| Color::from_packed(self.buffer[index], 7 - bit as u8))
    }

    // byte index and bit number of a rotated point
    fn locate(&self, point: Point) -> Option<(usize, usize)> {
        let (width, height) = (WIDTH as i32, HEIGHT as i32);
        // as i32 = never use more than 2 billion pixel per line or per column
        let (x, y) = match self.rotation {
            DisplayRotation::Rotate0 => (point.x, point.y),
            DisplayRotation::Rotate90 => (width - 1 - point.y, point.x),
            DisplayRotation::Rotate180 => (width - 1 - point.x, height - 1 - point.y),
            DisplayRotation::Rotate270 => (point.y, height - 1 - point.x),
        };

        // Out of range check
        if x < 0 || y < 0 || !Rect::new(0, 0, WIDTH, HEIGHT).contains(x as u32, y as u32) {
            return None;
        }

        let (x, y) = (x as u32, y as u32);
        let index = (x / PIXELS_PER_BYTE) as usize + y as usize * ROW_BYTES;
        let bit = 7 - (x % PIXELS_PER_BYTE) as usize;
        Some((index, bit))
    }
}
