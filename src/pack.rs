use embedded_graphics_core::{geometry::Point, image::GetPixel};

use crate::color::{Darkness, Threshold};

/// Number of monochrome pixels packed into one byte
pub const PIXELS_PER_BYTE: u32 = 8;

/// Packs `width` x `height` pixels of `image` into `buffer`, row by row.
///
/// Each output byte holds [`PIXELS_PER_BYTE`] horizontally adjacent pixels, MSB first. A bit is
/// set when the pixel is at least as dark as `threshold`. Pixels the image doesn't have
/// (`GetPixel::pixel` returns `None`) count as white, so the trailing pixels of a row that
/// doesn't fill its last byte stay white as well.
///
/// `buffer` must hold `width.div_ceil(8) * height` bytes, anything after that is left alone.
/// An empty area leaves `buffer` untouched.
pub fn pack_into<I>(image: &I, threshold: Threshold, width: u32, height: u32, buffer: &mut [u8])
where
    I: GetPixel,
    I::Color: Darkness,
{
    if width == 0 || height == 0 {
        return;
    }
    let row_bytes = width.div_ceil(PIXELS_PER_BYTE) as usize;

    for (y, row) in buffer
        .chunks_exact_mut(row_bytes)
        .take(height as usize)
        .enumerate()
    {
        for (group, byte) in row.iter_mut().enumerate() {
            let x = group as u32 * PIXELS_PER_BYTE;
            // Start with white
            let mut pixel = 0x00;
            for px in 0..PIXELS_PER_BYTE.min(width - x) {
                let point = Point::new((x + px) as i32, y as i32);
                let black = image
                    .pixel(point)
                    .is_some_and(|color| threshold.is_black(color.darkness()));
                if black {
                    pixel |= 0x80 >> px;
                }
            }
            *byte = pixel;
        }
    }
}
