//! B/W Color for EPDs and the darkness measure used to binarize other colors

use bit_field::BitField;
use embedded_graphics_core::pixelcolor::raw::RawU1;
use embedded_graphics_core::pixelcolor::{
    Bgr555, Bgr565, Bgr666, Bgr888, BinaryColor, Gray2, Gray4, Gray8, GrayColor, PixelColor,
    Rgb555, Rgb565, Rgb666, Rgb888, RgbColor,
};

/// Black/White colors
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Color {
    /// Black color
    Black,
    /// White color
    #[default]
    White,
}

impl Color {
    /// Get the color encoding of the color for one bit
    pub fn get_bit_value(self) -> u8 {
        match self {
            Color::White => 0u8,
            Color::Black => 1u8,
        }
    }

    /// Gets a full byte of black or white pixels
    pub fn get_byte_value(self) -> u8 {
        match self {
            Color::White => 0x00,
            Color::Black => 0xff,
        }
    }

    /// Inverses the given color from Black to White or from White to Black
    pub fn inverse(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Color of pixel `pos` inside a packed byte
    ///
    /// pos is counted from the left (highest value) from 0 to 7
    pub(crate) fn from_packed(input: u8, pos: u8) -> Color {
        if input.get_bit(7 - usize::from(pos)) {
            Color::Black
        } else {
            Color::White
        }
    }
}

impl PixelColor for Color {
    type Raw = RawU1;
}

impl From<BinaryColor> for Color {
    fn from(b: BinaryColor) -> Color {
        match b {
            BinaryColor::On => Color::Black,
            BinaryColor::Off => Color::White,
        }
    }
}

impl From<Color> for BinaryColor {
    fn from(c: Color) -> BinaryColor {
        match c {
            Color::Black => BinaryColor::On,
            Color::White => BinaryColor::Off,
        }
    }
}

/// How dark a pixel is, 0 is white and 255 is black
///
/// This is the inverse of the Rec. 601 luma of the color, scaled to 8 bits.
pub trait Darkness {
    /// 0 for white up to 255 for black
    fn darkness(&self) -> u8;
}

impl Darkness for Color {
    fn darkness(&self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 255,
        }
    }
}

/// `On` is the foreground, which is drawn black on paper
impl Darkness for BinaryColor {
    fn darkness(&self) -> u8 {
        match self {
            BinaryColor::Off => 0,
            BinaryColor::On => 255,
        }
    }
}

fn scale(value: u8, max: u8) -> u32 {
    u32::from(value) * 255 / u32::from(max)
}

fn darkness_from_rgb(r: u32, g: u32, b: u32) -> u8 {
    let luma = (299 * r + 587 * g + 114 * b) / 1000;
    255 - luma as u8
}

macro_rules! impl_gray_darkness {
    ($($color:ty),*) => {
        $(
            impl Darkness for $color {
                fn darkness(&self) -> u8 {
                    255 - scale(self.luma(), <$color>::WHITE.luma()) as u8
                }
            }
        )*
    };
}

macro_rules! impl_rgb_darkness {
    ($($color:ty),*) => {
        $(
            impl Darkness for $color {
                fn darkness(&self) -> u8 {
                    darkness_from_rgb(
                        scale(self.r(), <$color>::MAX_R),
                        scale(self.g(), <$color>::MAX_G),
                        scale(self.b(), <$color>::MAX_B),
                    )
                }
            }
        )*
    };
}

impl_gray_darkness!(Gray2, Gray4, Gray8);
impl_rgb_darkness!(Rgb555, Bgr555, Rgb565, Bgr565, Rgb666, Bgr666, Rgb888, Bgr888);

/// Darkness at or above which a pixel is painted black
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Threshold(u8);

impl Threshold {
    /// Threshold used by the vendor examples
    pub const DEFAULT: Threshold = Threshold(199);

    /// Paints pixels at least `darkness` dark black
    pub const fn new(darkness: u8) -> Self {
        Threshold(darkness)
    }

    /// The darkness this threshold starts at
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Classifies a pixel of the given darkness
    pub fn is_black(self, darkness: u8) -> bool {
        darkness >= self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold::DEFAULT
    }
}
