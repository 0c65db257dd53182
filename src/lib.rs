//! A simple Driver for the Waveshare 7.5" (V2) black/white E-Ink Display via SPI
//!
//! This driver was built using [`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/1.0
//!
//! # Requirements
//!
//! ### SPI
//!
//! - MISO is not connected/available
//! - SPI_MODE_0 is used (CPHL = 0, CPOL = 0)
//! - 8 bits per word, MSB first
//! - Chip select is driven by this driver through its own output pin, so hand over the raw
//!   [`SpiBus`](embedded_hal::spi::SpiBus) and not a shared `SpiDevice`
//!
//! ### Other....
//!
//! - Buffersize: a packed frame always has the size `WIDTH / 8 * HEIGHT`, one bit per pixel,
//!   MSB first, a set bit is a black pixel
//! - The busy line of this panel is low while the controller is working
//!
//! # Examples
//!
//! ```ignore
//! use waveshare_7in5v2::prelude::*;
//!
//! let mut epd = Epd7in5::new(spi, cs, busy, dc, rst, delay, Config::default());
//! epd.init()?;
//!
//! // anything that implements `GetPixel` works, e.g. an embedded-graphics `ImageRaw`
//! epd.display_image(&image, Threshold::DEFAULT)?;
//!
//! // wait and look at the image
//!
//! epd.clear()?;
//! epd.sleep()?;
//!
//! // hands back spi, pins and delay
//! let parts = epd.close()?;
//! ```
//!
//!
#![no_std]
#![deny(missing_docs)]

#[cfg(feature = "graphics")]
pub mod graphics;

mod traits;

pub mod color;

pub mod config;

pub mod error;

pub mod rect;

/// Interface for the physical connection between display and the controlling device
mod interface;

/// Conversion of raster images into packed monochrome frames
pub mod pack;

pub mod epd7in5_v2;

#[cfg(feature = "linux")]
pub mod linux;

pub use crate::interface::Parts;

/// Everything needed to drive the panel
pub mod prelude {
    pub use crate::color::{Color, Darkness, Threshold};
    pub use crate::config::{BusyLevel, Config};
    pub use crate::epd7in5_v2::{Epd7in5, PanelState, PackedFrame};
    pub use crate::error::ErrorKind;
    pub use crate::rect::Rect;
    pub use crate::Parts;
    pub use crate::SPI_MODE;

    #[cfg(feature = "graphics")]
    pub use crate::graphics::{Canvas, DisplayRotation};
}

use embedded_hal::spi::{Mode, Phase, Polarity};

/// SPI mode -
/// For more infos see [Requirements: SPI](index.html#spi)
pub const SPI_MODE: Mode = Mode {
    phase: Phase::CaptureOnFirstTransition,
    polarity: Polarity::IdleLow,
};

/// Computes the needed buffer length. Takes care of rounding up in case width
/// is not divisible by 8.
///
///  unused
///  bits        width
/// <----><------------------------>
/// \[XXXXX210\]\[76543210\]...\[76543210\] ^
/// \[XXXXX210\]\[76543210\]...\[76543210\] | height
/// \[XXXXX210\]\[76543210\]...\[76543210\] v
pub const fn buffer_len(width: usize, height: usize) -> usize {
    width.div_ceil(8) * height
}
