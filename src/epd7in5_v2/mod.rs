//! A simple Driver for the Waveshare 7.5" E-Ink Display (V2) via SPI
//!
//! # References
//!
//! - [Datasheet](https://www.waveshare.com/wiki/7.5inch_e-Paper_HAT)
//! - [Waveshare C driver](https://github.com/waveshare/e-Paper/blob/702def0/RaspberryPi%26JetsonNano/c/lib/e-Paper/EPD_7in5_V2.c)
//! - [Waveshare Python driver](https://github.com/waveshare/e-Paper/blob/702def0/RaspberryPi%26JetsonNano/python/lib/waveshare_epd/epd7in5_V2.py)
//!
//! Important note for V2:
//! Revision V2 has been released on 2019.11, the resolution is upgraded to 800×480, from 640×384 of V1.
//! The hardware and interface of V2 are compatible with V1, however, the related software should be updated.
//!
//! Only full refreshes are supported: every update writes the same frame as old and new data.

use embedded_graphics_core::image::GetPixel;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};
use log::{debug, info};

use crate::color::{Color, Darkness, Threshold};
use crate::config::Config;
use crate::error::ErrorKind;
use crate::interface::{DisplayInterface, Parts};
use crate::pack::{pack_into, PIXELS_PER_BYTE};
use crate::rect::Rect;

pub(crate) mod command;
use self::command::Command;
pub(crate) mod sequence;
use crate::buffer_len;

/// Width of the display
pub const WIDTH: u32 = 800;
/// Height of the display
pub const HEIGHT: u32 = 480;
/// Bytes of one packed row
pub const ROW_BYTES: usize = (WIDTH / PIXELS_PER_BYTE) as usize;
/// Bytes of a full packed frame
pub const BUFFER_LEN: usize = buffer_len(WIDTH as usize, HEIGHT as usize);
/// Default Background Color
pub const DEFAULT_BACKGROUND_COLOR: Color = Color::White;

/// Bytes of one row written by [`Epd7in5::clear`], rounded up for a partial last byte
const CLEAR_ROW_BYTES: usize = WIDTH.div_ceil(PIXELS_PER_BYTE) as usize;

/// Lifecycle of the panel as seen by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    /// Pins are set up, the panel hasn't been powered (or an init didn't finish)
    Uninitialized,
    /// Powered and configured, accepts frames
    Ready,
    /// A frame is being transferred and refreshed, or that was interrupted
    Displaying,
    /// The panel is being cleared, or that was interrupted
    Clearing,
    /// Deep sleep, only [`Epd7in5::init`] wakes it up
    Asleep,
}

/// A full frame in panel format, see [`pack`]
#[derive(Clone)]
pub struct PackedFrame {
    buffer: [u8; BUFFER_LEN],
}

impl PackedFrame {
    /// get internal buffer to use it (to draw in epd)
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }
}

impl AsRef<[u8]> for PackedFrame {
    fn as_ref(&self) -> &[u8] {
        &self.buffer
    }
}

/// Converts an image into a frame ready to be sent to the display.
///
/// The panel only knows black and white, so every pixel at least as dark as
/// `threshold` becomes black. The image is sampled over `(0, 0)..(WIDTH, HEIGHT)`,
/// pixels outside of the image are white.
// inline is necessary here to allow heap allocation via Box on stack limited programs
#[inline(always)]
pub fn pack<I>(image: &I, threshold: Threshold) -> PackedFrame
where
    I: GetPixel,
    I::Color: Darkness,
{
    let mut frame = PackedFrame {
        buffer: [DEFAULT_BACKGROUND_COLOR.get_byte_value(); BUFFER_LEN],
    };
    pack_into(image, threshold, WIDTH, HEIGHT, &mut frame.buffer);
    frame
}

type EpdError<SPI, CS, BUSY, DC, RST> = ErrorKind<SPI, CS, BUSY, DC, RST>;

/// Epd7in5 (V2) driver
///
/// Owns the bus, the pins and the delay from [`new`](Epd7in5::new) until
/// [`close`](Epd7in5::close). Calls block until the panel is done, and
/// nothing here is meant to be shared between threads.
pub struct Epd7in5<SPI, CS, BUSY, DC, RST, DELAY> {
    /// Connection Interface
    interface: DisplayInterface<SPI, CS, BUSY, DC, RST, DELAY>,
    state: PanelState,
}

impl<SPI, CS, BUSY, DC, RST, DELAY> Epd7in5<SPI, CS, BUSY, DC, RST, DELAY>
where
    SPI: SpiBus,
    CS: OutputPin,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Creates a new driver from a SPI bus, the CS, DC and RST output pins and the Busy input
    ///
    /// This doesn't talk to the panel yet, call [`init`](Epd7in5::init) before anything else.
    pub fn new(
        spi: SPI,
        cs: CS,
        busy: BUSY,
        dc: DC,
        rst: RST,
        delay: DELAY,
        config: Config,
    ) -> Self {
        let interface = DisplayInterface::new(spi, cs, busy, dc, rst, delay, config);
        Epd7in5 {
            interface,
            state: PanelState::Uninitialized,
        }
    }

    /// Resets the panel and powers it up
    ///
    /// Also the only way out of [`PanelState::Asleep`] and of an interrupted operation.
    pub fn init(&mut self) -> Result<(), EpdError<SPI, CS, BUSY, DC, RST>> {
        info!("Initializing display");
        self.state = PanelState::Uninitialized;

        debug!("Resetting display");
        self.interface.reset(
            sequence::RESET_HIGH_MS,
            sequence::RESET_LOW_MS,
            sequence::RESET_SETTLE_MS,
        )?;

        self.interface.run(sequence::INIT)?;

        self.state = PanelState::Ready;
        info!("Display initialized");
        Ok(())
    }

    /// Area covered by the panel
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, WIDTH, HEIGHT)
    }

    /// Get the width of the display
    pub fn width(&self) -> u32 {
        WIDTH
    }

    /// Get the height of the display
    pub fn height(&self) -> u32 {
        HEIGHT
    }

    /// Current lifecycle state
    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Packs `image` with `threshold` and shows it with a full refresh
    ///
    /// See [`pack`] for how the image is sampled.
    pub fn display_image<I>(
        &mut self,
        image: &I,
        threshold: Threshold,
    ) -> Result<(), EpdError<SPI, CS, BUSY, DC, RST>>
    where
        I: GetPixel,
        I::Color: Darkness,
    {
        self.expect_state(PanelState::Ready)?;
        info!("Displaying image");
        let frame = pack(image, threshold);
        self.display_frame(frame.as_bytes())
    }

    /// Shows an already packed frame of [`BUFFER_LEN`] bytes with a full refresh
    ///
    /// The frame is written as old and as new data, then the refresh is triggered and
    /// awaited.
    pub fn display_frame(&mut self, buffer: &[u8]) -> Result<(), EpdError<SPI, CS, BUSY, DC, RST>> {
        self.expect_state(PanelState::Ready)?;
        if buffer.len() != BUFFER_LEN {
            return Err(ErrorKind::BufferLength {
                expected: BUFFER_LEN,
                actual: buffer.len(),
            });
        }

        debug!("Displaying buffer");
        self.state = PanelState::Displaying;
        self.interface
            .cmd_with_data(Command::DataStartTransmission1, buffer)?;
        self.interface
            .cmd_with_data(Command::DataStartTransmission2, buffer)?;
        self.turn_on_display()?;

        self.state = PanelState::Ready;
        debug!("Buffer displayed");
        Ok(())
    }

    /// Clears the panel and refreshes it right away
    ///
    /// Old data is all `0xFF` and new data all `0x00`, sent one row per transaction.
    pub fn clear(&mut self) -> Result<(), EpdError<SPI, CS, BUSY, DC, RST>> {
        self.expect_state(PanelState::Ready)?;
        info!("Clearing display");
        self.state = PanelState::Clearing;

        let mut row = [0xFF; CLEAR_ROW_BYTES];
        self.interface.cmd(Command::DataStartTransmission1)?;
        for _ in 0..HEIGHT {
            self.interface.data(&row)?;
        }

        row.fill(0x00);
        self.interface.cmd(Command::DataStartTransmission2)?;
        for _ in 0..HEIGHT {
            self.interface.data(&row)?;
        }

        self.turn_on_display()?;

        self.state = PanelState::Ready;
        info!("Display cleared");
        Ok(())
    }

    /// Puts the display to sleep and powers off. This helps ensure the display longevity
    /// since keeping it powered on for long periods of time can damage the screen.
    ///
    /// After sleep the display needs to be woken up by running [`init`](Epd7in5::init) again.
    pub fn sleep(&mut self) -> Result<(), EpdError<SPI, CS, BUSY, DC, RST>> {
        self.expect_state(PanelState::Ready)?;
        info!("Putting display to sleep");
        self.interface.run(sequence::SLEEP)?;
        self.state = PanelState::Asleep;
        info!("Display is asleep");
        Ok(())
    }

    /// Wait until the display has stopped processing data
    ///
    /// You can call this to make sure a frame is displayed before goin further
    pub fn wait_until_idle(&mut self) -> Result<(), EpdError<SPI, CS, BUSY, DC, RST>> {
        self.interface.wait_until_idle()
    }

    /// Pulls CS, DC and RST low and gives the hardware back
    ///
    /// The driver is gone afterwards, to use the panel again build a new one and
    /// [`init`](Epd7in5::init) it.
    pub fn close(
        self,
    ) -> Result<Parts<SPI, CS, BUSY, DC, RST, DELAY>, EpdError<SPI, CS, BUSY, DC, RST>> {
        info!("Closing display");
        let parts = self.interface.release()?;
        info!("Display closed");
        Ok(parts)
    }

    fn turn_on_display(&mut self) -> Result<(), EpdError<SPI, CS, BUSY, DC, RST>> {
        debug!("Turning on display");
        self.interface.run(sequence::TURN_ON_DISPLAY)
    }

    fn expect_state(&self, expected: PanelState) -> Result<(), EpdError<SPI, CS, BUSY, DC, RST>> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ErrorKind::InvalidState(self.state))
        }
    }
}
