//! Linux host backend, e.g. a Raspberry Pi with the Waveshare e-Paper HAT
//!
//! Opens the spidev bus and requests the four GPIO lines through the character device.
//! CS is driven as a plain GPIO by the driver, so the kernel must not own it: with the HAT on
//! `spi0` use `dtoverlay=spi0-0cs` (or move CS to a free line).

extern crate std;

use std::string::String;

use linux_embedded_hal::{
    gpio_cdev::{errors::Error as GpioError, Chip, LineRequestFlags},
    spidev::{SpiModeFlags, Spidev, SpidevOptions},
    CdevPin, Delay, SpidevBus,
};
use log::info;
use thiserror::Error;

use crate::config::Config;
use crate::epd7in5_v2::Epd7in5;

/// Largest write a default spidev accepts
pub const SPIDEV_BUFSIZ: usize = 4096;

/// The driver as built by [`open`]
pub type LinuxEpd = Epd7in5<SpidevBus, CdevPin, CdevPin, CdevPin, CdevPin, Delay>;

/// GPIO line offsets of the panel signals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinuxPins {
    /// Data/Command output
    pub dc: u32,
    /// Chip select output
    pub cs: u32,
    /// Reset output
    pub rst: u32,
    /// Busy input
    pub busy: u32,
}

impl Default for LinuxPins {
    /// BCM numbering of the Waveshare HAT
    fn default() -> Self {
        LinuxPins {
            dc: 25,
            cs: 8,
            rst: 17,
            busy: 24,
        }
    }
}

/// Where to find the panel on the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinuxConfig {
    /// spidev device node
    pub spi_path: String,
    /// SPI clock in Hz
    pub spi_speed_hz: u32,
    /// GPIO character device
    pub gpio_chip: String,
    /// Line offsets on `gpio_chip`
    pub pins: LinuxPins,
}

impl Default for LinuxConfig {
    fn default() -> Self {
        LinuxConfig {
            spi_path: String::from("/dev/spidev0.0"),
            spi_speed_hz: 4_000_000,
            gpio_chip: String::from("/dev/gpiochip0"),
            pins: LinuxPins::default(),
        }
    }
}

/// Opening the bus or a GPIO line failed, nothing was sent to the panel
#[derive(Debug, Error)]
pub enum OpenError {
    /// The spidev node couldn't be opened or configured
    #[error("failed to open SPI device {path}")]
    Spi {
        /// spidev device node
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The GPIO character device couldn't be opened
    #[error("failed to open GPIO chip {path}")]
    Chip {
        /// GPIO character device
        path: String,
        /// Underlying GPIO error
        #[source]
        source: GpioError,
    },
    /// A GPIO line couldn't be requested, e.g. because it is already in use
    #[error("failed to request GPIO line {line} ({consumer})")]
    Line {
        /// Line offset on the chip
        line: u32,
        /// Consumer label of the request
        consumer: &'static str,
        /// Underlying GPIO error
        #[source]
        source: GpioError,
    },
}

/// Opens spidev and the GPIO lines and builds an uninitialized driver
///
/// `config.max_transfer_len` falls back to [`SPIDEV_BUFSIZ`] when unset.
pub fn open(linux: &LinuxConfig, config: Config) -> Result<LinuxEpd, OpenError> {
    info!("Opening {} and {}", linux.spi_path, linux.gpio_chip);

    let spi_error = |source| OpenError::Spi {
        path: linux.spi_path.clone(),
        source,
    };
    let mut spidev = Spidev::open(&linux.spi_path).map_err(spi_error)?;
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(linux.spi_speed_hz)
        .mode(SpiModeFlags::SPI_MODE_0 | SpiModeFlags::SPI_NO_CS)
        .build();
    spidev.configure(&options).map_err(spi_error)?;

    let mut chip = Chip::new(&linux.gpio_chip).map_err(|source| OpenError::Chip {
        path: linux.gpio_chip.clone(),
        source,
    })?;

    // idle levels: deselected, command, out of reset
    let cs = request_line(&mut chip, linux.pins.cs, LineRequestFlags::OUTPUT, 1, "epd-cs")?;
    let dc = request_line(&mut chip, linux.pins.dc, LineRequestFlags::OUTPUT, 0, "epd-dc")?;
    let rst = request_line(&mut chip, linux.pins.rst, LineRequestFlags::OUTPUT, 1, "epd-rst")?;
    let busy = request_line(&mut chip, linux.pins.busy, LineRequestFlags::INPUT, 0, "epd-busy")?;

    let config = Config {
        max_transfer_len: Some(config.max_transfer_len.unwrap_or(SPIDEV_BUFSIZ)),
        ..config
    };

    Ok(Epd7in5::new(
        SpidevBus(spidev),
        cs,
        busy,
        dc,
        rst,
        Delay,
        config,
    ))
}

fn request_line(
    chip: &mut Chip,
    line: u32,
    flags: LineRequestFlags,
    default: u8,
    consumer: &'static str,
) -> Result<CdevPin, OpenError> {
    let line_error = |source| OpenError::Line {
        line,
        consumer,
        source,
    };
    let handle = chip
        .get_line(line)
        .and_then(|l| l.request(flags, default, consumer))
        .map_err(line_error)?;
    CdevPin::new(handle).map_err(line_error)
}
