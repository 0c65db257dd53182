//! Errors of the panel driver

use core::fmt::{Debug, Display, Formatter};

use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::spi::{self, ErrorType};

use crate::epd7in5_v2::PanelState;

/// Epd error type
pub enum ErrorKind<SPI, CS, BUSY, DC, RST>
where
    SPI: ErrorType,
    CS: OutputPin,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Encountered an SPI error
    SpiError(SPI::Error),

    /// Encountered an error on CS GPIO
    CsError(CS::Error),

    /// Encountered an error on Busy GPIO
    BusyError(BUSY::Error),

    /// Encountered an error on DC GPIO
    DcError(DC::Error),

    /// Encountered an error on RST GPIO
    RstError(RST::Error),

    /// The busy line didn't clear within [`Config::busy_timeout_ms`](crate::config::Config)
    Timeout,

    /// The operation isn't allowed while the panel is in this state
    InvalidState(PanelState),

    /// A packed frame of the wrong size was handed over
    BufferLength {
        /// Size of a full frame
        expected: usize,
        /// Size of the given buffer
        actual: usize,
    },
}

impl<SPI, CS, BUSY, DC, RST> Display for ErrorKind<SPI, CS, BUSY, DC, RST>
where
    SPI: ErrorType,
    CS: OutputPin,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        use digital::Error as _;
        use spi::Error as _;

        match self {
            Self::SpiError(err) => write!(f, "SPI error: {}", err.kind()),
            Self::CsError(err) => write!(f, "CS pin error: {}", err.kind()),
            Self::BusyError(err) => write!(f, "Busy pin error: {}", err.kind()),
            Self::DcError(err) => write!(f, "DC pin error: {}", err.kind()),
            Self::RstError(err) => write!(f, "RST pin error: {}", err.kind()),
            Self::Timeout => write!(f, "Timed out waiting for the busy line to clear"),
            Self::InvalidState(state) => write!(f, "Operation not allowed in state {state:?}"),
            Self::BufferLength { expected, actual } => {
                write!(f, "Frame buffer has {actual} bytes, expected {expected}")
            }
        }
    }
}

impl<SPI, CS, BUSY, DC, RST> Debug for ErrorKind<SPI, CS, BUSY, DC, RST>
where
    SPI: ErrorType,
    CS: OutputPin,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SpiError(err) => f.debug_tuple("SpiError").field(err).finish(),
            Self::CsError(err) => f.debug_tuple("CsError").field(err).finish(),
            Self::BusyError(err) => f.debug_tuple("BusyError").field(err).finish(),
            Self::DcError(err) => f.debug_tuple("DcError").field(err).finish(),
            Self::RstError(err) => f.debug_tuple("RstError").field(err).finish(),
            Self::Timeout => write!(f, "Timeout"),
            Self::InvalidState(state) => f.debug_tuple("InvalidState").field(state).finish(),
            Self::BufferLength { expected, actual } => f
                .debug_struct("BufferLength")
                .field("expected", expected)
                .field("actual", actual)
                .finish(),
        }
    }
}

impl<SPI, CS, BUSY, DC, RST> core::error::Error for ErrorKind<SPI, CS, BUSY, DC, RST>
where
    SPI: ErrorType,
    CS: OutputPin,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
{
}
