use crate::config::{BusyLevel, Config};
use crate::{error::ErrorKind, traits::Command};
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};
use log::{trace, warn};

/// One step of a command sequence sent to the panel
#[derive(Debug, Clone, Copy)]
pub(crate) enum Step<C> {
    /// Command without parameters
    Cmd(C),
    /// Command followed by its parameters, as two separate transactions
    CmdWithData(C, &'static [u8]),
    /// Sleep for the given ms
    DelayMs(u32),
    /// Poll the busy line until the panel is idle
    WaitUntilIdle,
}

/// The hardware handles given back by [`Epd7in5::close`](crate::epd7in5_v2::Epd7in5::close)
pub struct Parts<SPI, CS, BUSY, DC, RST, DELAY> {
    /// SPI bus
    pub spi: SPI,
    /// Chip select pin, left low
    pub cs: CS,
    /// Busy input
    pub busy: BUSY,
    /// Data/Command pin, left low
    pub dc: DC,
    /// Reset pin, left low
    pub rst: RST,
    /// Delay provider
    pub delay: DELAY,
}

/// The Connection Interface of the EPD
///
/// Owns the bus and every pin, and frames each command or data block
/// with its own chip-select assertion.
pub(crate) struct DisplayInterface<SPI, CS, BUSY, DC, RST, DELAY> {
    /// SPI
    spi: SPI,
    /// CS for SPI, low while a transaction is running
    cs: CS,
    /// Busy input, see [`BusyLevel`]
    busy: BUSY,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Resetting
    rst: RST,
    /// The concrete Delay implementation
    delay: DELAY,
    config: Config,
}

impl<SPI, CS, BUSY, DC, RST, DELAY> DisplayInterface<SPI, CS, BUSY, DC, RST, DELAY>
where
    SPI: SpiBus,
    CS: OutputPin,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Creates a new `DisplayInterface` struct
    ///
    /// Doesn't touch any pin.
    pub(crate) fn new(
        spi: SPI,
        cs: CS,
        busy: BUSY,
        dc: DC,
        rst: RST,
        delay: DELAY,
        config: Config,
    ) -> Self {
        DisplayInterface {
            spi,
            cs,
            busy,
            dc,
            rst,
            delay,
            config,
        }
    }

    /// Basic function for sending [Commands](Command).
    ///
    /// Exactly one byte is written with the DC pin low.
    pub(crate) fn cmd<T: Command>(
        &mut self,
        command: T,
    ) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        trace!("cmd {:#04x}", command.address());
        self.with_cs(|interface| {
            // low for commands
            interface.dc.set_low().map_err(ErrorKind::DcError)?;
            interface.write(&[command.address()])
        })
    }

    /// Basic function for sending an array of u8-values of data over spi
    ///
    /// The whole slice goes out inside a single chip-select frame.
    pub(crate) fn data(&mut self, data: &[u8]) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        if data.len() > 8 {
            trace!("data {} bytes", data.len());
        } else {
            trace!("data {:02x?}", data);
        }
        self.with_cs(|interface| {
            // high for data
            interface.dc.set_high().map_err(ErrorKind::DcError)?;
            interface.write(data)
        })
    }

    /// Basic function for sending [Commands](Command) and the data belonging to it.
    ///
    /// Command and data are two independent transactions.
    pub(crate) fn cmd_with_data<T: Command>(
        &mut self,
        command: T,
        data: &[u8],
    ) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.cmd(command)?;
        self.data(data)
    }

    /// Issues every step of `steps` in order
    pub(crate) fn run<T: Command>(
        &mut self,
        steps: &[Step<T>],
    ) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        for step in steps {
            match *step {
                Step::Cmd(command) => self.cmd(command)?,
                Step::CmdWithData(command, data) => self.cmd_with_data(command, data)?,
                Step::DelayMs(ms) => self.delay_ms(ms),
                Step::WaitUntilIdle => self.wait_until_idle()?,
            }
        }
        Ok(())
    }

    // chip select framing, cs is released even if the transfer failed
    fn with_cs<F>(&mut self, f: F) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>>
    where
        F: FnOnce(&mut Self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>>,
    {
        // activate spi with cs low
        self.cs.set_low().map_err(ErrorKind::CsError)?;
        let result = f(self);
        // deactivate spi with cs high, a failed transfer is reported first
        let released = self.cs.set_high().map_err(ErrorKind::CsError);
        result.and(released)
    }

    // spi write helper/abstraction function
    fn write(&mut self, data: &[u8]) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        match self.config.max_transfer_len {
            Some(len) if len > 0 && data.len() > len => {
                for data_chunk in data.chunks(len) {
                    self.spi.write(data_chunk).map_err(ErrorKind::SpiError)?;
                }
            }
            _ => self.spi.write(data).map_err(ErrorKind::SpiError)?,
        }
        // the transfer must be on the wire before cs goes high
        self.spi.flush().map_err(ErrorKind::SpiError)
    }

    /// Checks if device is still busy
    pub(crate) fn is_busy(&mut self) -> Result<bool, ErrorKind<SPI, CS, BUSY, DC, RST>> {
        match self.config.busy_level {
            BusyLevel::Low => self.busy.is_low(),
            BusyLevel::High => self.busy.is_high(),
        }
        .map_err(ErrorKind::BusyError)
    }

    /// Waits until device isn't busy anymore
    ///
    /// Without a configured timeout this never returns for a panel that stays busy.
    /// The timeout is accounted in poll intervals, time spent reading the pin is not counted.
    pub(crate) fn wait_until_idle(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        let interval_us = self.config.busy_poll_interval_us;
        let limit_us = self
            .config
            .busy_timeout_ms
            .map(|ms| u64::from(ms) * 1_000);
        let mut waited_us: u64 = 0;

        while self.is_busy()? {
            if let Some(limit_us) = limit_us {
                if waited_us >= limit_us {
                    warn!("busy line still active after {}ms", waited_us / 1_000);
                    return Err(ErrorKind::Timeout);
                }
            }
            if interval_us > 0 {
                self.delay.delay_us(interval_us);
            }
            waited_us += u64::from(interval_us.max(1));
        }
        Ok(())
    }

    /// Blocks for at least `ms` milliseconds
    pub(crate) fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Resets the device.
    ///
    /// Drives reset high, then low for `duration` ms and high again. The panel reacts to the
    /// falling edge, so the first high phase matters as well. The timing is different per
    /// device, the 7in5_v2 only resets properly with a short low pulse of 2ms.
    pub(crate) fn reset(
        &mut self,
        initial_delay: u32,
        duration: u32,
        settle: u32,
    ) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.rst.set_high().map_err(ErrorKind::RstError)?;
        self.delay_ms(initial_delay);

        self.rst.set_low().map_err(ErrorKind::RstError)?;
        self.delay_ms(duration);
        self.rst.set_high().map_err(ErrorKind::RstError)?;
        self.delay_ms(settle);
        Ok(())
    }

    /// Drives CS, DC and RST low and gives back every handle
    pub(crate) fn release(
        mut self,
    ) -> Result<Parts<SPI, CS, BUSY, DC, RST, DELAY>, ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.cs.set_low().map_err(ErrorKind::CsError)?;
        self.dc.set_low().map_err(ErrorKind::DcError)?;
        self.rst.set_low().map_err(ErrorKind::RstError)?;

        Ok(Parts {
            spi: self.spi,
            cs: self.cs,
            busy: self.busy,
            dc: self.dc,
            rst: self.rst,
            delay: self.delay,
        })
    }
}
