//! Command tables of the 7in5 V2 power-up, refresh and power-down procedure
//!
//! As described in the vendor driver:
//! <https://github.com/waveshare/e-Paper/blob/master/RaspberryPi_JetsonNano/c/lib/e-Paper/EPD_7in5_V2.c>
//! and as per specs:
//! <https://www.waveshare.com/w/upload/6/60/7.5inch_e-Paper_V2_Specification.pdf>

use super::command::Command;
use super::{HEIGHT, WIDTH};
use crate::interface::Step;

/// Reset timing in ms: high, low pulse, high again
pub(crate) const RESET_HIGH_MS: u32 = 20;
pub(crate) const RESET_LOW_MS: u32 = 2;
pub(crate) const RESET_SETTLE_MS: u32 = 20;

/// Settle time after power on and after the refresh trigger, before busy is sampled
pub(crate) const BUSY_SETTLE_MS: u32 = 100;

/// Fixed time the regulators need after deep sleep, busy isn't reliable here
pub(crate) const DEEP_SLEEP_SETTLE_MS: u32 = 2_000;

/// Check code the controller wants after [`Command::DeepSleep`]
pub(crate) const DEEP_SLEEP_CHECK_CODE: u8 = 0xA5;

/// Source (width) and gate (height) count, MSB first
pub(crate) const RESOLUTION: [u8; 4] = [
    (WIDTH >> 8) as u8,
    (WIDTH & 0xFF) as u8,
    (HEIGHT >> 8) as u8,
    (HEIGHT & 0xFF) as u8,
];

/// Everything after the hardware reset that brings the panel into the `Ready` state.
///
/// The 100ms pause before sampling busy after power on is needed, otherwise busy may never clear.
pub(crate) const INIT: &[Step<Command>] = &[
    // VGH=20V, VGL=-20V, VDH=15V, VDL=-15V
    Step::CmdWithData(Command::PowerSetting, &[0x07, 0x07, 0x3F, 0x3F]),
    Step::CmdWithData(Command::BoosterSoftStart, &[0x17, 0x17, 0x28, 0x17]),
    Step::Cmd(Command::PowerOn),
    Step::DelayMs(BUSY_SETTLE_MS),
    Step::WaitUntilIdle,
    // KW mode: LUT from OTP, black/white only
    Step::CmdWithData(Command::PanelSetting, &[0x1F]),
    Step::CmdWithData(Command::TconResolution, &RESOLUTION),
    Step::CmdWithData(Command::DualSpi, &[0x00]),
    Step::CmdWithData(Command::VcomAndDataIntervalSetting, &[0x10, 0x17]),
    Step::CmdWithData(Command::EndVoltageSetting, &[0x03]),
    Step::CmdWithData(Command::TconSetting, &[0x22]),
];

/// Starts the refresh from the SRAM content and waits for it to finish
pub(crate) const TURN_ON_DISPLAY: &[Step<Command>] = &[
    Step::Cmd(Command::DisplayRefresh),
    Step::DelayMs(BUSY_SETTLE_MS),
    Step::WaitUntilIdle,
];

/// Powers the panel off and puts the controller into deep sleep
pub(crate) const SLEEP: &[Step<Command>] = &[
    Step::Cmd(Command::PowerOff),
    Step::WaitUntilIdle,
    Step::CmdWithData(Command::DeepSleep, &[DEEP_SLEEP_CHECK_CODE]),
    Step::DelayMs(DEEP_SLEEP_SETTLE_MS),
];
