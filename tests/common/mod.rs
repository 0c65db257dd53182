//! Recording fakes for the embedded-hal traits
//!
//! Every pin change, bus write and delay lands in one shared log so tests can
//! check the order of everything that reached the wire.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::{delay::DelayNs, digital, spi};
use waveshare_7in5v2::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Cs(bool),
    Dc(bool),
    Rst(bool),
    Write(Vec<u8>),
    Flush,
    DelayNs(u64),
}

pub type Log = Rc<RefCell<Vec<Event>>>;

pub struct FakeSpi(Log);

impl spi::ErrorType for FakeSpi {
    type Error = Infallible;
}

impl spi::SpiBus for FakeSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
        words.fill(0);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
        self.0.borrow_mut().push(Event::Write(words.to_vec()));
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Infallible> {
        read.fill(0);
        self.write(write)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
        let written = words.to_vec();
        words.fill(0);
        self.write(&written)
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().push(Event::Flush);
        Ok(())
    }
}

#[derive(Clone, Copy)]
pub enum Line {
    Cs,
    Dc,
    Rst,
}

pub struct FakePin {
    log: Log,
    line: Line,
}

impl FakePin {
    fn record(&mut self, high: bool) {
        let event = match self.line {
            Line::Cs => Event::Cs(high),
            Line::Dc => Event::Dc(high),
            Line::Rst => Event::Rst(high),
        };
        self.log.borrow_mut().push(event);
    }
}

impl digital::ErrorType for FakePin {
    type Error = Infallible;
}

impl digital::OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.record(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.record(true);
        Ok(())
    }
}

/// Busy input, active low, that reports busy for the next `remaining` reads
#[derive(Clone)]
pub struct FakeBusy {
    remaining: Rc<Cell<u32>>,
    reads: Rc<Cell<u32>>,
}

impl FakeBusy {
    /// Lets the next `polls` reads report busy
    pub fn busy_for(&self, polls: u32) {
        self.remaining.set(polls);
    }

    pub fn reads(&self) -> u32 {
        self.reads.get()
    }
}

impl digital::ErrorType for FakeBusy {
    type Error = Infallible;
}

impl digital::InputPin for FakeBusy {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        self.is_low().map(|low| !low)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.reads.set(self.reads.get() + 1);
        let remaining = self.remaining.get();
        if remaining > 0 {
            if remaining != u32::MAX {
                self.remaining.set(remaining - 1);
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

pub struct FakeDelay(Log);

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().push(Event::DelayNs(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        self.0
            .borrow_mut()
            .push(Event::DelayNs(u64::from(us) * 1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0
            .borrow_mut()
            .push(Event::DelayNs(u64::from(ms) * 1_000_000));
    }
}

pub type TestEpd = Epd7in5<FakeSpi, FakePin, FakeBusy, FakePin, FakePin, FakeDelay>;

pub struct Harness {
    pub epd: TestEpd,
    pub log: Log,
    pub busy: FakeBusy,
}

impl Harness {
    pub fn new(config: Config) -> Self {
        let log: Log = Rc::default();
        let busy = FakeBusy {
            remaining: Rc::default(),
            reads: Rc::default(),
        };
        let pin = |line| FakePin {
            log: log.clone(),
            line,
        };
        let epd = Epd7in5::new(
            FakeSpi(log.clone()),
            pin(Line::Cs),
            busy.clone(),
            pin(Line::Dc),
            pin(Line::Rst),
            FakeDelay(log.clone()),
            config,
        );
        Harness { epd, log, busy }
    }

    /// Takes everything recorded so far
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.log.borrow_mut())
    }
}

pub fn ms(ms: u64) -> Event {
    Event::DelayNs(ms * 1_000_000)
}

/// What the panel sees: transactions and pauses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wire {
    Command(u8),
    Data(Vec<u8>),
    DelayMs(u64),
}

/// Groups the log into chip-select framed transactions
///
/// Panics on bus writes outside of a frame or a command frame that isn't one byte.
pub fn wire(events: &[Event]) -> Vec<Wire> {
    let mut out = Vec::new();
    let mut dc_high = None;
    let mut frame: Option<Vec<u8>> = None;

    for event in events {
        match event {
            Event::Cs(false) => {
                assert!(frame.is_none(), "nested chip select");
                frame = Some(Vec::new());
            }
            Event::Cs(true) => {
                if let Some(bytes) = frame.take() {
                    match dc_high {
                        Some(false) => {
                            assert_eq!(bytes.len(), 1, "command frame with {bytes:02x?}");
                            out.push(Wire::Command(bytes[0]));
                        }
                        Some(true) => out.push(Wire::Data(bytes)),
                        None => panic!("frame without dc level"),
                    }
                }
            }
            Event::Dc(level) => dc_high = Some(*level),
            Event::Write(bytes) => frame
                .as_mut()
                .expect("bus write outside chip select")
                .extend_from_slice(bytes),
            Event::DelayNs(ns) if ns % 1_000_000 == 0 => out.push(Wire::DelayMs(ns / 1_000_000)),
            Event::DelayNs(_) | Event::Flush | Event::Rst(_) => {}
        }
    }
    out
}

/// Only the transactions, without pauses
pub fn transactions(events: &[Event]) -> Vec<Wire> {
    wire(events)
        .into_iter()
        .filter(|w| !matches!(w, Wire::DelayMs(_)))
        .collect()
}

pub fn cmd(address: u8) -> Wire {
    Wire::Command(address)
}

pub fn data(bytes: &[u8]) -> Wire {
    Wire::Data(bytes.to_vec())
}

/// Frame bytes the init sequence must put on the wire, in order
pub fn init_transactions() -> Vec<Wire> {
    vec![
        cmd(0x01),
        data(&[0x07, 0x07, 0x3F, 0x3F]),
        cmd(0x06),
        data(&[0x17, 0x17, 0x28, 0x17]),
        cmd(0x04),
        cmd(0x00),
        data(&[0x1F]),
        cmd(0x61),
        data(&[0x03, 0x20, 0x01, 0xE0]),
        cmd(0x15),
        data(&[0x00]),
        cmd(0x50),
        data(&[0x10, 0x17]),
        cmd(0x52),
        data(&[0x03]),
        cmd(0x60),
        data(&[0x22]),
    ]
}
