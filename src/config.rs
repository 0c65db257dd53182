//! Runtime configuration of the connection to the panel

/// Level of the busy input while the controller is working
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusyLevel {
    /// Busy pin is pulled low while busy (7in5 V2 and most UC81xx based panels)
    #[default]
    Low,
    /// Busy pin is driven high while busy
    High,
}

/// Connection settings for [`Epd7in5`](crate::epd7in5_v2::Epd7in5)
///
/// The defaults follow the vendor reference implementation: busy is active low, the busy
/// line is polled every 10ms and waiting for it never gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Level of the busy line that means "busy"
    pub busy_level: BusyLevel,
    /// Number of µs to sleep between two reads of the busy line.
    /// 0 implies busy waiting.
    pub busy_poll_interval_us: u32,
    /// Give up waiting for the busy line after this many ms.
    ///
    /// `None` waits forever, a panel that never releases busy hangs the caller.
    pub busy_timeout_ms: Option<u32>,
    /// Split data payloads into bus writes of at most this many bytes.
    ///
    /// All chunks stay inside one chip-select frame. Linux spidev refuses writes
    /// bigger than its `bufsiz` (4096 bytes unless changed).
    pub max_transfer_len: Option<usize>,
}

impl Config {
    /// Default busy poll interval of 10ms
    pub const DEFAULT_BUSY_POLL_INTERVAL_US: u32 = 10_000;

    /// Same as [`Config::default`], usable in const context
    pub const fn new() -> Self {
        Config {
            busy_level: BusyLevel::Low,
            busy_poll_interval_us: Self::DEFAULT_BUSY_POLL_INTERVAL_US,
            busy_timeout_ms: None,
            max_transfer_len: None,
        }
    }

    /// Sets the level of the busy line while the panel works
    pub const fn with_busy_level(mut self, level: BusyLevel) -> Self {
        self.busy_level = level;
        self
    }

    /// Sets the pause between two reads of the busy line
    pub const fn with_busy_poll_interval_us(mut self, interval_us: u32) -> Self {
        self.busy_poll_interval_us = interval_us;
        self
    }

    /// Opt into a bounded busy wait, see [`ErrorKind::Timeout`](crate::error::ErrorKind::Timeout)
    pub const fn with_busy_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.busy_timeout_ms = Some(timeout_ms);
        self
    }

    /// Caps the size of a single bus write
    pub const fn with_max_transfer_len(mut self, len: usize) -> Self {
        self.max_transfer_len = Some(len);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
