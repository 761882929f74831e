//! Routing of hardware events to live driver instances.
//!
//! Pulse peripherals raise two events per channel: a *threshold* event when
//! the symbol ring is half drained, and a *done* event when transmission
//! ends. The platform's interrupt handler cannot carry per-driver context,
//! so this module keeps an explicit bounded table mapping each hardware
//! channel to the driver state that owns it. The interrupt binding (outside
//! this crate) only has to read the channel number from the peripheral's
//! status register and call [`on_threshold`] or [`on_done`].
//!
//! Registration and deregistration run inside a critical section, so they
//! are atomic with respect to dispatch. Table entries are `'static`, which
//! keeps dispatch free of lifetime hazards: a deregistered slot simply stops
//! routing.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::error::{Error, Result};

/// Number of hardware channels the dispatch table can route.
pub const CHANNEL_COUNT: usize = 8;

/// A validated hardware channel index, `0..CHANNEL_COUNT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelId(u8);

impl ChannelId {
    /// Validates a raw channel index.
    pub fn new(index: u8) -> Result<Self> {
        if usize::from(index) < CHANNEL_COUNT {
            Ok(Self(index))
        } else {
            Err(Error::InvalidChannel { channel: index })
        }
    }

    /// The raw index, for peripheral register access.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Receiver side of routed hardware events.
///
/// Implemented by the shared driver state types; both methods run in
/// interrupt context and must stay within the refill time budget.
pub(crate) trait EventSink: Sync {
    /// The symbol ring crossed its half-drained threshold.
    fn on_threshold(&self);
    /// The peripheral consumed the end marker; transmission is over.
    fn on_done(&self);
}

type SinkTable = [Option<&'static dyn EventSink>; CHANNEL_COUNT];

static SINKS: Mutex<CriticalSectionRawMutex, RefCell<SinkTable>> =
    Mutex::new(RefCell::new([None; CHANNEL_COUNT]));

/// Claims `channel` for `sink`; fails if a live driver already owns it.
pub(crate) fn register(channel: ChannelId, sink: &'static dyn EventSink) -> Result<()> {
    SINKS.lock(|table| {
        let mut table = table.borrow_mut();
        let slot = &mut table[channel.index()];
        if slot.is_some() {
            return Err(Error::ChannelInUse {
                channel: channel.raw(),
            });
        }
        *slot = Some(sink);
        Ok(())
    })
}

/// Releases `channel`. Idempotent; releasing an empty slot is a no-op.
pub(crate) fn deregister(channel: ChannelId) {
    SINKS.lock(|table| {
        table.borrow_mut()[channel.index()] = None;
    });
}

fn sink_for(channel: ChannelId) -> Option<&'static dyn EventSink> {
    SINKS.lock(|table| table.borrow()[channel.index()])
}

/// Routes a half-drained threshold event to the owner of `channel`.
///
/// Call from the peripheral's threshold interrupt. Unowned channels are
/// ignored.
pub fn on_threshold(channel: ChannelId) {
    if let Some(sink) = sink_for(channel) {
        sink.on_threshold();
    }
}

/// Routes a transmission-done event to the owner of `channel`.
///
/// Call from the peripheral's done interrupt. Unowned channels are ignored.
pub fn on_done(channel: ChannelId) {
    if let Some(sink) = sink_for(channel) {
        sink.on_done();
    }
}
