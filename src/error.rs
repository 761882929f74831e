//! Crate-wide error and result types.

use derive_more::{Display, Error};

/// Short alias for results carrying this crate's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Errors surfaced by driver construction and frame transmission.
///
/// Construction-time kinds (`InvalidChannel`, `ChannelInUse`,
/// `SharedStateInUse`, `BufferTooSmall`, `TimingUnrepresentable`,
/// `UnsupportedChannelOrder`, `BrightnessOutOfRange`, `QueueDepthExceeded`)
/// abort driver creation. `TransmissionInFlight` is a contract violation by
/// the caller; `Timeout` is recoverable by retrying `wait`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The requested hardware channel index is outside the dispatch table.
    #[display("channel {channel} is out of range")]
    InvalidChannel {
        /// The rejected channel index.
        channel: u8,
    },

    /// Another live driver already owns the requested channel.
    #[display("channel {channel} already has a live driver")]
    ChannelInUse {
        /// The contested channel index.
        channel: u8,
    },

    /// The shared state cell passed to the constructor is already claimed.
    #[display("shared driver state is already claimed")]
    SharedStateInUse,

    /// A caller-provided buffer is smaller than the encoded frame requires.
    #[display("buffer too small: need {needed} bytes, have {capacity}")]
    BufferTooSmall {
        /// Bytes the frame encodes to.
        needed: usize,
        /// Bytes actually available.
        capacity: usize,
    },

    /// A pulse duration does not fit the peripheral's tick counter.
    #[display("duration of {ns} ns is not representable in counter ticks")]
    TimingUnrepresentable {
        /// The offending duration in nanoseconds.
        ns: u32,
    },

    /// The configured channel order is not valid for this transport.
    #[display("channel order is not supported by this transport")]
    UnsupportedChannelOrder,

    /// Global brightness exceeds the 5-bit range of the pixel header.
    #[display("brightness {value} exceeds the 5-bit maximum of 31")]
    BrightnessOutOfRange {
        /// The rejected brightness value.
        value: u8,
    },

    /// One frame requires more queued transfers than the peripheral allows.
    #[display("frame needs {needed} queued transfers, peripheral allows {capacity}")]
    QueueDepthExceeded {
        /// Transfers one `show` must queue.
        needed: usize,
        /// The peripheral's queue depth.
        capacity: usize,
    },

    /// The underlying peripheral rejected a configuration or transfer.
    #[display("peripheral error: {reason}")]
    Peripheral {
        /// Peripheral-supplied description of the failure.
        reason: &'static str,
    },

    /// `show` was called while the previous frame was still in flight.
    #[display("a transmission is already in flight on this channel")]
    TransmissionInFlight,

    /// Completion was not observed within the allowed time.
    #[display("timed out waiting for transmission to complete")]
    Timeout,
}
