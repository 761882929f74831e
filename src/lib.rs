//! Drive addressable LED strips from an in-memory pixel buffer.
//!
//! One-wire pulse-timed strips (WS281x, SK6812, …) are encoded into
//! nanosecond-accurate two-level pulse symbols and streamed through a
//! pulse-generation peripheral's small symbol ring, refilled from interrupt
//! context ([`one_wire`]). Two-wire clocked strips (APA102 / DotStar style)
//! are framed as byte streams and handed to a clocked-serial peripheral as
//! queued transfers ([`two_wire`]). Both transports share the color model
//! ([`color`]) and wire-byte serialization ([`pixel`]).
//!
//! Peripherals are collaborators behind traits
//! ([`one_wire::PulseChannel`], [`two_wire::ClockedSerial`]); pin muxing,
//! clock routing and interrupt installation stay in the platform
//! integration, so the whole crate compiles and tests on the host.
//!
//! # Glossary
//!
//! - **Pulse symbol:** one high-then-low timed waveform segment
//!   representing a single protocol bit.
//! - **Reset gap:** the long low hold after a frame's final bit that makes
//!   one-wire receivers latch.
//! - **Half-block refill:** topping up one half of the peripheral's symbol
//!   ring from interrupt context while the other half transmits.
//! - **Channel order:** the mapping from logical color channels to byte
//!   positions in the wire format.
//! - **Double buffering:** keeping two pixel buffers so the application can
//!   draw the next frame while the current one transmits.
#![no_std]
#![allow(async_fn_in_trait, reason = "single-threaded embedded")]

pub mod color;
pub mod dispatch;
mod error;
pub mod one_wire;
pub mod pixel;
pub mod pulse;
pub mod timing;
pub mod two_wire;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};

pub use crate::color::Rgb;
pub use embassy_time::Duration;

/// Whether a driver keeps one pixel buffer or two.
///
/// Single buffering saves memory but requires every frame to be waited on
/// before the buffer may be touched again. Double buffering swaps buffers
/// on `show`, so drawing continues while the previous frame transmits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BufferMode {
    /// One pixel buffer; `wait` before mutating or showing again.
    #[default]
    Single,
    /// Two pixel buffers, swapped on every `show`.
    Double,
}
