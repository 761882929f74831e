//! Byte-to-pulse-symbol translation for one-wire LED protocols.
//!
//! A [`PulseSymbol`] is one high-then-low waveform segment in peripheral
//! counter ticks — the hardware representation of a single protocol bit.
//! [`PulseEncoder`] fixes the `0`-bit and `1`-bit symbols for a
//! [`TimingProfile`] at a given counter clock, then translates encoded
//! frame bytes on demand, most-significant bit first.
//!
//! Translation is a pull-style producer: the hardware symbol ring is far
//! smaller than a frame, so symbols are materialized only as the ring
//! drains, never as a precomputed array. The low half of the very last
//! symbol of a frame is replaced with the family's reset gap, which latches
//! the strip.

use crate::error::{Error, Result};
use crate::timing::TimingProfile;

/// Largest tick count a symbol half can carry (15-bit hardware counters).
pub const MAX_SYMBOL_TICKS: u64 = 0x7FFF;

/// One two-level waveform segment: high for `high_ticks`, then low for
/// `low_ticks`, in peripheral counter ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseSymbol {
    /// Ticks the line is driven high.
    pub high_ticks: u16,
    /// Ticks the line is driven low.
    pub low_ticks: u16,
}

impl PulseSymbol {
    /// The all-zero symbol, read by the peripheral as an end marker.
    pub const IDLE: Self = Self {
        high_ticks: 0,
        low_ticks: 0,
    };
}

/// Read position within an encoded frame, at single-bit granularity.
///
/// A cursor advances strictly forward; restarting translation means
/// starting over with a fresh cursor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SymbolCursor {
    byte: usize,
    bit: u8,
}

impl SymbolCursor {
    /// A cursor at the first bit of the first byte.
    #[must_use]
    pub const fn start() -> Self {
        Self { byte: 0, bit: 0 }
    }

    /// Whether every bit of a `frame_len`-byte frame has been produced.
    #[must_use]
    pub const fn is_finished(&self, frame_len: usize) -> bool {
        self.byte >= frame_len
    }
}

/// Fixed `bit0`/`bit1` symbols plus the reset gap for one LED family at one
/// peripheral clock.
#[derive(Clone, Copy, Debug)]
pub struct PulseEncoder {
    bit0: PulseSymbol,
    bit1: PulseSymbol,
    reset_ticks: u16,
}

impl PulseEncoder {
    /// Precomputes the symbol pair and reset gap for `profile` at
    /// `counter_clock_hz`.
    ///
    /// Durations convert as `ns * hz / 1e9` in 64-bit math, truncated
    /// toward zero — the precision loss is bounded by one tick and is
    /// deterministic for a given clock. Fails with
    /// [`Error::TimingUnrepresentable`] when a duration rounds to zero
    /// ticks or exceeds the 15-bit counter range.
    pub fn new(profile: &TimingProfile, counter_clock_hz: u32) -> Result<Self> {
        let ticks = |ns: u32| -> Result<u16> {
            let ticks = u64::from(ns) * u64::from(counter_clock_hz) / 1_000_000_000;
            if ticks == 0 || ticks > MAX_SYMBOL_TICKS {
                return Err(Error::TimingUnrepresentable { ns });
            }
            #[allow(clippy::cast_possible_truncation, reason = "bounded by MAX_SYMBOL_TICKS")]
            let ticks = ticks as u16;
            Ok(ticks)
        };
        Ok(Self {
            bit0: PulseSymbol {
                high_ticks: ticks(profile.t0h_ns)?,
                low_ticks: ticks(profile.t0l_ns)?,
            },
            bit1: PulseSymbol {
                high_ticks: ticks(profile.t1h_ns)?,
                low_ticks: ticks(profile.t1l_ns)?,
            },
            reset_ticks: ticks(profile.reset_ns)?,
        })
    }

    /// The symbol emitted for a `0` bit.
    #[must_use]
    pub const fn bit0(&self) -> PulseSymbol {
        self.bit0
    }

    /// The symbol emitted for a `1` bit.
    #[must_use]
    pub const fn bit1(&self) -> PulseSymbol {
        self.bit1
    }

    /// The reset gap in ticks, substituted into the final symbol's low half.
    #[must_use]
    pub const fn reset_ticks(&self) -> u16 {
        self.reset_ticks
    }

    /// Pulls the next symbol of `bytes`, advancing `cursor`.
    ///
    /// Bits are produced most-significant first. Returns `None` once the
    /// frame is exhausted. The reset-gap substitution happens exactly once,
    /// on the last bit of the last byte, independent of how callers batch
    /// their pulls.
    pub fn next_symbol(&self, bytes: &[u8], cursor: &mut SymbolCursor) -> Option<PulseSymbol> {
        let byte = *bytes.get(cursor.byte)?;
        let mask = 0x80_u8 >> cursor.bit;
        let mut symbol = if byte & mask != 0 { self.bit1 } else { self.bit0 };

        if cursor.byte == bytes.len() - 1 && cursor.bit == 7 {
            symbol.low_ticks = self.reset_ticks;
        }

        if cursor.bit == 7 {
            cursor.bit = 0;
            cursor.byte += 1;
        } else {
            cursor.bit += 1;
        }
        Some(symbol)
    }

    /// Lazy symbol sequence over `bytes`, one symbol per bit.
    ///
    /// Finite and strictly in-order; the stream cannot be rewound, only
    /// recreated.
    #[must_use]
    pub fn translate<'a>(&'a self, bytes: &'a [u8]) -> SymbolStream<'a> {
        SymbolStream {
            encoder: self,
            bytes,
            cursor: SymbolCursor::start(),
        }
    }
}

/// Iterator form of the pull translator; see [`PulseEncoder::translate`].
#[derive(Clone, Debug)]
pub struct SymbolStream<'a> {
    encoder: &'a PulseEncoder,
    bytes: &'a [u8],
    cursor: SymbolCursor,
}

impl Iterator for SymbolStream<'_> {
    type Item = PulseSymbol;

    fn next(&mut self) -> Option<PulseSymbol> {
        self.encoder.next_symbol(self.bytes, &mut self.cursor)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .bytes
            .len()
            .saturating_sub(self.cursor.byte)
            .saturating_mul(8)
            .saturating_sub(usize::from(self.cursor.bit));
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SymbolStream<'_> {}
