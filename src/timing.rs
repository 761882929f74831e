//! Bit-pulse timing profiles for the supported one-wire LED families.
//!
//! Each family encodes a `0` or `1` bit as a high pulse followed by a low
//! pulse of family-specific widths, and latches a frame with a long low
//! reset gap. Datasheet tolerances are typically ±150 ns, which the
//! peripheral's tick quantization must stay inside.

use crate::pixel::ChannelOrder;

/// Pulse widths, in nanoseconds, defining one LED family's bit protocol.
///
/// `t0h`/`t0l` are the high and low halves of a `0` bit, `t1h`/`t1l` of a
/// `1` bit. `reset_ns` is the minimum low hold after the last bit of a
/// frame — tens to hundreds of microseconds against bit halves of a few
/// hundred nanoseconds. All durations are nonzero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingProfile {
    /// High width of a `0` bit.
    pub t0h_ns: u32,
    /// Low width of a `0` bit.
    pub t0l_ns: u32,
    /// High width of a `1` bit.
    pub t1h_ns: u32,
    /// Low width of a `1` bit.
    pub t1l_ns: u32,
    /// Minimum reset/latch gap after the final bit of a frame.
    pub reset_ns: u32,
}

/// The one-wire LED families with built-in timing profiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedFamily {
    /// WS2811 (often 12 V strips with external drivers).
    Ws2811,
    /// Original WS2812.
    Ws2812,
    /// WS2812B, the common "NeoPixel" part.
    Ws2812b,
    /// WS2813 with its much longer latch gap.
    Ws2813,
    /// SK6812, RGB variant.
    Sk6812,
    /// SK6812 with a dedicated white LED.
    Sk6812Rgbw,
}

impl LedFamily {
    /// Returns this family's pulse timing profile.
    #[must_use]
    pub const fn timing(self) -> TimingProfile {
        match self {
            Self::Ws2811 => TimingProfile {
                t0h_ns: 300,
                t0l_ns: 900,
                t1h_ns: 950,
                t1l_ns: 350,
                reset_ns: 300_000,
            },
            Self::Ws2812 => TimingProfile {
                t0h_ns: 350,
                t0l_ns: 800,
                t1h_ns: 700,
                t1l_ns: 600,
                reset_ns: 50_000,
            },
            Self::Ws2812b => TimingProfile {
                t0h_ns: 400,
                t0l_ns: 850,
                t1h_ns: 850,
                t1l_ns: 400,
                reset_ns: 50_100,
            },
            Self::Ws2813 => TimingProfile {
                t0h_ns: 350,
                t0l_ns: 350,
                t1h_ns: 800,
                t1l_ns: 350,
                reset_ns: 300_000,
            },
            Self::Sk6812 | Self::Sk6812Rgbw => TimingProfile {
                t0h_ns: 300,
                t0l_ns: 900,
                t1h_ns: 600,
                t1l_ns: 600,
                reset_ns: 80_000,
            },
        }
    }

    /// The channel order these parts ship with.
    #[must_use]
    pub const fn default_order(self) -> ChannelOrder {
        match self {
            Self::Sk6812Rgbw => ChannelOrder::Rgbw,
            _ => ChannelOrder::Grb,
        }
    }
}
