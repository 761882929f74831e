//! Color value types and conversions for LED frames.
//!
//! The RGB working type is [`Rgb`] (re-exported from the `smart_leds`
//! crate, so the usual [`colors`] constants apply). [`Hsv`] uses a
//! fixed-point hue: the full circle maps onto 0–255, *not* 0–360, so one
//! hue step is 360/256 degrees. All conversions are pure integer math with
//! documented rounding, suitable for interrupt-adjacent code.

/// Predefined RGB color constants from the `smart_leds` crate.
#[doc(inline)]
pub use smart_leds::colors;

use smart_leds::RGB8;

/// RGB color representation re-exported from the `smart_leds` crate.
pub type Rgb = RGB8;

/// An RGB color with an explicit white channel.
///
/// Use this pixel type when the strip's white LED is driven directly by the
/// application. Frames of plain [`Rgb`] pixels instead *derive* white from
/// the color channels during encoding; see
/// [`LedPixel`](crate::pixel::LedPixel).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgbw {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// White channel.
    pub w: u8,
}

impl Rgbw {
    /// Creates a color from the four channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, w: u8) -> Self {
        Self { r, g, b, w }
    }
}

impl From<Rgb> for Rgbw {
    /// Adopts the color channels unchanged with the white channel off.
    fn from(color: Rgb) -> Self {
        Self::new(color.r, color.g, color.b, 0)
    }
}

/// Hue/saturation/value color, all channels 8-bit.
///
/// Hue spans the full circle over 0–255 (fixed point, 360/256 degrees per
/// step). Achromatic colors normalize to `h = 0, s = 0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hsv {
    /// Hue, full circle over 0–255.
    pub h: u8,
    /// Saturation.
    pub s: u8,
    /// Value (brightness).
    pub v: u8,
}

impl Hsv {
    /// Creates a color from hue, saturation and value.
    #[must_use]
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }
}

/// Converts an RGB color to [`Hsv`].
///
/// Integer hue/chroma/value decomposition. The hue numerator is rounded
/// half-up onto the 0–255 circle; saturation is rounded half-up onto 0–255.
/// Black and grays (`max == min`) return `h = 0, s = 0`.
#[must_use]
pub fn rgb_to_hsv(color: Rgb) -> Hsv {
    let (r, g, b) = (
        i32::from(color.r),
        i32::from(color.g),
        i32::from(color.b),
    );
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    if max == 0 || delta == 0 {
        // Achromatic; hue and saturation are undefined and normalize to zero.
        #[allow(clippy::cast_possible_truncation, reason = "max is a channel value")]
        return Hsv::new(0, 0, max as u8);
    }

    let s = (255 * delta + max / 2) / max;

    // Sector numerator relative to the dominant channel, in units of
    // delta/6th of the circle. Ties resolve in r, g, b priority order.
    let num = if max == r {
        g - b
    } else if max == g {
        (b - r) + 2 * delta
    } else {
        (r - g) + 4 * delta
    };
    // Scale to the 0-255 circle, rounding half-up. A full turn is added
    // before dividing so the numerator stays positive for `g < b` reds.
    let h = ((num * 256 + 1536 * delta + 3 * delta) / (6 * delta)) % 256;

    #[allow(clippy::cast_possible_truncation, reason = "all reduced to 0..=255")]
    let hsv = Hsv::new(h as u8, s as u8, max as u8);
    hsv
}

/// Converts an [`Hsv`] color to RGB.
///
/// Six-sector reconstruction in the same 0–255 hue convention as
/// [`rgb_to_hsv`], with half-up rounding of the intermediate products.
/// `v == 0` yields black regardless of hue and saturation.
#[must_use]
pub fn hsv_to_rgb(color: Hsv) -> Rgb {
    let v = color.v;
    if color.s == 0 {
        return Rgb::new(v, v, v);
    }

    let h6 = u32::from(color.h) * 6; // 0..=1530: sector plus fraction
    let sector = h6 >> 8;
    let f = h6 & 0xFF; // position within the sector, /256
    let s = u32::from(color.s);
    let value = u32::from(v);

    // 65280 = 255 * 256, the combined saturation and fraction scale.
    #[allow(clippy::cast_possible_truncation, reason = "quotients fit a channel")]
    let (p, q, t) = (
        ((value * (255 - s) + 127) / 255) as u8,
        ((value * (65280 - s * f) + 32640) / 65280) as u8,
        ((value * (65280 - s * (256 - f)) + 32640) / 65280) as u8,
    );

    match sector {
        0 => Rgb::new(v, t, p),
        1 => Rgb::new(q, v, p),
        2 => Rgb::new(p, v, t),
        3 => Rgb::new(p, q, v),
        4 => Rgb::new(t, p, v),
        _ => Rgb::new(v, p, q),
    }
}

/// Adds two colors channel-wise, saturating at full brightness.
#[must_use]
pub fn blend(a: Rgb, b: Rgb) -> Rgb {
    Rgb::new(
        a.r.saturating_add(b.r),
        a.g.saturating_add(b.g),
        a.b.saturating_add(b.b),
    )
}

/// Applies an approximate gamma-2 curve (`v * v / 256`) per channel.
///
/// Cheap perceptual linearization for LEDs whose optical output is roughly
/// proportional to duty cycle.
#[must_use]
pub fn linearize(color: Rgb) -> Rgb {
    Rgb::new(
        square_scale(color.r),
        square_scale(color.g),
        square_scale(color.b),
    )
}

/// Scales each channel into `0..=max` (`v * max / 255`, truncating).
///
/// `stretch(c, 255, 255, 255)` is the identity; `stretch(c, 0, 0, 0)` is
/// black. Used to apply global brightness or per-channel color-correction
/// limits before encoding.
#[must_use]
pub fn stretch(color: Rgb, max_r: u8, max_g: u8, max_b: u8) -> Rgb {
    Rgb::new(
        scale(color.r, max_r),
        scale(color.g, max_g),
        scale(color.b, max_b),
    )
}

/// Four-channel variant of [`stretch`] for explicit-white pixels.
#[must_use]
pub fn stretch_rgbw(color: Rgbw, max_r: u8, max_g: u8, max_b: u8, max_w: u8) -> Rgbw {
    Rgbw::new(
        scale(color.r, max_r),
        scale(color.g, max_g),
        scale(color.b, max_b),
        scale(color.w, max_w),
    )
}

#[allow(clippy::cast_possible_truncation, reason = "product / 255 fits u8")]
const fn scale(value: u8, max: u8) -> u8 {
    ((value as u16 * max as u16) / 255) as u8
}

#[allow(clippy::cast_possible_truncation, reason = "product >> 8 fits u8")]
const fn square_scale(value: u8) -> u8 {
    ((value as u16 * value as u16) >> 8) as u8
}

// ============================================================================
// Gamma Correction
// ============================================================================

/// Gamma correction mode for [`correction_table`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gamma {
    /// Linear response (no correction).
    Linear,
    /// Quadratic response, the same curve as [`linearize`].
    #[default]
    Quadratic,
}

/// Generates a combined gamma correction and brightness scaling lookup table.
///
/// This folds two operations into a single table lookup:
/// 1. the gamma curve selected by `gamma`;
/// 2. scaling by `max_brightness` for current limiting.
///
/// The table is computable at compile time, so per-frame correction costs
/// one indexed load per channel.
#[must_use]
pub const fn correction_table(gamma: Gamma, max_brightness: u8) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut index = 0;
    while index < 256 {
        #[allow(clippy::cast_possible_truncation, reason = "index is 0..=255")]
        let curved = match gamma {
            Gamma::Linear => index as u8,
            Gamma::Quadratic => square_scale(index as u8),
        };
        table[index] = scale(curved, max_brightness);
        index += 1;
    }
    table
}

/// Applies a [`correction_table`] to every pixel of a frame in place.
pub fn apply_correction(pixels: &mut [Rgb], table: &[u8; 256]) {
    for pixel in pixels {
        pixel.r = table[usize::from(pixel.r)];
        pixel.g = table[usize::from(pixel.g)];
        pixel.b = table[usize::from(pixel.b)];
    }
}
