//! Color model tests against an independent floating-point oracle.
//!
//! The oracle mirrors the crate's fixed-point hue convention (full circle
//! over 0–255) in `f32`, so the integer implementation must track it within
//! the ±1 quantization allowance everywhere on a coarse sampling grid.

use strip_envoy::color::{
    Gamma, Hsv, Rgb, apply_correction, blend, correction_table, hsv_to_rgb, linearize, rgb_to_hsv,
    stretch,
};

/// Floating-point reference for `rgb_to_hsv`, hue on the 0–255 circle.
fn oracle_rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let rf = f32::from(r) / 255.0;
    let gf = f32::from(g) / 255.0;
    let bf = f32::from(b) / 255.0;

    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let v = (max * 255.0).round() as u8;
    if max == 0.0 || delta == 0.0 {
        return (0, 0, v);
    }

    let s = (delta / max * 255.0).round() as u8;
    let mut h = if max == rf {
        (gf - bf) / delta
    } else if max == gf {
        (bf - rf) / delta + 2.0
    } else {
        (rf - gf) / delta + 4.0
    };
    h *= 256.0 / 6.0;
    if h < 0.0 {
        h += 256.0;
    }
    ((h.round() as u32 % 256) as u8, s, v)
}

/// Floating-point reference for `hsv_to_rgb` in the same hue convention.
fn oracle_hsv_to_rgb(h: u8, s: u8, v: u8) -> (u8, u8, u8) {
    if s == 0 {
        return (v, v, v);
    }

    let hf = f32::from(h) * 6.0 / 256.0;
    let sector = hf.floor() as u32;
    let f = hf - hf.floor();
    let sf = f32::from(s) / 255.0;
    let vf = f32::from(v);

    let p = vf * (1.0 - sf);
    let q = vf * (1.0 - sf * f);
    let t = vf * (1.0 - sf * (1.0 - f));

    let (r, g, b) = match sector {
        0 => (vf, t, p),
        1 => (q, vf, p),
        2 => (p, vf, t),
        3 => (p, q, vf),
        4 => (t, p, vf),
        _ => (vf, p, q),
    };
    (r.round() as u8, g.round() as u8, b.round() as u8)
}

fn dist(a: u8, b: u8) -> u8 {
    a.abs_diff(b)
}

/// Hue distance on the circle, so 255 and 0 count as adjacent.
fn hue_dist(a: u8, b: u8) -> u16 {
    let d = u16::from(a.abs_diff(b));
    d.min(256 - d)
}

fn rgb_samples() -> Vec<Rgb> {
    let mut samples = Vec::new();
    for r in (0..=255).step_by(10) {
        for g in (0..=255).step_by(10) {
            for b in (0..=255).step_by(10) {
                samples.push(Rgb::new(r as u8, g as u8, b as u8));
            }
        }
    }
    samples
}

#[test]
fn rgb_to_hsv_matches_oracle_on_grid() {
    for color in rgb_samples() {
        let hsv = rgb_to_hsv(color);
        let (h, s, v) = oracle_rgb_to_hsv(color.r, color.g, color.b);

        assert!(
            hue_dist(hsv.h, h) <= 1 && dist(hsv.s, s) <= 1 && dist(hsv.v, v) <= 1,
            "rgb {:?} -> impl ({},{},{}), oracle ({h},{s},{v})",
            color,
            hsv.h,
            hsv.s,
            hsv.v,
        );
    }
}

#[test]
fn hsv_to_rgb_matches_oracle_on_quantized_inputs() {
    for color in rgb_samples() {
        let hsv = rgb_to_hsv(color);
        let rgb = hsv_to_rgb(hsv);
        let (r, g, b) = oracle_hsv_to_rgb(hsv.h, hsv.s, hsv.v);

        assert!(
            dist(rgb.r, r) <= 1 && dist(rgb.g, g) <= 1 && dist(rgb.b, b) <= 1,
            "hsv ({},{},{}) -> impl {:?}, oracle ({r},{g},{b})",
            hsv.h,
            hsv.s,
            hsv.v,
            rgb,
        );
    }
}

#[test]
fn hsv_to_rgb_tracks_oracle_across_hue_sweep() {
    for h in 0..=255u8 {
        for &(s, v) in &[(255u8, 255u8), (255, 128), (128, 200), (40, 90)] {
            let rgb = hsv_to_rgb(Hsv::new(h, s, v));
            let (r, g, b) = oracle_hsv_to_rgb(h, s, v);
            assert!(
                dist(rgb.r, r) <= 1 && dist(rgb.g, g) <= 1 && dist(rgb.b, b) <= 1,
                "hsv ({h},{s},{v}) -> impl {rgb:?}, oracle ({r},{g},{b})",
            );
        }
    }
}

/// Round-tripping through 8-bit HSV cannot be exact: half a hue step scales
/// by the chroma into up to ±4 on the middle channel. The bound must hold
/// everywhere on the grid.
#[test]
fn round_trip_stays_within_quantization_bound() {
    for color in rgb_samples() {
        let back = hsv_to_rgb(rgb_to_hsv(color));
        assert!(
            dist(back.r, color.r) <= 4 && dist(back.g, color.g) <= 4 && dist(back.b, color.b) <= 4,
            "round trip {color:?} -> {back:?}",
        );
    }
}

#[test]
fn achromatic_and_black_short_circuit() {
    assert_eq!(rgb_to_hsv(Rgb::new(0, 0, 0)), Hsv::new(0, 0, 0));
    assert_eq!(rgb_to_hsv(Rgb::new(90, 90, 90)), Hsv::new(0, 0, 90));
    assert_eq!(hsv_to_rgb(Hsv::new(0, 0, 0)), Rgb::new(0, 0, 0));
    // Hue and saturation are irrelevant at v == 0.
    assert_eq!(hsv_to_rgb(Hsv::new(123, 200, 0)), Rgb::new(0, 0, 0));
}

#[test]
fn primary_hues_land_on_expected_points() {
    assert_eq!(rgb_to_hsv(Rgb::new(255, 0, 0)).h, 0);
    assert_eq!(rgb_to_hsv(Rgb::new(0, 255, 0)).h, 85);
    assert_eq!(rgb_to_hsv(Rgb::new(0, 0, 255)).h, 171);
}

#[test]
fn blend_saturates_and_commutes() {
    let a = Rgb::new(200, 16, 255);
    let b = Rgb::new(100, 16, 1);
    assert_eq!(blend(a, b), Rgb::new(255, 32, 255));
    for x in rgb_samples().into_iter().step_by(97) {
        for y in rgb_samples().into_iter().step_by(131) {
            let forward = blend(x, y);
            assert_eq!(forward, blend(y, x));
            assert!(forward.r >= x.r.max(y.r).min(255));
        }
    }
}

#[test]
fn stretch_full_scale_is_identity_and_zero_blanks() {
    for color in rgb_samples().into_iter().step_by(41) {
        assert_eq!(stretch(color, 255, 255, 255), color);
        assert_eq!(stretch(color, 0, 0, 0), Rgb::new(0, 0, 0));
    }
    assert_eq!(stretch(Rgb::new(255, 128, 64), 128, 255, 0), Rgb::new(128, 128, 0));
}

#[test]
fn linearize_applies_quadratic_curve_per_channel() {
    assert_eq!(linearize(Rgb::new(0, 16, 255)), Rgb::new(0, 1, 254));
    assert_eq!(linearize(Rgb::new(128, 64, 200)), Rgb::new(64, 16, 156));
}

#[test]
fn correction_table_folds_gamma_and_brightness() {
    let identity = correction_table(Gamma::Linear, 255);
    for (index, &value) in identity.iter().enumerate() {
        assert_eq!(usize::from(value), index);
    }

    let quadratic = correction_table(Gamma::Quadratic, 255);
    for index in 0..256usize {
        assert_eq!(quadratic[index], ((index * index) >> 8) as u8);
    }

    let half = correction_table(Gamma::Linear, 128);
    assert_eq!(half[255], 128);
    assert_eq!(half[0], 0);

    let mut frame = [Rgb::new(255, 16, 0); 3];
    apply_correction(&mut frame, &quadratic);
    assert_eq!(frame[1], Rgb::new(254, 1, 0));
}
