use super::*;
use crate::{
    overlay::plan::plan_overlay,
    settings::model::{OverlayType, Settings},
};

fn frame(w: u32, h: u32) -> FrameSize {
    FrameSize::new(w, h).unwrap()
}

fn layer(t: OverlayType, amount: f64, size: f64, f: FrameSize) -> Vec<u8> {
    let s = Settings {
        overlay_type: t,
        gradient_amount: amount,
        gradient_size: size,
        ..Settings::default()
    };
    shade_overlay(&plan_overlay(&s, f).unwrap(), f).unwrap()
}

fn alpha_at(buf: &[u8], f: FrameSize, x: u32, y: u32) -> u8 {
    buf[((y * f.width + x) * 4 + 3) as usize]
}

#[test]
fn fill_is_uniform_premultiplied_accent() {
    let f = frame(3, 2);
    let out = layer(OverlayType::Fill, 0.5, 0.9, f);
    assert_eq!(out.len(), f.byte_len());
    for px in out.chunks_exact(4) {
        assert_eq!(px, &[0, 128, 0, 128]);
    }
}

#[test]
fn vertical_band_peaks_mid_frame_and_fades_outside_stops() {
    let f = frame(4, 100);
    let out = layer(OverlayType::GradientVertical, 0.5, 0.5, f);

    for y in [0, 10, 24, 75, 90, 99] {
        assert_eq!(alpha_at(&out, f, 0, y), 0, "row {y}");
    }
    assert!(alpha_at(&out, f, 0, 49) >= 125);
    assert!(alpha_at(&out, f, 0, 50) >= 125);
    let mut prev = 0;
    for y in 25..50 {
        let a = alpha_at(&out, f, 2, y);
        assert!(a >= prev, "row {y}");
        prev = a;
    }
    // Constant along the cross axis.
    for x in 0..4 {
        assert_eq!(alpha_at(&out, f, x, 40), alpha_at(&out, f, 0, 40));
    }
}

#[test]
fn bottom_ramp_is_strongest_at_the_bottom_edge() {
    let f = frame(2, 50);
    let out = layer(OverlayType::GradientBottom, 1.0, 0.5, f);
    assert!(alpha_at(&out, f, 0, 49) > 240);
    assert_eq!(alpha_at(&out, f, 0, 10), 0);
    assert!(alpha_at(&out, f, 0, 40) > alpha_at(&out, f, 0, 30));
}

#[test]
fn right_ramp_mirrors_left_ramp() {
    let f = frame(40, 2);
    let left = layer(OverlayType::GradientLeft, 0.8, 0.5, f);
    let right = layer(OverlayType::GradientRight, 0.8, 0.5, f);
    for x in 0..40 {
        assert_eq!(alpha_at(&left, f, x, 0), alpha_at(&right, f, 39 - x, 0), "x {x}");
    }
}

#[test]
fn radial_glow_is_stretched_horizontally() {
    let f = frame(80, 80);
    let out = layer(OverlayType::GradientRadial, 0.5, 0.3, f);
    assert_eq!(out.len(), f.byte_len());

    // radius 24 on a 40x80 aux surface: 48px reach horizontally, 24px vertically.
    assert!(alpha_at(&out, f, 40, 40) > 100);
    assert!(alpha_at(&out, f, 70, 40) > 0);
    assert_eq!(alpha_at(&out, f, 40, 70), 0);
    assert_eq!(alpha_at(&out, f, 40, 8), 0);
}

#[test]
fn premultiplied_channels_never_exceed_alpha() {
    let f = frame(16, 16);
    for t in OverlayType::ALL {
        let out = layer(t, 0.7, 0.6, f);
        for px in out.chunks_exact(4) {
            assert!(px[0] <= px[3] && px[1] <= px[3] && px[2] <= px[3], "{t:?}");
        }
    }
}
