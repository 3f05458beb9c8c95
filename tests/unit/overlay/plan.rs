use super::*;
use crate::color::hsl::hex_with_alpha;

fn frame(w: u32, h: u32) -> FrameSize {
    FrameSize::new(w, h).unwrap()
}

fn with(overlay_type: OverlayType, amount: f64, size: f64) -> Settings {
    Settings {
        overlay_type,
        gradient_amount: amount,
        gradient_size: size,
        ..Settings::default()
    }
}

#[test]
fn every_type_is_skipped_iff_amount_is_not_positive() {
    let f = frame(64, 64);
    for t in OverlayType::ALL {
        assert!(plan_overlay(&with(t, 0.0, 0.5), f).is_none(), "{t:?}");
        assert!(plan_overlay(&with(t, -0.2, 0.5), f).is_none(), "{t:?}");
        assert!(plan_overlay(&with(t, 0.01, 0.5), f).is_some(), "{t:?}");
    }
}

#[test]
fn full_stop_alpha_matches_hex_suffix() {
    let s = with(OverlayType::Fill, 0.5, 0.5);
    let plan = plan_overlay(&s, frame(8, 8)).unwrap();
    assert_eq!(
        plan,
        OverlayPlan::Fill {
            color: Rgb8::new(0, 255, 0),
            alpha: 0x80
        }
    );
    assert_eq!(hex_with_alpha(&s.section_color, s.gradient_amount), "#00ff0080");
}

#[test]
fn band_stops_are_ordered_after_clamping() {
    for size in [0.0, 0.1, 0.5, 1.0, 1.7, 3.0] {
        let plan = plan_overlay(&with(OverlayType::GradientHorizontal, 0.5, size), frame(64, 32))
            .unwrap();
        let stops = plan.stops();
        assert_eq!(stops.len(), 3);
        assert!(stops.iter().all(|s| (0.0..=1.0).contains(&s.offset)));
        assert!(stops[0].offset <= 0.5 && 0.5 <= stops[2].offset);
        assert_eq!(stops[1].offset, 0.5);
        assert_eq!((stops[0].alpha, stops[1].alpha, stops[2].alpha), (0, 128, 0));
    }
}

#[test]
fn band_half_width_is_half_the_size() {
    let plan = plan_overlay(&with(OverlayType::GradientVertical, 1.0, 0.5), frame(10, 100)).unwrap();
    let OverlayPlan::Linear { start, end, stops, .. } = plan else {
        panic!("expected linear plan");
    };
    assert_eq!((start, end), (Point::new(0.0, 0.0), Point::new(0.0, 100.0)));
    assert_eq!(stops[0].offset, 0.25);
    assert_eq!(stops[2].offset, 0.75);
}

#[test]
fn edge_gradients_span_size_from_their_edge() {
    let f = frame(200, 100);
    let cases = [
        (OverlayType::GradientBottom, (0.0, 100.0), (0.0, 60.0)),
        (OverlayType::GradientTop, (0.0, 0.0), (0.0, 40.0)),
        (OverlayType::GradientLeft, (0.0, 0.0), (80.0, 0.0)),
        (OverlayType::GradientRight, (200.0, 0.0), (120.0, 0.0)),
    ];
    for (t, s, e) in cases {
        let OverlayPlan::Linear { start, end, stops, .. } =
            plan_overlay(&with(t, 0.5, 0.4), f).unwrap()
        else {
            panic!("expected linear plan for {t:?}");
        };
        assert_eq!(start, Point::new(s.0, s.1), "{t:?}");
        assert_eq!(end, Point::new(e.0, e.1), "{t:?}");
        assert_eq!(stops[0].alpha, 128);
        assert_eq!(stops[1].alpha, 0);
    }
}

#[test]
fn zero_size_edge_gradient_is_skipped() {
    assert!(plan_overlay(&with(OverlayType::GradientTop, 0.5, 0.0), frame(32, 32)).is_none());
    assert!(plan_overlay(&with(OverlayType::GradientRadial, 0.5, 0.0), frame(32, 32)).is_none());
}

#[test]
fn radial_uses_half_width_aux_surface() {
    let plan = plan_overlay(&with(OverlayType::GradientRadial, 0.5, 0.3), frame(800, 800)).unwrap();
    let OverlayPlan::Radial {
        aux, center, radius, ..
    } = plan
    else {
        panic!("expected radial plan");
    };
    assert_eq!((aux.width, aux.height), (400, 800));
    assert!((radius - 240.0).abs() < 1e-9);
    assert_eq!(center, Point::new(200.0, 400.0));
}

#[test]
fn radial_on_one_pixel_wide_frame_is_skipped() {
    assert!(plan_overlay(&with(OverlayType::GradientRadial, 0.5, 0.5), frame(1, 10)).is_none());
}

#[test]
fn stop_alpha_interpolates_and_pads() {
    let stops = [
        ColorStop {
            offset: 0.25,
            alpha: 0,
        },
        ColorStop {
            offset: 0.5,
            alpha: 200,
        },
        ColorStop {
            offset: 0.75,
            alpha: 0,
        },
    ];
    assert_eq!(stop_alpha(&stops, 0.0), 0.0);
    assert_eq!(stop_alpha(&stops, 0.375), 100.0);
    assert_eq!(stop_alpha(&stops, 0.5), 200.0);
    assert_eq!(stop_alpha(&stops, 0.625), 100.0);
    assert_eq!(stop_alpha(&stops, 1.0), 0.0);
    assert_eq!(stop_alpha(&[], 0.5), 0.0);
}

#[test]
fn coincident_stops_step_instead_of_dividing_by_zero() {
    let stops = [
        ColorStop {
            offset: 0.5,
            alpha: 0,
        },
        ColorStop {
            offset: 0.5,
            alpha: 255,
        },
        ColorStop {
            offset: 0.5,
            alpha: 0,
        },
    ];
    assert_eq!(stop_alpha(&stops, 0.4), 0.0);
    assert_eq!(stop_alpha(&stops, 0.6), 0.0);
    assert!(stop_alpha(&stops, 0.5).is_finite());
}
