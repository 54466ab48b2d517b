use super::*;

const TOL: f64 = 1e-9;

fn approx(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

fn handles(ox: f64, oy: f64, ix: f64, iy: f64) -> HandlePair {
    HandlePair {
        out_handle: Vec2::new(ox, oy),
        in_handle: Vec2::new(ix, iy),
    }
}

#[test]
fn normalizes_reference_pair() {
    let c = to_normalized(Vec2::new(10.0, 5.0), Vec2::new(-8.0, -10.0), 24.0, 100.0).unwrap();
    assert!(approx(c.x1, 0.4167, 1e-4));
    assert!(approx(c.y1, 0.05, TOL));
    assert!(approx(c.x2, 0.6667, 1e-4));
    assert!(approx(c.y2, 0.9, TOL));
}

#[test]
fn reference_pair_rescales_to_double_duration() {
    let c = to_normalized(Vec2::new(10.0, 5.0), Vec2::new(-8.0, -10.0), 24.0, 100.0).unwrap();
    let h = to_handles(c, 48.0, 100.0);
    assert!(approx(h.out_handle.x, 20.0, TOL));
    assert!(approx(h.out_handle.y, 5.0, TOL));
    assert!(approx(h.in_handle.x, -16.0, TOL));
    assert!(approx(h.in_handle.y, -10.0, TOL));
}

#[test]
fn round_trip_preserves_handles() {
    let cases = [
        (handles(10.0, 5.0, -8.0, -10.0), 24.0, 100.0),
        (handles(3.3, -40.0, -1.25, 12.5), 7.0, -55.5),
        (handles(30.0, 0.2, -30.0, 2.0), 12.0, 0.002),
        (handles(0.0, 0.0, 0.0, 0.0), 1.0, 1.0),
        (handles(-2.0, 7.0, 4.0, -3.0), 0.5, 1e6),
    ];
    for (h, frames, values) in cases {
        let back = CubicBezier::from_handles(h, frames, values)
            .unwrap()
            .to_handles(frames, values);
        assert!(approx(back.out_handle.x, h.out_handle.x, TOL), "{h:?}");
        assert!(approx(back.out_handle.y, h.out_handle.y, TOL), "{h:?}");
        assert!(approx(back.in_handle.x, h.in_handle.x, TOL), "{h:?}");
        assert!(approx(back.in_handle.y, h.in_handle.y, TOL), "{h:?}");
    }
}

#[test]
fn overshoot_is_not_clamped() {
    // Handles reaching past the next keyframe and above the value span.
    let c = CubicBezier::from_handles(handles(36.0, 150.0, -30.0, 40.0), 24.0, 100.0).unwrap();
    assert!(c.x1 > 1.0);
    assert!(c.x2 < 0.0);
    assert!(c.y1 > 1.0);
    assert!(c.y2 > 1.0);

    let shown = c.clamped_for_display();
    assert_eq!(shown.x1, 1.0);
    assert_eq!(shown.x2, 0.0);
    assert_eq!(shown.y1, c.y1);
    assert_eq!(shown.y2, c.y2);
}

#[test]
fn flat_value_uses_identity_endpoints() {
    for values in [0.0, 0.001, -0.0005] {
        let c = CubicBezier::from_handles(handles(6.0, 3.0, -6.0, -3.0), 24.0, values).unwrap();
        assert!(c.is_finite());
        assert_eq!(c.y1, 0.0);
        assert_eq!(c.y2, 1.0);
        assert!(approx(c.x1, 0.25, TOL));
        assert!(approx(c.x2, 0.75, TOL));
    }
}

#[test]
fn zero_frame_diff_is_degenerate() {
    let err = CubicBezier::from_handles(HandlePair::default(), 0.0, 10.0).unwrap_err();
    assert!(matches!(err, RetimeError::DegenerateInterval { .. }));
    assert!(err.is_skippable());
}

#[test]
fn identity_curve_yields_zero_handles() {
    for (frames, values) in [(1.0, 1.0), (24.0, -300.0), (0.25, 1e-9)] {
        let h = CubicBezier::LINEAR.to_handles(frames, values);
        assert_eq!(h.out_handle, Vec2::ZERO);
        assert_eq!(h.in_handle.x, 0.0);
        assert_eq!(h.in_handle.y, 0.0);
    }
    assert_eq!(CubicBezier::default(), CubicBezier::LINEAR);
}

#[test]
fn text_format_and_parse() {
    let c = CubicBezier::new(0.42, 0.0, 0.58, 1.0);
    assert_eq!(c.to_string(), "0.420, 0.000, 0.580, 1.000");
    assert_eq!(c.to_css(), "cubic-bezier(0.420, 0.000, 0.580, 1.000)");

    assert_eq!("0.42, 0, 0.58, 1".parse::<CubicBezier>().unwrap(), c);
    assert_eq!(
        "  cubic-bezier(0.42,0,0.58,1) ".parse::<CubicBezier>().unwrap(),
        c
    );
    assert_eq!(
        "-0.5, 2.5, 1.5, -1".parse::<CubicBezier>().unwrap(),
        CubicBezier::new(-0.5, 2.5, 1.5, -1.0)
    );
}

#[test]
fn parse_rejects_malformed_text() {
    for bad in [
        "",
        "0.1, 0.2, 0.3",
        "0.1, 0.2, 0.3, 0.4, 0.5",
        "a, b, c, d",
        "cubic-bezier(0.1, 0.2, 0.3, 0.4",
        "0.1, NaN, 0.3, 0.4",
        "0.1, inf, 0.3, 0.4",
    ] {
        let err = bad.parse::<CubicBezier>().unwrap_err();
        assert!(matches!(err, RetimeError::Parse(_)), "{bad:?}");
    }
}

#[test]
fn ease_at_hits_endpoints_and_linear_midpoint() {
    let ease = CubicBezier::new(0.42, 0.0, 0.58, 1.0);
    assert!(approx(ease.ease_at(0.0), 0.0, 1e-9));
    assert!(approx(ease.ease_at(1.0), 1.0, 1e-9));
    // Symmetric ease-in-out passes through the centre.
    assert!(approx(ease.ease_at(0.5), 0.5, 1e-9));
    assert!(ease.ease_at(0.25) < 0.25);

    for x in [0.1, 0.3, 0.7, 0.9] {
        assert!(approx(CubicBezier::LINEAR.ease_at(x), x, 1e-9));
    }
}

#[test]
fn json_shape_is_flat() {
    let c = CubicBezier::new(0.25, 0.1, 0.25, 1.0);
    let v = serde_json::to_value(c).unwrap();
    assert_eq!(v, serde_json::json!({"x1": 0.25, "y1": 0.1, "x2": 0.25, "y2": 1.0}));
}
