use super::*;
use crate::timeline::keyframe::{Interpolation, Keyframe};

fn fps(v: f64) -> Fps {
    Fps::new(v).unwrap()
}

#[test]
fn labels_split_camel_case() {
    assert_eq!(
        property_label(&AttributeId::new("basicShape#1.positionX")),
        "Position X"
    );
    assert_eq!(property_label(&AttributeId::new("opacity")), "Opacity");
    assert_eq!(
        property_label(&AttributeId::new("text#2.position.x")),
        "Position.x"
    );
}

#[test]
fn summary_clamps_easing_and_formats_text() {
    let a = Keyframe::bezier(0.0, 0.0).with_out_handle(30.0, 10.0);
    let b = Keyframe::bezier(24.0, 100.0).with_in_handle(-6.0, 0.0);
    let attr = AttributeId::new("basicShape#1.positionX");

    let s = KeyframeSummary::from_pair(&attr, KeyframePair::new(&a, &b), fps(24.0)).unwrap();
    assert_eq!(s.easing, CubicBezier::new(1.0, 0.1, 0.75, 1.0));
    assert_eq!(s.duration_ms, 1000);
    assert_eq!(s.duration_text(), "Position X: 1000ms (24 frames @ 24fps)");
    assert_eq!(s.values_text(), "Position X 0 > 100");
    assert_eq!(
        s.full_text(),
        "Position X 0 > 100\nEasing: cubic-bezier(1.000, 0.100, 0.750, 1.000)\nDuration: 1000ms @ 24fps\n"
    );
}

#[test]
fn summary_rounds_values_to_hundredths() {
    let a = Keyframe::new(10.0, 1.23456, Interpolation::Linear);
    let b = Keyframe::new(25.0, -7.891, Interpolation::Linear);
    let s = KeyframeSummary::from_pair(
        &AttributeId::new("scale"),
        KeyframePair::new(&a, &b),
        fps(30.0),
    )
    .unwrap();
    assert_eq!(s.start_value, 1.23);
    assert_eq!(s.end_value, -7.89);
    assert_eq!(s.easing, CubicBezier::LINEAR);
    assert_eq!(s.duration_ms, 500);
}

#[test]
fn summary_rejects_step_and_reversed_pairs() {
    let attr = AttributeId::new("opacity");
    let step = Keyframe::new(0.0, 0.0, Interpolation::Step);
    let b = Keyframe::bezier(10.0, 1.0);
    assert!(KeyframeSummary::from_pair(&attr, KeyframePair::new(&step, &b), fps(24.0)).is_err());

    let a = Keyframe::bezier(20.0, 0.0);
    assert!(KeyframeSummary::from_pair(&attr, KeyframePair::new(&a, &b), fps(24.0)).is_err());
}
