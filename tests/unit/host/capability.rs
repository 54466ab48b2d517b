use super::*;

fn ratio(r: f64) -> FrameRatio {
    FrameRatio::new(r).unwrap()
}

#[test]
fn comp_timing_scales_playback_range_when_complete() {
    let timing = CompTiming {
        start_frame: 0.0,
        end_frame: 250.0,
        playhead: 33.0,
        playback_start: Some(25.0),
        playback_end: Some(125.0),
    };
    let scaled = timing.scaled(ratio(0.96)).unwrap();
    assert_eq!(scaled.end_frame, 240.0);
    assert_eq!(scaled.playhead, 32.0);
    assert_eq!(scaled.playback_start, Some(24.0));
    assert_eq!(scaled.playback_end, Some(120.0));

    let half_open = CompTiming {
        playback_end: None,
        ..timing
    };
    let scaled = half_open.scaled(ratio(2.0)).unwrap();
    assert_eq!(scaled.playback_start, Some(25.0));
    assert_eq!(scaled.playback_end, None);
}

#[test]
fn comp_timing_rejects_unrepresentable_frames() {
    let timing = CompTiming {
        end_frame: 1e19,
        ..CompTiming::default()
    };
    assert!(timing.scaled(ratio(1.0)).is_err());
}

#[test]
fn auto_animate_offset_scales_with_ratio() {
    let b = TimingBehaviour::AutoAnimate {
        layer: "autoAnimate#3".to_owned(),
        time_offset: Some(10.0),
    };
    assert_eq!(
        b.retimed(ratio(2.4)).unwrap(),
        TimingBehaviour::AutoAnimate {
            layer: "autoAnimate#3".to_owned(),
            time_offset: Some(24.0),
        }
    );
    assert_eq!(b.layer(), "autoAnimate#3");
}

#[test]
fn frame_behaviour_keeps_visual_speed() {
    let b = TimingBehaviour::Frame {
        layer: "frame#4".to_owned(),
        mode: FrameMode::Frames,
        value: Some(1.0),
        offset: Some(5.0),
        start_frame: Some(13.0),
    };
    let TimingBehaviour::Frame {
        value,
        offset,
        start_frame,
        ..
    } = b.retimed(ratio(2.0)).unwrap()
    else {
        panic!("variant changed");
    };
    assert_eq!(value, Some(0.5));
    assert_eq!(offset, Some(10.0));
    assert_eq!(start_frame, Some(26.0));

    // 25 -> 30 fps: 13 * 1.2 = 15.6 rounds to 16.
    let TimingBehaviour::Frame { start_frame, .. } = b.retimed(ratio(1.2)).unwrap() else {
        panic!("variant changed");
    };
    assert_eq!(start_frame, Some(16.0));
}

#[test]
fn animated_or_seconds_settings_are_left_alone() {
    let animated = TimingBehaviour::Frame {
        layer: "frame#4".to_owned(),
        mode: FrameMode::Frames,
        value: None,
        offset: Some(4.0),
        start_frame: None,
    };
    let TimingBehaviour::Frame {
        value, start_frame, ..
    } = animated.retimed(ratio(2.0)).unwrap()
    else {
        panic!("variant changed");
    };
    assert_eq!((value, start_frame), (None, None));

    let seconds = TimingBehaviour::Frame {
        layer: "frame#5".to_owned(),
        mode: FrameMode::Seconds,
        value: Some(1.0),
        offset: Some(2.0),
        start_frame: Some(3.0),
    };
    assert_eq!(seconds.retimed(ratio(2.0)).unwrap(), seconds);
}

#[test]
fn behaviour_json_is_tagged() {
    let b: TimingBehaviour =
        serde_json::from_str(r#"{"kind": "frame", "layer": "frame#1", "value": 2}"#).unwrap();
    assert_eq!(
        b,
        TimingBehaviour::Frame {
            layer: "frame#1".to_owned(),
            mode: FrameMode::Frames,
            value: Some(2.0),
            offset: None,
            start_frame: None,
        }
    );
}
