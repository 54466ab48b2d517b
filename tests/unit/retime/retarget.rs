use super::*;
use crate::foundation::core::{MAX_FRAME_MAGNITUDE, round_half_up};

struct SplitMix64(u64);

impl SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + (hi - lo) * unit
    }
}

fn ratio(r: f64) -> FrameRatio {
    FrameRatio::new(r).unwrap()
}

fn strictly_increasing(v: &[i64]) -> bool {
    v.windows(2).all(|w| w[0] < w[1])
}

#[test]
fn compressing_neighbours_never_collide() {
    let out = retarget(&[10.0, 11.0, 12.0], ratio(0.5)).unwrap();
    assert_ne!(out, vec![5, 5, 6]);
    assert!(strictly_increasing(&out));
    // 12 * 0.5 lands exactly on 6, so the earlier keys give way.
    assert_eq!(out, vec![4, 5, 6]);
}

#[test]
fn less_accurate_later_key_is_pushed_forward() {
    // exact: 0.0, 0.3 -> both round to 0; the second key has the larger error.
    assert_eq!(retarget(&[0.0, 1.0], ratio(0.3)).unwrap(), vec![0, 1]);
}

#[test]
fn equal_error_favours_earlier_key() {
    // exact: 4.75, 5.25 -> both round to 5 with equal error.
    assert_eq!(retarget(&[19.0, 21.0], ratio(0.25)).unwrap(), vec![5, 6]);
}

#[test]
fn pull_back_cascades_toward_start() {
    // exact: 0.0, 0.3, 0.6 -> 0, 0, 1 naive.
    assert_eq!(retarget(&[0.0, 1.0, 2.0], ratio(0.3)).unwrap(), vec![-1, 0, 1]);
}

#[test]
fn upscaling_and_identity_keep_positions() {
    assert_eq!(
        retarget(&[0.0, 12.0, 24.0], ratio(2.0)).unwrap(),
        vec![0, 24, 48]
    );
    assert_eq!(
        retarget(&[0.0, 5.0, 10.0], ratio(1.0)).unwrap(),
        vec![0, 5, 10]
    );
    assert_eq!(retarget(&[0.4, 1.2], ratio(1.0)).unwrap(), vec![0, 1]);
}

#[test]
fn empty_and_single_inputs() {
    assert!(retarget(&[], ratio(0.5)).unwrap().is_empty());
    assert_eq!(retarget(&[7.0], ratio(2.0)).unwrap(), vec![14]);
}

#[test]
fn rejects_unordered_or_non_finite_frames() {
    assert!(matches!(
        retarget(&[4.0, 3.0], ratio(1.0)),
        Err(RetimeError::Validation(_))
    ));
    assert!(retarget(&[0.0, f64::NAN], ratio(1.0)).is_err());
}

#[test]
fn shared_input_frames_are_separated() {
    assert_eq!(retarget(&[3.0, 3.0], ratio(1.0)).unwrap(), vec![3, 4]);
    assert_eq!(
        retarget(&[0.0, 10.0, 10.0], ratio(0.5)).unwrap(),
        vec![0, 5, 6]
    );
}

#[test]
fn out_of_range_frames_fail_without_overflow() {
    for frames in [[1e19, 2e19], [-2e19, -1e19]] {
        assert!(matches!(
            retarget(&frames, ratio(1.0)),
            Err(RetimeError::Validation(_))
        ));
    }
    assert!(retarget(&[4e15, 8e15], ratio(4.0)).is_err());
    assert!(scale_frame(1e19, ratio(1.0)).is_err());
    assert!(scale_range(0.0, -1e19, ratio(1.0)).is_err());
}

#[test]
fn collisions_at_the_frame_limit_stay_in_range() {
    let top = MAX_FRAME_MAGNITUDE;
    assert_eq!(
        retarget(&[top, top], ratio(1.0)).unwrap(),
        vec![9_007_199_254_740_992, 9_007_199_254_740_993]
    );
}

#[test]
fn random_sequences_stay_ordered_and_bounded() {
    let ratios = [0.05, 0.1, 0.3, 0.5, 0.8, 1.0, 1.25, 2.0, 2.5];
    for seed in 0..500u64 {
        let mut rng = SplitMix64(seed);
        let n = 2 + (rng.next_u64() % 40) as usize;
        let mut f = rng.range(-20.0, 20.0);
        let mut frames = Vec::with_capacity(n);
        for _ in 0..n {
            frames.push(f);
            f += rng.range(0.01, 3.0);
        }

        for &r in &ratios {
            let out = retarget(&frames, ratio(r)).unwrap();
            assert_eq!(out.len(), n);
            assert!(strictly_increasing(&out), "seed {seed} ratio {r}: {out:?}");
            for (o, &frame) in out.iter().zip(&frames) {
                let naive = round_half_up(frame * r);
                assert!(
                    (o - naive).unsigned_abs() as usize <= n,
                    "seed {seed} ratio {r}: {o} vs {naive}"
                );
            }
        }
    }
}

#[test]
fn scale_frame_and_range_round() {
    let r = ratio(30.0 / 25.0);
    assert_eq!(scale_frame(10.0, r).unwrap(), 12);
    assert_eq!(scale_frame(11.0, r).unwrap(), 13);
    assert_eq!(scale_range(0.0, 249.0, r).unwrap(), (0, 299));
}
