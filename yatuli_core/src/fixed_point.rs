//! Integer helpers for the value mapping.
//!
//! Values are `i64` and steps `u32`, so `step * mapped` products of any
//! `i32` reading fit; the helpers still saturate rather than wrap.

/// Integer division rounded to nearest, ties away from zero. `d` must be > 0.
#[inline]
pub fn div_round_nearest_i64(n: i64, d: i64) -> i64 {
    debug_assert!(d > 0, "divisor must be positive");
    let d = d.max(1);
    let half = d / 2;
    if n >= 0 {
        n.saturating_add(half) / d
    } else {
        n.saturating_sub(half) / d
    }
}

/// Linear map of a centered reading to a value offset:
/// `floor(sample / counts_per_step) * step`.
///
/// Floor (not truncation) keeps every bucket the same width on both sides of zero.
#[inline]
pub fn map_sample(sample: i32, counts_per_step: u32, step: u32) -> i64 {
    let units = i64::from(sample).div_euclid(i64::from(counts_per_step.max(1)));
    units.saturating_mul(i64::from(step))
}

/// Snap `v` to the nearest point of the grid `anchor + k * step`.
#[inline]
pub fn snap_to_grid(v: i64, anchor: i64, step: u32) -> i64 {
    let step = i64::from(step.max(1));
    let k = div_round_nearest_i64(v.saturating_sub(anchor), step);
    anchor.saturating_add(k.saturating_mul(step))
}

/// Move `v` by `delta` and round outward onto the grid `anchor + k * step`:
/// up to the next grid point for positive `delta`, down for negative.
///
/// `None` when the result does not fit in `i64`.
#[inline]
pub fn step_onto_grid(v: i64, delta: i64, anchor: i64, step: u32) -> Option<i64> {
    let step = i128::from(step.max(1));
    let anchor = i128::from(anchor);
    let target = i128::from(v) + i128::from(delta);
    let mut g = anchor + (target - anchor).div_euclid(step) * step;
    if delta > 0 && g < target {
        g += step;
    }
    i64::try_from(g).ok()
}

/// Absolute difference of two i32 values as u32 without overflow.
#[inline]
pub fn abs_diff_i32_u32(a: i32, b: i32) -> u32 {
    let diff = i64::from(a) - i64::from(b);
    let mag = diff.unsigned_abs();
    debug_assert!(
        mag <= u64::from(u32::MAX),
        "abs_diff_i32_u32: magnitude out of u32 range: {mag}"
    );
    mag as u32
}
