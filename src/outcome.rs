//! Mapping between segment indices and wheel angles.
//!
//! Segments are laid out clockwise from angle 0 (three o'clock). The pointer
//! sits at the top of the wheel, and the wheel surface is rotated by
//! `angle - π/2` when drawn, so a wheel angle `a` puts the point at angle `-a`
//! of the unrotated wheel under the pointer.

use std::f64::consts::TAU;

/// Angular size of one wedge.
#[inline]
pub fn arc_width(segment_count: usize) -> f64 {
    TAU / segment_count as f64
}

/// Wheel angle in `[0, 2π)` that brings the center of segment `index` under the pointer.
///
/// `segment_count` must be at least 1; `WheelConfig` guarantees that.
pub fn angle_for_segment(index: usize, segment_count: usize) -> f64 {
    let n = segment_count as f64;
    let i = (index % segment_count) as f64;
    ((n - i - 0.5).rem_euclid(n)) * arc_width(segment_count)
}

/// Segment under the pointer at wheel angle `angle`.
///
/// Exact left inverse of [`angle_for_segment`] at wedge centers. Called once
/// per frame, so it stays O(1) with a single division.
pub fn segment_at_angle(angle: f64, segment_count: usize) -> usize {
    let n = segment_count as f64;
    let raw = (n - (angle / TAU) * n).floor();
    if !raw.is_finite() {
        return 0;
    }
    (raw as i64).rem_euclid(segment_count as i64) as usize
}
