use core::f64::consts::FRAC_PI_2;

/// Ratio between the maximum draggable distance and the maximum pull height.
pub const PULL_CAP_DIVISOR: f64 = 2.5;

/// Ease-out sine mapping from raw drag distance to pull height.
///
/// `height = C * sin((distance / D) * π/2)` with `D = max_distance` and `C = D / 2.5`.
/// The distance is clamped to `[0, D]`, so the output stays within `[0, C]` and never
/// decreases as the drag grows.
pub fn ease_out_sine(distance: f64, max_distance: f64) -> f64 {
    let cap = max_distance / PULL_CAP_DIVISOR;
    let t = distance.clamp(0.0, max_distance);
    cap * ((t / max_distance) * FRAC_PI_2).sin()
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PullEasing {
    max_distance: f64,
}

impl PullEasing {
    pub fn new(max_distance: f64) -> Self {
        Self { max_distance }
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// The asymptotic cap on pull height.
    pub fn max_height(&self) -> f64 {
        self.max_distance / PULL_CAP_DIVISOR
    }

    pub fn sample(&self, distance: f64) -> f64 {
        ease_out_sine(distance, self.max_distance)
    }
}
