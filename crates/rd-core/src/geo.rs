//! Planar position model.
//!
//! The core never needs a coordinate reference system: positions are plain
//! `(x, y)` pairs in whatever projected unit the input data uses (metres for
//! the usual British National Grid inputs), and distances come from a
//! pluggable [`Metric`].

/// A position on the simulation plane.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to `other`.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Move at most `step` units from `self` towards `target`.
    ///
    /// Returns `target` exactly once it is within reach so repeated stepping
    /// never overshoots or oscillates.
    pub fn step_towards(self, target: Point, step: f64) -> Point {
        let d = self.distance(target);
        if d <= step || d == 0.0 {
            return target;
        }
        let f = step / d;
        Point::new(self.x + (target.x - self.x) * f, self.y + (target.y - self.y) * f)
    }

    /// Cheap axis-aligned check used for quick rejection.
    #[inline]
    pub fn within_bbox(self, center: Point, half_width: f64) -> bool {
        (self.x - center.x).abs() <= half_width && (self.y - center.y).abs() <= half_width
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

// ── Metric ────────────────────────────────────────────────────────────────────

/// Distance provider.
///
/// Road-network distances are computed outside the core; anything that can
/// turn two points into a scalar plugs in here.
pub trait Metric: Send + Sync {
    fn distance(&self, a: Point, b: Point) -> f64;
}

/// Straight-line distance on the plane.  The default metric.
#[derive(Copy, Clone, Debug, Default)]
pub struct Euclidean;

impl Metric for Euclidean {
    #[inline]
    fn distance(&self, a: Point, b: Point) -> f64 {
        a.distance(b)
    }
}
