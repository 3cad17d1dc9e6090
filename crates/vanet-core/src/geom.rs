//! Planar geometry for the simulation area.
//!
//! Positions are metres in a flat 2-D plane with the origin at the area's
//! south-west corner.  `f64` throughout: the channel model multiplies several
//! factors in [0, 1] and single precision would lose meaningful bits.

/// A position in the simulation plane, in metres.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other` in metres.
    #[inline]
    pub fn distance(self, other: Point2) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl std::fmt::Display for Point2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

// ── Rect ──────────────────────────────────────────────────────────────────────

/// An axis-aligned rectangle, normalised so `min <= max` on both axes.
///
/// Used for obstacle footprints and congestion zones.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub min: Point2,
    pub max: Point2,
}

impl Rect {
    /// Build a rectangle from any two opposite corners.
    pub fn new(a: Point2, b: Point2) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// `true` if `p` lies inside or on the boundary.
    #[inline]
    pub fn contains(&self, p: Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// `true` if the segment `a`–`b` crosses any of the four edges.
    ///
    /// A segment with both endpoints strictly inside the rectangle crosses no
    /// edge and returns `false`; radio nodes are never placed inside
    /// obstacles, so that case does not arise in practice.
    pub fn crossed_by(&self, a: Point2, b: Point2) -> bool {
        let tl = Point2::new(self.min.x, self.max.y);
        let tr = self.max;
        let bl = self.min;
        let br = Point2::new(self.max.x, self.min.y);
        segments_intersect(a, b, bl, br)
            || segments_intersect(a, b, br, tr)
            || segments_intersect(a, b, tr, tl)
            || segments_intersect(a, b, tl, bl)
    }
}

// ── Segment predicates ────────────────────────────────────────────────────────

/// Twice the signed area of the triangle `o`-`a`-`b`.
#[inline]
fn cross(o: Point2, a: Point2, b: Point2) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// `true` if `p` lies on the closed segment `a`–`b`, assuming collinearity.
#[inline]
fn on_segment(a: Point2, b: Point2, p: Point2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Segment intersection test, including touching and collinear overlap.
pub fn segments_intersect(p1: Point2, p2: Point2, q1: Point2, q2: Point2) -> bool {
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    // Degenerate cases: an endpoint lies on the other segment.
    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

/// Shortest distance from `p` to the closed segment `a`–`b`, in metres.
pub fn point_segment_distance(p: Point2, a: Point2, b: Point2) -> f64 {
    let seg = Point2::new(b.x - a.x, b.y - a.y);
    let len2 = seg.x * seg.x + seg.y * seg.y;
    if len2 == 0.0 {
        return p.distance(a);
    }
    // Project p onto the segment, clamping to the endpoints.
    let t = (((p.x - a.x) * seg.x + (p.y - a.y) * seg.y) / len2).clamp(0.0, 1.0);
    p.distance(Point2::new(a.x + t * seg.x, a.y + t * seg.y))
}
