//! Overlap predicate: decides whether two circles become an edge.
//!
//! Two circles overlap when the distance between their centers is at
//! most the sum of their radii. Circles that exactly touch count as
//! overlapping. A node never overlaps itself, or any other node at the
//! same center, whatever the radii.

use geo::line_measures::Distance;
use geo::Euclidean;

use crate::types::{Node, Point};

/// Convert a circlink `Point` to a `geo::Point`.
const fn to_geo(p: Point) -> geo::Point<f64> {
    geo::Point(geo::Coord { x: p.x, y: p.y })
}

/// Returns `true` if the circles of `a` and `b` intersect or touch.
///
/// Symmetric in its arguments. Nodes sharing a center are never an
/// edge, so self-pairs are always rejected.
#[must_use]
pub fn is_edge(a: &Node, b: &Node) -> bool {
    if a.same_origin(b) {
        return false;
    }

    let dist = Euclidean.distance(to_geo(a.center()), to_geo(b.center()));
    let radii_sum = a.r + b.r;

    radii_sum >= dist
}
