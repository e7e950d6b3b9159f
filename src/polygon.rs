use crate::error::PolygonError;
use crate::math::intersect_2d::segments_properly_intersect;
use crate::math::polygon_2d::{project_loop_to_floor, project_to_floor, signed_area_2d};
use crate::math::{Point2, Point3};

/// A candidate point closer than this to the first placed point closes the
/// loop instead of being appended.
pub const CLOSURE_TOLERANCE: f64 = 0.1;

/// Result of offering a candidate point to the polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// The point was appended as a new vertex.
    Accepted,
    /// The point snapped the loop shut; it was not appended.
    Closed,
}

/// An ordered loop of floor points captured on the XZ plane.
///
/// Insertion order defines the polygon edges between consecutive points plus
/// an implicit closing edge from the last point back to the first. Points
/// enter only through [`FloorPolygon::try_place`], which rejects any point
/// whose new edge would cross an existing non-adjacent edge, so the loop
/// stays simple by construction. After closure the polygon is read-only.
#[derive(Debug, Clone, Default)]
pub struct FloorPolygon {
    points: Vec<Point3>,
    closed: bool,
}

impl FloorPolygon {
    /// Creates an empty polygon.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The placed points, in insertion order.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Number of placed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if no points have been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns true once the loop has been snapped shut.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Offers a candidate point to the loop.
    ///
    /// With at least 3 points placed, a candidate within
    /// [`CLOSURE_TOLERANCE`] of the FIRST point closes the loop and is not
    /// appended. Otherwise the prospective edge from the last point to the
    /// candidate is tested against every existing edge except the
    /// immediately preceding one; a crossing rejects the candidate without
    /// mutating the loop. Offering points to an already closed loop is a
    /// no-op reporting [`PlacementOutcome::Closed`].
    ///
    /// # Errors
    ///
    /// Returns [`PolygonError::SelfIntersection`] naming the crossed edge.
    pub fn try_place(&mut self, candidate: Point3) -> Result<PlacementOutcome, PolygonError> {
        if self.closed {
            return Ok(PlacementOutcome::Closed);
        }

        if self.points.len() >= 3 {
            let first = self.points[0];
            if (candidate - first).norm() < CLOSURE_TOLERANCE {
                self.closed = true;
                return Ok(PlacementOutcome::Closed);
            }
        }

        if let Some(last) = self.points.last() {
            let new_a = project_to_floor(last);
            let new_b = project_to_floor(&candidate);
            // Every existing edge except the one ending at `last`.
            for edge in 0..self.points.len().saturating_sub(2) {
                let a = project_to_floor(&self.points[edge]);
                let b = project_to_floor(&self.points[edge + 1]);
                if segments_properly_intersect(&new_a, &new_b, &a, &b) {
                    return Err(PolygonError::SelfIntersection { edge });
                }
            }
        }

        self.points.push(candidate);
        Ok(PlacementOutcome::Accepted)
    }

    /// Re-validates the whole loop as a simple polygon.
    ///
    /// Tests every pair of non-adjacent edges, including the closing edge,
    /// for a proper crossing. Defensive check run immediately before
    /// triangulation; the incremental placement check should already have
    /// kept the loop simple.
    ///
    /// # Errors
    ///
    /// Returns [`PolygonError::InsufficientPoints`] for loops of fewer than
    /// 3 points and [`PolygonError::InvalidPolygon`] naming the first
    /// intersecting edge pair found.
    pub fn validate(&self) -> Result<(), PolygonError> {
        let n = self.points.len();
        if n < 3 {
            return Err(PolygonError::InsufficientPoints { count: n });
        }

        let projected = self.projected();
        for i in 0..n {
            for j in (i + 2)..n {
                // Edge n-1 wraps to edge 0; they are adjacent, not crossing.
                if i == 0 && j == n - 1 {
                    continue;
                }
                let (a0, a1) = (&projected[i], &projected[(i + 1) % n]);
                let (b0, b1) = (&projected[j], &projected[(j + 1) % n]);
                if segments_properly_intersect(a0, a1, b0, b1) {
                    return Err(PolygonError::InvalidPolygon { first: i, second: j });
                }
            }
        }
        Ok(())
    }

    /// The loop projected onto the XZ floor plane.
    #[must_use]
    pub fn projected(&self) -> Vec<Point2> {
        project_loop_to_floor(&self.points)
    }

    /// Lengths of the placed edges, in placement order.
    ///
    /// The implicit closing edge is included only once the loop is closed.
    #[must_use]
    pub fn edge_lengths(&self) -> Vec<f64> {
        let mut lengths: Vec<f64> = self
            .points
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).norm())
            .collect();
        if self.closed && self.points.len() >= 2 {
            if let (Some(last), Some(first)) = (self.points.last(), self.points.first()) {
                lengths.push((first - last).norm());
            }
        }
        lengths
    }

    /// Total length of the placed edges.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        self.edge_lengths().iter().sum()
    }

    /// Enclosed floor area of the projected loop.
    #[must_use]
    pub fn area(&self) -> f64 {
        signed_area_2d(&self.projected()).abs()
    }

    /// Reopens a closed loop, keeping its points, so placement can resume.
    ///
    /// Used when closing the loop turned out to be unusable downstream
    /// (for example, the closing edge made the polygon non-simple).
    pub fn reopen(&mut self) {
        self.closed = false;
    }

    /// Discards all points and reopens the loop for a fresh capture.
    pub fn clear(&mut self) {
        self.points.clear();
        self.closed = false;
    }
}
