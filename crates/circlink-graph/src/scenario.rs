//! Caller-supplied input: the field, its circles, and the two boundary
//! points to connect.

use serde::{Deserialize, Serialize};

use crate::types::{Bounds, Node, Point};

/// One complete connectivity question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Declared field dimensions. Carried only, never enforced.
    #[serde(default)]
    pub bounds: Bounds,

    /// Circles in any order.
    pub nodes: Vec<Node>,

    /// Boundary point the path must start from.
    #[serde(default)]
    pub start: Option<Point>,

    /// Boundary point the path must reach.
    #[serde(default)]
    pub end: Option<Point>,
}

/// Errors that make a [`Scenario`] unusable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScenarioError {
    /// A node cannot be placed in a graph.
    #[error("node {index} is invalid: {reason}")]
    InvalidNode {
        /// Position of the node in [`Scenario::nodes`].
        index: usize,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A query point has a non-finite coordinate.
    #[error("{which} point {point} is invalid: coordinates must be finite")]
    InvalidPoint {
        /// `"start"` or `"end"`.
        which: &'static str,
        /// The offending point.
        point: Point,
    },
}

impl Scenario {
    /// The built-in sample: six radius-2 circles on the diagonal of a
    /// 10x10 field, linking `(0, 10)` to `(10, 0)`.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            bounds: Bounds::new(10.0, 10.0),
            nodes: vec![
                Node::new(4.0, 6.0, 2.0),
                Node::new(0.0, 10.0, 2.0),
                Node::new(6.0, 4.0, 2.0),
                Node::new(2.0, 8.0, 2.0),
                Node::new(10.0, 0.0, 2.0),
                Node::new(8.0, 2.0, 2.0),
            ],
            start: Some(Point::new(0.0, 10.0)),
            end: Some(Point::new(10.0, 0.0)),
        }
    }

    /// Check every node and query point.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::InvalidNode`] for the first node with a
    /// non-finite coordinate or a negative radius, and
    /// [`ScenarioError::InvalidPoint`] for a query point with a
    /// non-finite coordinate.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        for (index, node) in self.nodes.iter().enumerate() {
            if let Some(reason) = node.defect() {
                return Err(ScenarioError::InvalidNode { index, reason });
            }
        }

        for (which, point) in [("start", self.start), ("end", self.end)] {
            if let Some(point) = point
                && !(point.x.is_finite() && point.y.is_finite())
            {
                return Err(ScenarioError::InvalidPoint { which, point });
            }
        }

        Ok(())
    }
}
