//! Spanners: nodes whose extent runs from their own position to an end
//! anchor placed relative to another node.
//!
//! The start of a spanner is the node's own position (relative to its parent,
//! the start anchor). The end is `end_x` (and optionally `end_y`) relative to
//! `end_parent`, which may be the spanner node itself. A spanner in a flow
//! must have its end anchor in the same flow.

use crate::error::FlowError;
use crate::geometry::Point;
use crate::mapping::{map_between, map_x_between};
use crate::scene::{Extent, NodeId, SceneGraph};
use crate::units::{Length, ZERO};

/// End anchor of a spanner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpannerEnd {
    pub end_parent: NodeId,
    pub end_x: Length,
    /// Explicit end y. `None` keeps the spanner horizontal.
    pub end_y: Option<Length>,
}

impl SpannerEnd {
    /// A horizontal spanner ending at `end_x` relative to `end_parent`.
    pub fn horizontal(end_parent: NodeId, end_x: Length) -> Self {
        Self {
            end_parent,
            end_x,
            end_y: None,
        }
    }

    /// A spanner ending at an arbitrary point relative to `end_parent`.
    pub fn at_point(end_parent: NodeId, end: Point) -> Self {
        Self {
            end_parent,
            end_x: end.x,
            end_y: Some(end.y),
        }
    }
}

/// Resolve a node's breakable extent.
pub fn breakable_extent(scene: &SceneGraph, node: NodeId) -> Result<Length, FlowError> {
    let length = match scene.get(node)?.extent {
        Extent::Fixed(length) => length,
        Extent::Spanner(end) => spanner_x_length(scene, node, &end)?,
    };
    if length < ZERO {
        return Err(FlowError::NegativeExtent {
            node,
            extent: length.to_pt(),
        });
    }
    Ok(length)
}

/// The x-axis length of the spanner starting at `node`.
pub fn spanner_x_length(
    scene: &SceneGraph,
    node: NodeId,
    end: &SpannerEnd,
) -> Result<Length, FlowError> {
    if end.end_parent == node {
        return Ok(end.end_x);
    }
    Ok(map_x_between(scene, node, end.end_parent)? + end.end_x)
}

/// The end point relative to `end_parent`. A horizontal spanner's end y is
/// the start's y in the end parent's space.
pub fn end_pos(scene: &SceneGraph, node: NodeId, end: &SpannerEnd) -> Result<Point, FlowError> {
    let end_y = match end.end_y {
        Some(y) => y,
        None if end.end_parent == node => ZERO,
        None => map_between(scene, end.end_parent, node)?.y,
    };
    Ok(Point::new(end.end_x, end_y))
}

/// The end point relative to the spanner's start.
pub fn relative_end_pos(scene: &SceneGraph, node: NodeId, end: &SpannerEnd) -> Result<Point, FlowError> {
    let to_end_parent = map_between(scene, node, end.end_parent)?;
    Ok(to_end_parent + end_pos(scene, node, end)?)
}

/// Straight-line distance from start to end, on both axes.
pub fn spanner_2d_length(scene: &SceneGraph, node: NodeId, end: &SpannerEnd) -> Result<Length, FlowError> {
    let delta = relative_end_pos(scene, node, end)?;
    Ok(Length::pt(delta.x.to_pt().hypot(delta.y.to_pt())))
}

/// Angle from start to end in degrees. Positive angles point down the page.
pub fn spanner_angle(scene: &SceneGraph, node: NodeId, end: &SpannerEnd) -> Result<f64, FlowError> {
    let delta = relative_end_pos(scene, node, end)?;
    Ok(delta.y.to_pt().atan2(delta.x.to_pt()).to_degrees())
}

/// The point at `ratio` (0 = start, 1 = end) along the spanner, relative to
/// its start. Ratios outside `0..=1` extrapolate.
pub fn point_along_spanner(
    scene: &SceneGraph,
    node: NodeId,
    end: &SpannerEnd,
    ratio: f64,
) -> Result<Point, FlowError> {
    Ok(relative_end_pos(scene, node, end)? * ratio)
}
