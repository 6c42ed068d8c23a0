//! Error type shared by every layout operation.

use thiserror::Error;

use crate::render::SegmentKind;
use crate::scene::NodeId;

/// Everything that can go wrong while laying out or rendering a document.
///
/// The structural variants (`OutOfBounds`, `NoCommonAncestor`, ...) mean the
/// scene graph was malformed or queried incorrectly; callers are expected to
/// propagate them rather than recover.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    #[error("Flow position {x:.3}pt lies outside the flow (length {length:.3}pt).")]
    OutOfBounds { x: f64, length: f64 },
    #[error("Nodes {0:?} and {1:?} have no common ancestor.")]
    NoCommonAncestor(NodeId, NodeId),
    #[error("Node {ancestor:?} is not an ancestor of {descendant:?}.")]
    NotAnAncestor { ancestor: NodeId, descendant: NodeId },
    #[error("Node {0:?} does not exist in the scene.")]
    UnknownNode(NodeId),
    #[error("Cannot move node {node:?} under its own descendant {parent:?}.")]
    CyclicParent { node: NodeId, parent: NodeId },
    #[error("Node {0:?} is not a flow container.")]
    NotAFlow(NodeId),
    #[error("Node {0:?} is not placed on any page.")]
    NoAncestorPage(NodeId),
    #[error("Primitive does not implement {0:?} rendering.")]
    SegmentNotImplemented(SegmentKind),
    #[error("Invalid paper: {0}")]
    InvalidPaper(String),
    #[error("Invalid flow geometry: {0}")]
    InvalidFlowGeometry(String),
    #[error("Breakable extent of node {node:?} is negative ({extent:.3}pt).")]
    NegativeExtent { node: NodeId, extent: f64 },
    #[error("Invalid layout configuration: {0}")]
    Config(String),
}
