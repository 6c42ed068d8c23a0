//! Scene graph: an arena of positioned nodes addressed by stable handles.
//!
//! Every node stores its position relative to its parent. Parents are plain
//! handles into the arena, so a node never owns its parent and the arena is
//! the single owner of every node. The root is the document node; pages are
//! its children and everything else hangs below a page.

use indextree::Arena;
pub use indextree::NodeId;

use crate::error::FlowError;
use crate::geometry::Point;
use crate::layout::FlowContainer;
use crate::spanner::SpannerEnd;
use crate::units::{Length, ZERO};

// ═══════════════════════════════════════════════════════════════════════
// Capabilities
// ═══════════════════════════════════════════════════════════════════════

/// Structural roles a node can declare, used for ancestor lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Document,
    Page,
    Flow,
    /// A preferred position for a line break
    BreakOpportunity,
    /// A staff or staff-like grouping owned by a higher layer
    Staff,
}

impl Capability {
    const fn bit(self) -> u8 {
        match self {
            Capability::Document => 1 << 0,
            Capability::Page => 1 << 1,
            Capability::Flow => 1 << 2,
            Capability::BreakOpportunity => 1 << 3,
            Capability::Staff => 1 << 4,
        }
    }
}

/// A small set of [`Capability`] values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn of(capability: Capability) -> Self {
        Self(capability.bit())
    }

    pub const fn with(self, capability: Capability) -> Self {
        Self(self.0 | capability.bit())
    }

    pub const fn contains(self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Node data
// ═══════════════════════════════════════════════════════════════════════

/// How far a node may be cut by line and page breaks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extent {
    /// A fixed length along the flow axis; zero for atomic nodes
    Fixed(Length),
    /// Derived from a spanner's end anchor
    Spanner(SpannerEnd),
}

impl Default for Extent {
    fn default() -> Self {
        Extent::Fixed(ZERO)
    }
}

#[derive(Debug, Default)]
pub enum NodeKind {
    #[default]
    Object,
    Document,
    Page {
        index: usize,
    },
    Flow(FlowContainer),
}

impl NodeKind {
    fn implied_capabilities(&self) -> Capabilities {
        match self {
            NodeKind::Object => Capabilities::empty(),
            NodeKind::Document => Capabilities::of(Capability::Document),
            NodeKind::Page { .. } => Capabilities::of(Capability::Page),
            NodeKind::Flow(_) => Capabilities::of(Capability::Flow),
        }
    }
}

#[derive(Debug, Default)]
pub struct NodeData {
    /// Position relative to the parent
    pub pos: Point,
    pub extent: Extent,
    kind: NodeKind,
    capabilities: Capabilities,
}

impl NodeData {
    pub fn new(pos: Point, kind: NodeKind) -> Self {
        let capabilities = kind.implied_capabilities();
        Self {
            pos,
            extent: Extent::default(),
            kind,
            capabilities,
        }
    }

    /// A plain object node.
    pub fn object(pos: Point) -> Self {
        Self::new(pos, NodeKind::Object)
    }

    pub fn with_extent(mut self, extent: Extent) -> Self {
        self.extent = extent;
        self
    }

    /// Declare an additional capability.
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities = self.capabilities.with(capability);
        self
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn as_flow(&self) -> Option<&FlowContainer> {
        match &self.kind {
            NodeKind::Flow(flow) => Some(flow),
            _ => None,
        }
    }

    pub fn page_index(&self) -> Option<usize> {
        match self.kind {
            NodeKind::Page { index } => Some(index),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SceneGraph
// ═══════════════════════════════════════════════════════════════════════

/// The node arena plus a revision counter that changes on every mutation.
///
/// Derived layout state (flow breaks) is stamped with the revision it was
/// computed at, and is recomputed whenever the stamp no longer matches.
#[derive(Debug)]
pub struct SceneGraph {
    arena: Arena<NodeData>,
    root: NodeId,
    revision: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeData::new(Point::default(), NodeKind::Document));
        Self {
            arena,
            root,
            revision: 0,
        }
    }

    /// The document root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Mark all derived layout state as stale.
    pub fn invalidate(&mut self) {
        self.revision += 1;
    }

    /// Add `data` as the last child of `parent`.
    pub fn insert(&mut self, parent: NodeId, data: NodeData) -> Result<NodeId, FlowError> {
        self.get(parent)?;
        let extent = data.extent;
        let id = self.arena.new_node(data);
        if let Err(err) = check_extent(id, extent) {
            id.remove(&mut self.arena);
            return Err(err);
        }
        parent.append(id, &mut self.arena);
        self.invalidate();
        Ok(id)
    }

    /// Create a node with no parent, e.g. a subtree built before it is
    /// attached with [`SceneGraph::set_parent`].
    pub fn insert_detached(&mut self, data: NodeData) -> Result<NodeId, FlowError> {
        let extent = data.extent;
        let id = self.arena.new_node(data);
        if let Err(err) = check_extent(id, extent) {
            id.remove(&mut self.arena);
            return Err(err);
        }
        self.invalidate();
        Ok(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.get(id).is_some_and(|node| !node.is_removed())
    }

    pub fn get(&self, id: NodeId) -> Result<&NodeData, FlowError> {
        match self.arena.get(id) {
            Some(node) if !node.is_removed() => Ok(node.get()),
            _ => Err(FlowError::UnknownNode(id)),
        }
    }

    /// Mutable access. Invalidates derived layout state.
    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut NodeData, FlowError> {
        match self.arena.get_mut(id) {
            Some(node) if !node.is_removed() => {
                self.revision += 1;
                Ok(node.get_mut())
            }
            _ => Err(FlowError::UnknownNode(id)),
        }
    }

    /// Mutable access to a flow container's geometry. Invalidates derived
    /// layout state.
    pub fn flow_mut(&mut self, id: NodeId) -> Result<&mut FlowContainer, FlowError> {
        match &mut self.get_mut(id)?.kind {
            NodeKind::Flow(flow) => Ok(flow),
            _ => Err(FlowError::NotAFlow(id)),
        }
    }

    pub fn pos(&self, id: NodeId) -> Result<Point, FlowError> {
        Ok(self.get(id)?.pos)
    }

    pub fn set_pos(&mut self, id: NodeId, pos: Point) -> Result<(), FlowError> {
        self.get_mut(id)?.pos = pos;
        Ok(())
    }

    /// Set a fixed breakable extent. Negative extents are rejected.
    pub fn set_extent(&mut self, id: NodeId, extent: Extent) -> Result<(), FlowError> {
        check_extent(id, extent)?;
        self.get_mut(id)?.extent = extent;
        Ok(())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|node| node.parent())
    }

    /// Move `id` (and its subtree) under `new_parent`.
    pub fn set_parent(&mut self, id: NodeId, new_parent: NodeId) -> Result<(), FlowError> {
        self.get(id)?;
        self.get(new_parent)?;
        if new_parent.ancestors(&self.arena).any(|a| a == id) {
            return Err(FlowError::CyclicParent {
                node: id,
                parent: new_parent,
            });
        }
        id.detach(&mut self.arena);
        new_parent.append(id, &mut self.arena);
        self.invalidate();
        Ok(())
    }

    /// Remove a node and its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<(), FlowError> {
        self.get(id)?;
        id.remove_subtree(&mut self.arena);
        self.invalidate();
        Ok(())
    }

    /// The parent chain of `id`, starting with `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.ancestors(&self.arena)
    }

    /// Every node in the subtree of `id`, excluding `id`, in document order.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.descendants(&self.arena).skip(1)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    /// Descendants of `id` declaring `capability`.
    pub fn descendants_with_capability(
        &self,
        id: NodeId,
        capability: Capability,
    ) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(id).filter(move |&d| {
            self.arena
                .get(d)
                .is_some_and(|node| node.get().has_capability(capability))
        })
    }
}

fn check_extent(id: NodeId, extent: Extent) -> Result<(), FlowError> {
    match extent {
        Extent::Fixed(length) if length < ZERO => Err(FlowError::NegativeExtent {
            node: id,
            extent: length.to_pt(),
        }),
        _ => Ok(()),
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_sets_combine() {
        let caps = Capabilities::of(Capability::Page).with(Capability::Staff);
        assert!(caps.contains(Capability::Page));
        assert!(caps.contains(Capability::Staff));
        assert!(!caps.contains(Capability::Flow));
    }

    #[test]
    fn kind_implies_capability() {
        let page = NodeData::new(Point::default(), NodeKind::Page { index: 2 });
        assert!(page.has_capability(Capability::Page));
        assert_eq!(page.page_index(), Some(2));
        let hint = NodeData::object(Point::default()).with_capability(Capability::BreakOpportunity);
        assert!(hint.has_capability(Capability::BreakOpportunity));
        assert!(!hint.has_capability(Capability::Page));
    }

    #[test]
    fn mutations_bump_revision() {
        let mut scene = SceneGraph::new();
        let start = scene.revision();
        let node = scene.insert(scene.root(), NodeData::object(Point::pt(1.0, 2.0))).unwrap();
        assert!(scene.revision() > start);
        let after_insert = scene.revision();
        scene.set_pos(node, Point::pt(3.0, 4.0)).unwrap();
        assert!(scene.revision() > after_insert);
        assert_eq!(scene.pos(node).unwrap(), Point::pt(3.0, 4.0));
    }

    #[test]
    fn reparenting_under_own_descendant_is_rejected() {
        let mut scene = SceneGraph::new();
        let a = scene.insert(scene.root(), NodeData::object(Point::default())).unwrap();
        let b = scene.insert(a, NodeData::object(Point::default())).unwrap();
        assert!(matches!(scene.set_parent(a, b), Err(FlowError::CyclicParent { .. })));
        let c = scene.insert(scene.root(), NodeData::object(Point::default())).unwrap();
        scene.set_parent(b, c).unwrap();
        assert_eq!(scene.parent(b), Some(c));
    }

    #[test]
    fn negative_extent_is_rejected() {
        let mut scene = SceneGraph::new();
        let node = scene.insert(scene.root(), NodeData::object(Point::default())).unwrap();
        let result = scene.set_extent(node, Extent::Fixed(Length::pt(-1.0)));
        assert!(matches!(result, Err(FlowError::NegativeExtent { .. })));
        let inserted = scene.insert(
            scene.root(),
            NodeData::object(Point::default()).with_extent(Extent::Fixed(Length::pt(-2.0))),
        );
        assert!(matches!(inserted, Err(FlowError::NegativeExtent { .. })));
    }

    #[test]
    fn removed_nodes_are_unknown() {
        let mut scene = SceneGraph::new();
        let node = scene.insert(scene.root(), NodeData::object(Point::default())).unwrap();
        scene.remove(node).unwrap();
        assert!(!scene.contains(node));
        assert_eq!(scene.get(node).unwrap_err(), FlowError::UnknownNode(node));
    }

    #[test]
    fn failed_lookup_keeps_revision() {
        let mut scene = SceneGraph::new();
        let node = scene.insert(scene.root(), NodeData::object(Point::default())).unwrap();
        scene.remove(node).unwrap();
        let before = scene.revision();
        assert!(scene.get_mut(node).is_err());
        assert!(scene.set_pos(node, Point::pt(1.0, 1.0)).is_err());
        assert_eq!(scene.revision(), before);
    }
}
