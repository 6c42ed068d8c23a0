//! Coordinate mapping between nodes of the scene graph.
//!
//! All mapping here happens in *logical* space: positions inside a flow are
//! the same whether or not a line break separates two nodes. Converting to
//! paginated canvas space is done by the document, which knows the breaks.

use std::collections::HashSet;

use crate::error::FlowError;
use crate::geometry::{Point, ORIGIN};
use crate::scene::{Capability, NodeId, SceneGraph};
use crate::units::Length;

/// The position of `dst` relative to `src`.
///
/// Fails with [`FlowError::NoCommonAncestor`] when the nodes live in
/// disjoint trees.
pub fn map_between(scene: &SceneGraph, src: NodeId, dst: NodeId) -> Result<Point, FlowError> {
    let src_pos = scene.pos(src)?;
    let dst_pos = scene.pos(dst)?;
    if src == dst {
        return Ok(ORIGIN);
    }
    let src_parent = scene.parent(src);
    let dst_parent = scene.parent(dst);
    if src_parent.is_some() && src_parent == dst_parent {
        return Ok(dst_pos - src_pos);
    }
    if dst_parent == Some(src) {
        return Ok(dst_pos);
    }
    if src_parent == Some(dst) {
        return Ok(-src_pos);
    }

    let src_ancestors: HashSet<NodeId> = scene.ancestors(src).collect();
    let mut relative_dst = ORIGIN;
    for ancestor in scene.ancestors(dst) {
        if src_ancestors.contains(&ancestor) {
            let relative_src = descendant_pos(scene, src, ancestor)?;
            return Ok(relative_dst - relative_src);
        }
        relative_dst += scene.pos(ancestor)?;
    }
    Err(FlowError::NoCommonAncestor(src, dst))
}

/// Like [`map_between`], but only the x distance.
pub fn map_x_between(scene: &SceneGraph, src: NodeId, dst: NodeId) -> Result<Length, FlowError> {
    Ok(map_between(scene, src, dst)?.x)
}

/// The position of `descendant` relative to `ancestor`.
pub fn descendant_pos(
    scene: &SceneGraph,
    descendant: NodeId,
    ancestor: NodeId,
) -> Result<Point, FlowError> {
    let mut pos = ORIGIN;
    for node in scene.ancestors(descendant) {
        if node == ancestor {
            return Ok(pos);
        }
        pos += scene.pos(node)?;
    }
    Err(FlowError::NotAnAncestor {
        ancestor,
        descendant,
    })
}

/// The nearest node, starting at `node` itself, declaring `capability`.
pub fn first_ancestor_of_capability(
    scene: &SceneGraph,
    node: NodeId,
    capability: Capability,
) -> Result<Option<NodeId>, FlowError> {
    scene.get(node)?;
    for ancestor in scene.ancestors(node) {
        if scene.get(ancestor)?.has_capability(capability) {
            return Ok(Some(ancestor));
        }
    }
    Ok(None)
}

/// The flow container `node` is placed in, if any. A flow is not inside
/// itself.
pub fn enclosing_flow(scene: &SceneGraph, node: NodeId) -> Result<Option<NodeId>, FlowError> {
    match scene.parent(node) {
        Some(parent) => first_ancestor_of_capability(scene, parent, Capability::Flow),
        None => {
            scene.get(node)?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::NodeData;

    fn object(scene: &mut SceneGraph, parent: NodeId, x: f64, y: f64) -> NodeId {
        scene.insert(parent, NodeData::object(Point::pt(x, y))).unwrap()
    }

    #[test]
    fn same_node_maps_to_origin() {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let a = object(&mut scene, root, 5.0, 6.0);
        assert_eq!(map_between(&scene, a, a).unwrap(), ORIGIN);
    }

    #[test]
    fn fast_paths() {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let parent = object(&mut scene, root, 5.0, 6.0);
        let src = object(&mut scene, parent, 1.0, 2.0);
        let dst = object(&mut scene, parent, 3.0, 10.0);
        assert_eq!(map_between(&scene, src, dst).unwrap(), Point::pt(2.0, 8.0));

        let child = object(&mut scene, src, 3.0, 10.0);
        assert_eq!(map_between(&scene, src, child).unwrap(), Point::pt(3.0, 10.0));
        assert_eq!(map_between(&scene, child, src).unwrap(), Point::pt(-3.0, -10.0));
    }

    #[test]
    fn maps_through_lowest_common_ancestor() {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let lca = object(&mut scene, root, 100.0, 100.0);
        let left = object(&mut scene, lca, 10.0, 0.0);
        let src = object(&mut scene, left, 1.0, 1.0);
        let right = object(&mut scene, lca, 50.0, 20.0);
        let mid = object(&mut scene, right, 5.0, 5.0);
        let dst = object(&mut scene, mid, 2.0, 3.0);

        let forward = map_between(&scene, src, dst).unwrap();
        assert!(forward.approx_eq(Point::pt(57.0 - 11.0, 28.0 - 1.0)));
        let backward = map_between(&scene, dst, src).unwrap();
        assert!(backward.approx_eq(-forward));
        assert!(map_x_between(&scene, src, dst).unwrap().approx_eq(Length::pt(46.0)));
    }

    #[test]
    fn every_pair_maps_antisymmetrically() {
        use crate::layout::FlowContainer;
        use crate::scene::NodeKind;

        let mut scene = SceneGraph::new();
        let root = scene.root();
        let page = scene
            .insert(root, NodeData::new(Point::pt(600.0, 0.0), NodeKind::Page { index: 1 }))
            .unwrap();
        let flow_geometry =
            FlowContainer::new(Length::pt(2000.0), Length::pt(40.0), Length::pt(10.0)).unwrap();
        let flow = scene
            .insert(page, NodeData::new(Point::pt(12.0, 30.0), NodeKind::Flow(flow_geometry)))
            .unwrap();
        let in_flow = object(&mut scene, flow, 900.0, 5.0);
        let nested = object(&mut scene, in_flow, -3.0, 8.0);
        let sibling = object(&mut scene, flow, 1500.0, -2.0);
        let other_branch = object(&mut scene, root, 40.0, 70.0);
        let cousin = object(&mut scene, other_branch, 1.5, 2.5);

        let nodes = [root, page, flow, in_flow, nested, sibling, other_branch, cousin];
        for &a in &nodes {
            assert_eq!(map_between(&scene, a, a).unwrap(), ORIGIN);
            for &b in &nodes {
                let forward = map_between(&scene, a, b).unwrap();
                let backward = map_between(&scene, b, a).unwrap();
                assert!(forward.approx_eq(-backward), "{a:?} -> {b:?}");
            }
        }
        assert!(map_between(&scene, cousin, nested)
            .unwrap()
            .approx_eq(Point::pt(600.0 + 12.0 + 900.0 - 3.0 - 41.5, 30.0 + 5.0 + 8.0 - 72.5)));
    }

    #[test]
    fn ancestor_and_descendant_map_both_ways() {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let top = object(&mut scene, root, 7.0, 7.0);
        let middle = object(&mut scene, top, 1.0, 2.0);
        let bottom = object(&mut scene, middle, 3.0, 4.0);
        assert_eq!(map_between(&scene, top, bottom).unwrap(), Point::pt(4.0, 6.0));
        assert_eq!(map_between(&scene, bottom, top).unwrap(), Point::pt(-4.0, -6.0));
        assert_eq!(descendant_pos(&scene, bottom, top).unwrap(), Point::pt(4.0, 6.0));
    }

    #[test]
    fn disjoint_trees_have_no_common_ancestor() {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let attached = object(&mut scene, root, 1.0, 1.0);
        let loose = scene.insert_detached(NodeData::object(Point::pt(2.0, 2.0))).unwrap();
        let loose_child = object(&mut scene, loose, 1.0, 1.0);
        assert_eq!(
            map_between(&scene, attached, loose_child),
            Err(FlowError::NoCommonAncestor(attached, loose_child))
        );
    }

    #[test]
    fn descendant_pos_rejects_non_ancestors() {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let a = object(&mut scene, root, 1.0, 1.0);
        let b = object(&mut scene, root, 2.0, 2.0);
        assert!(matches!(
            descendant_pos(&scene, a, b),
            Err(FlowError::NotAnAncestor { .. })
        ));
    }

    #[test]
    fn capability_lookup_includes_self() {
        let mut scene = SceneGraph::new();
        let staff = scene
            .insert(
                scene.root(),
                NodeData::object(Point::default()).with_capability(Capability::Staff),
            )
            .unwrap();
        let note = object(&mut scene, staff, 1.0, 0.0);
        assert_eq!(
            first_ancestor_of_capability(&scene, note, Capability::Staff).unwrap(),
            Some(staff)
        );
        assert_eq!(
            first_ancestor_of_capability(&scene, staff, Capability::Staff).unwrap(),
            Some(staff)
        );
        assert_eq!(
            first_ancestor_of_capability(&scene, note, Capability::Flow).unwrap(),
            None
        );
    }
}
