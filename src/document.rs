//! The document: scene graph, pages and layout configuration together.
//!
//! Most callers only need this type. It owns the scene, creates pages on
//! demand, builds flows with the configured defaults, and resolves canvas
//! positions through flow break layouts.

use crate::config::LayoutConfig;
use crate::error::FlowError;
use crate::geometry::Point;
use crate::layout::{FlowContainer, FlowLayout};
use crate::mapping::{self, enclosing_flow};
use crate::page::PageSupplier;
use crate::paper::Paper;
use crate::render::{self, FlowRender, Segment};
use crate::scene::{Capability, Extent, NodeData, NodeId, NodeKind, SceneGraph};
use crate::spanner::SpannerEnd;
use crate::units::Length;

#[derive(Debug)]
pub struct Document {
    scene: SceneGraph,
    pages: PageSupplier,
    config: LayoutConfig,
}

impl Document {
    /// A document with its first page already generated.
    pub fn new(config: LayoutConfig) -> Result<Self, FlowError> {
        config.validate()?;
        let mut scene = SceneGraph::new();
        let mut pages = PageSupplier::new(config.paper, config.display_gap)?;
        pages.ensure(&mut scene, 0)?;
        Ok(Self {
            scene,
            pages,
            config,
        })
    }

    /// A document on `paper` with default flow settings.
    pub fn with_paper(paper: Paper) -> Result<Self, FlowError> {
        Self::new(LayoutConfig {
            paper,
            ..LayoutConfig::default()
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Direct scene access. Every mutation invalidates cached layouts.
    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    pub fn pages(&self) -> &PageSupplier {
        &self.pages
    }

    pub fn paper(&self) -> &Paper {
        self.pages.paper()
    }

    /// Node of page `index`, generating pages up to it if needed.
    pub fn page(&mut self, index: usize) -> Result<NodeId, FlowError> {
        self.pages.ensure(&mut self.scene, index)
    }

    /// Change the paper. Pages move to their new origins and every flow is
    /// laid out again on next use.
    pub fn set_paper(&mut self, paper: Paper) -> Result<(), FlowError> {
        self.pages.set_paper(&mut self.scene, paper)?;
        self.config.paper = paper;
        self.scene.invalidate();
        Ok(())
    }

    // ── building ────────────────────────────────────────────────────────

    /// Add a flow using the document's line margin and break threshold.
    pub fn add_flow(
        &mut self,
        parent: NodeId,
        pos: Point,
        length: Length,
        height: Length,
    ) -> Result<NodeId, FlowError> {
        let mut flow = FlowContainer::new(length, height, self.config.line_margin)?;
        flow.set_break_threshold(self.config.break_threshold)?;
        self.add_flow_container(parent, pos, flow)
    }

    /// Add a fully configured flow. Flows cannot be nested.
    pub fn add_flow_container(
        &mut self,
        parent: NodeId,
        pos: Point,
        flow: FlowContainer,
    ) -> Result<NodeId, FlowError> {
        if mapping::first_ancestor_of_capability(&self.scene, parent, Capability::Flow)?.is_some() {
            return Err(FlowError::InvalidFlowGeometry(format!(
                "flows cannot be nested (parent {parent:?} is inside a flow)"
            )));
        }
        self.scene
            .insert(parent, NodeData::new(pos, NodeKind::Flow(flow)))
    }

    /// Add an atomic object.
    pub fn add_object(&mut self, parent: NodeId, pos: Point) -> Result<NodeId, FlowError> {
        self.scene.insert(parent, NodeData::object(pos))
    }

    /// Add an object with a fixed breakable extent.
    pub fn add_breakable(
        &mut self,
        parent: NodeId,
        pos: Point,
        extent: Length,
    ) -> Result<NodeId, FlowError> {
        self.scene.insert(
            parent,
            NodeData::object(pos).with_extent(Extent::Fixed(extent)),
        )
    }

    /// Add a spanner starting at `pos` and ending at `end`.
    pub fn add_spanner(
        &mut self,
        parent: NodeId,
        pos: Point,
        end: SpannerEnd,
    ) -> Result<NodeId, FlowError> {
        self.scene.insert(
            parent,
            NodeData::object(pos).with_extent(Extent::Spanner(end)),
        )
    }

    /// Add a preferred line break position.
    pub fn add_break_hint(&mut self, parent: NodeId, pos: Point) -> Result<NodeId, FlowError> {
        self.scene.insert(
            parent,
            NodeData::object(pos).with_capability(Capability::BreakOpportunity),
        )
    }

    /// Mutable access to a flow's geometry.
    pub fn flow_mut(&mut self, flow: NodeId) -> Result<&mut FlowContainer, FlowError> {
        self.scene.flow_mut(flow)
    }

    // ── queries ─────────────────────────────────────────────────────────

    /// Every flow in the document, in document order.
    pub fn flows(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.scene
            .descendants_with_capability(self.scene.root(), Capability::Flow)
    }

    /// The current break layout of `flow`.
    pub fn flow_layout(&self, flow: NodeId) -> Result<FlowLayout, FlowError> {
        let container = self
            .scene
            .get(flow)?
            .as_flow()
            .ok_or(FlowError::NotAFlow(flow))?;
        container.layout(&self.scene, flow, &self.pages)
    }

    /// Position of `dst` relative to `src`, ignoring breaks.
    pub fn map_between(&self, src: NodeId, dst: NodeId) -> Result<Point, FlowError> {
        mapping::map_between(&self.scene, src, dst)
    }

    /// Where `node` ends up on the canvas once flows are broken into lines.
    pub fn canvas_pos(&self, node: NodeId) -> Result<Point, FlowError> {
        let mut pos = Point::default();
        let mut current = node;
        loop {
            pos += self.scene.pos(current)?;
            let Some(parent) = self.scene.parent(current) else {
                return Ok(pos);
            };
            if self.scene.get(parent)?.as_flow().is_some() {
                return self.flow_layout(parent)?.map_to_canvas(pos, &self.pages);
            }
            current = parent;
        }
    }

    /// Whether `node` sits inside a flow.
    pub fn is_in_flow(&self, node: NodeId) -> Result<bool, FlowError> {
        Ok(enclosing_flow(&self.scene, node)?.is_some())
    }

    // ── rendering ───────────────────────────────────────────────────────

    /// The segments `node` would be drawn as.
    pub fn segments(&self, node: NodeId) -> Result<Vec<Segment>, FlowError> {
        render::plan_segments(self, node)
    }

    /// Draw `node` with `primitive`, split at line breaks.
    pub fn render(&self, node: NodeId, primitive: &mut dyn FlowRender) -> Result<(), FlowError> {
        render::render_node(self, node, primitive)
    }

    /// Generate every page some flow reaches. Returns the page count.
    pub fn ensure_pages(&mut self) -> Result<usize, FlowError> {
        let mut needed = 1;
        let flows: Vec<NodeId> = self.flows().collect();
        for flow in flows {
            needed = needed.max(self.flow_layout(flow)?.page_span());
        }
        self.pages.ensure(&mut self.scene, needed - 1)?;
        Ok(self.pages.len())
    }
}
