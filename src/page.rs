//! Pages and the page provider consumed by flow layout.
//!
//! Pages are laid out side by side on the canvas. Each page's position is the
//! top-left corner of its *live area*; the paper rectangle extends up and to
//! the left of it by the margins (and gutter, on right-hand pages).

use log::debug;

use crate::error::FlowError;
use crate::geometry::{Point, Rect};
use crate::paper::Paper;
use crate::scene::{NodeData, NodeId, NodeKind, SceneGraph};
use crate::units::{Length, ZERO};

/// Page geometry queries used by break generation.
pub trait PageProvider {
    /// Width of the live area of page `index`.
    fn live_page_width(&self, index: usize) -> Length;
    /// Height of the live area of page `index`.
    fn live_page_height(&self, index: usize) -> Length;
    /// Canvas position of the top-left corner of page `index`'s live area.
    fn page_origin(&self, index: usize) -> Point;
}

/// Which side of a spread a page lies on when printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSide {
    Left,
    Right,
}

impl PageSide {
    /// The first page is a right-hand page; sides alternate from there.
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 1 {
            PageSide::Left
        } else {
            PageSide::Right
        }
    }
}

/// A generated document page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page {
    pub index: usize,
    pub side: PageSide,
    pub paper: Paper,
    /// Live area origin in canvas space
    pub origin: Point,
}

impl Page {
    /// Left margin including the gutter when the gutter is on the left.
    pub fn full_margin_left(&self) -> Length {
        full_margin_left(&self.paper, self.side)
    }

    /// Right margin including the gutter when the gutter is on the right.
    pub fn full_margin_right(&self) -> Length {
        match self.side {
            PageSide::Right => self.paper.margin_right,
            PageSide::Left => self.paper.margin_right + self.paper.gutter,
        }
    }

    /// The paper rectangle relative to the live area origin.
    pub fn bounding_rect(&self) -> Rect {
        Rect::new(
            -self.full_margin_left(),
            -self.paper.margin_top,
            self.paper.width,
            self.paper.height,
        )
    }

    /// The paper rectangle in canvas space.
    pub fn canvas_bounding_rect(&self) -> Rect {
        self.bounding_rect().translated(self.origin)
    }

    /// The live area in canvas space.
    pub fn canvas_live_rect(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.paper.live_width(),
            self.paper.live_height(),
        )
    }
}

fn full_margin_left(paper: &Paper, side: PageSide) -> Length {
    match side {
        PageSide::Right => paper.margin_left + paper.gutter,
        PageSide::Left => paper.margin_left,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PageSupplier
// ═══════════════════════════════════════════════════════════════════════

/// Lazily generated pages sharing one paper.
///
/// Geometry for any index can be queried without creating the page; page
/// nodes are created on demand by [`PageSupplier::ensure`] and kept for the
/// document's lifetime.
#[derive(Debug, Clone)]
pub struct PageSupplier {
    paper: Paper,
    display_gap: Length,
    nodes: Vec<NodeId>,
}

impl PageSupplier {
    pub fn new(paper: Paper, display_gap: Length) -> Result<Self, FlowError> {
        paper.validate()?;
        if display_gap < ZERO {
            return Err(FlowError::InvalidPaper(format!(
                "display gap must not be negative, got {display_gap}"
            )));
        }
        Ok(Self {
            paper,
            display_gap,
            nodes: Vec::new(),
        })
    }

    pub fn paper(&self) -> &Paper {
        &self.paper
    }

    /// Gap between pages on the canvas. Zero for exported output.
    pub fn display_gap(&self) -> Length {
        self.display_gap
    }

    /// Number of pages generated so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Geometry of page `index`, whether or not it has been generated.
    pub fn page(&self, index: usize) -> Page {
        Page {
            index,
            side: PageSide::for_index(index),
            paper: self.paper,
            origin: self.page_origin(index),
        }
    }

    /// Scene node of page `index`, if generated.
    pub fn node(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    /// Return the node of page `index`, generating it and every missing page
    /// before it.
    pub fn ensure(&mut self, scene: &mut SceneGraph, index: usize) -> Result<NodeId, FlowError> {
        while self.nodes.len() <= index {
            let new_index = self.nodes.len();
            let origin = self.page_origin(new_index);
            let node = scene.insert(
                scene.root(),
                NodeData::new(origin, NodeKind::Page { index: new_index }),
            )?;
            debug!("generated page {new_index} at ({}, {})", origin.x, origin.y);
            self.nodes.push(node);
        }
        Ok(self.nodes[index])
    }

    /// Replace the paper and move every generated page to its new origin.
    pub fn set_paper(&mut self, scene: &mut SceneGraph, paper: Paper) -> Result<(), FlowError> {
        paper.validate()?;
        self.paper = paper;
        for (index, &node) in self.nodes.iter().enumerate() {
            scene.set_pos(node, self.page_origin(index))?;
        }
        Ok(())
    }
}

impl PageProvider for PageSupplier {
    fn live_page_width(&self, _index: usize) -> Length {
        self.paper.live_width()
    }

    fn live_page_height(&self, _index: usize) -> Length {
        self.paper.live_height()
    }

    /// Paper sheets are spaced `width + display_gap` apart; the live area
    /// origin is then offset by the page's own left margin, relative to the
    /// first page's.
    fn page_origin(&self, index: usize) -> Point {
        let sheet_x = (self.paper.width + self.display_gap) * index as f64;
        let margin_shift = full_margin_left(&self.paper, PageSide::for_index(index))
            - full_margin_left(&self.paper, PageSide::for_index(0));
        Point::new(sheet_x + margin_shift, ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gutter_paper() -> Paper {
        Paper::new(
            Length::mm(210.0),
            Length::mm(297.0),
            Length::mm(20.0),
            Length::mm(20.0),
            Length::mm(20.0),
            Length::mm(20.0),
            Length::mm(10.0),
        )
    }

    #[test]
    fn pages_are_generated_lazily_up_to_index() {
        let mut scene = SceneGraph::new();
        let mut pages = PageSupplier::new(gutter_paper(), ZERO).unwrap();
        assert!(pages.is_empty());
        let fifth = pages.ensure(&mut scene, 4).unwrap();
        assert_eq!(pages.len(), 5);
        assert_eq!(scene.get(fifth).unwrap().page_index(), Some(4));
        pages.ensure(&mut scene, 2).unwrap();
        assert_eq!(pages.len(), 5);
        assert_eq!(scene.children(scene.root()).count(), 5);
    }

    #[test]
    fn origins_account_for_gutter_side() {
        let pages = PageSupplier::new(gutter_paper(), Length::mm(150.0)).unwrap();
        assert_eq!(pages.page_origin(0), Point::new(ZERO, ZERO));
        // Left page: gutter moves to the right, so the live area shifts left.
        let second = pages.page_origin(1);
        assert!(second.x.approx_eq(Length::mm(360.0 - 10.0)));
        assert!(pages.page_origin(2).x.approx_eq(Length::mm(720.0)));
    }

    #[test]
    fn bounding_rect_places_gutter_on_inner_side() {
        let pages = PageSupplier::new(gutter_paper(), ZERO).unwrap();
        let right = pages.page(0);
        let left = pages.page(1);
        assert_eq!(right.side, PageSide::Right);
        assert!(right.bounding_rect().x.approx_eq(Length::mm(-30.0)));
        assert_eq!(left.side, PageSide::Left);
        assert!(left.bounding_rect().x.approx_eq(Length::mm(-20.0)));
        assert!(left.full_margin_right().approx_eq(Length::mm(30.0)));
        // Sheets still sit edge to edge without a display gap.
        let right_sheet = right.canvas_bounding_rect();
        let left_sheet = left.canvas_bounding_rect();
        assert!((right_sheet.x + right_sheet.width).approx_eq(left_sheet.x));
    }

    #[test]
    fn changing_paper_moves_existing_pages() {
        let mut scene = SceneGraph::new();
        let mut pages = PageSupplier::new(gutter_paper(), ZERO).unwrap();
        let node = pages.ensure(&mut scene, 1).unwrap();
        let wider = Paper { width: Length::mm(300.0), ..gutter_paper() };
        pages.set_paper(&mut scene, wider).unwrap();
        assert!(scene.pos(node).unwrap().x.approx_eq(Length::mm(290.0)));
        assert!(pages.live_page_width(1).approx_eq(Length::mm(250.0)));
    }
}
