//! Flow containers and their line/page break layout.
//!
//! A flow is an infinitely wide logical strip. Children are positioned in
//! that strip; [`FlowContainer::layout`] cuts it into lines that fit the
//! live area of successive pages. The resulting [`FlowLayout`] answers every
//! "which line is this x on" question and maps logical positions to canvas
//! space.

mod breaks;
pub mod controllers;

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::constants::{DEFAULT_BREAK_THRESHOLD_MM, DEFAULT_LINE_MARGIN_MM};
use crate::error::FlowError;
use crate::geometry::Point;
use crate::page::PageProvider;
use crate::scene::{NodeId, SceneGraph};
use crate::units::{Length, LENGTH_EPSILON, ZERO};

pub use controllers::{BreakController, MarginController, DEFAULT_MARGIN_LAYER};

// ═══════════════════════════════════════════════════════════════════════
// FlowContainer
// ═══════════════════════════════════════════════════════════════════════

/// Geometry of a flow plus its cached break layout.
///
/// The cache is stamped with the scene revision it was computed at. Any
/// scene mutation (including edits through [`SceneGraph::flow_mut`]) bumps
/// the revision, so a stale layout is never served.
#[derive(Debug)]
pub struct FlowContainer {
    length: Length,
    height: Length,
    line_margin: Length,
    break_threshold: Length,
    margin_controllers: Vec<MarginController>,
    forced_breaks: Vec<Length>,
    cache: RefCell<Option<CachedLayout>>,
}

#[derive(Debug)]
struct CachedLayout {
    revision: u64,
    layout: FlowLayout,
}

impl FlowContainer {
    /// A flow of logical `length` whose lines are `height` tall and separated
    /// by `line_margin`.
    pub fn new(length: Length, height: Length, line_margin: Length) -> Result<Self, FlowError> {
        check_positive("length", length)?;
        check_positive("height", height)?;
        check_non_negative("line margin", line_margin)?;
        Ok(Self {
            length,
            height,
            line_margin,
            break_threshold: Length::mm(DEFAULT_BREAK_THRESHOLD_MM),
            margin_controllers: Vec::new(),
            forced_breaks: Vec::new(),
            cache: RefCell::new(None),
        })
    }

    /// A flow using the default line margin.
    pub fn with_default_margin(length: Length, height: Length) -> Result<Self, FlowError> {
        Self::new(length, height, Length::mm(DEFAULT_LINE_MARGIN_MM))
    }

    pub fn length(&self) -> Length {
        self.length
    }

    pub fn height(&self) -> Length {
        self.height
    }

    pub fn line_margin(&self) -> Length {
        self.line_margin
    }

    /// How close to the line end a break opportunity must be to be used.
    pub fn break_threshold(&self) -> Length {
        self.break_threshold
    }

    pub fn margin_controllers(&self) -> &[MarginController] {
        &self.margin_controllers
    }

    /// Flow positions where a line must end.
    pub fn forced_breaks(&self) -> &[Length] {
        &self.forced_breaks
    }

    pub fn set_length(&mut self, length: Length) -> Result<(), FlowError> {
        check_positive("length", length)?;
        self.length = length;
        self.invalidate();
        Ok(())
    }

    pub fn set_height(&mut self, height: Length) -> Result<(), FlowError> {
        check_positive("height", height)?;
        self.height = height;
        self.invalidate();
        Ok(())
    }

    pub fn set_line_margin(&mut self, line_margin: Length) -> Result<(), FlowError> {
        check_non_negative("line margin", line_margin)?;
        self.line_margin = line_margin;
        self.invalidate();
        Ok(())
    }

    pub fn set_break_threshold(&mut self, threshold: Length) -> Result<(), FlowError> {
        check_non_negative("break threshold", threshold)?;
        self.break_threshold = threshold;
        self.invalidate();
        Ok(())
    }

    /// Add a margin controller, replacing any controller of the same layer at
    /// the same position.
    pub fn add_margin_controller(&mut self, controller: MarginController) {
        self.margin_controllers.retain(|existing| {
            existing.layer != controller.layer || !existing.flow_x.approx_eq(controller.flow_x)
        });
        let at = self
            .margin_controllers
            .partition_point(|existing| existing.flow_x <= controller.flow_x);
        self.margin_controllers.insert(at, controller);
        self.invalidate();
    }

    /// Force a line to end at `flow_x`. Positions outside the open interval
    /// `(0, length)` are rejected.
    pub fn add_forced_break(&mut self, flow_x: Length) -> Result<(), FlowError> {
        if flow_x <= ZERO || flow_x >= self.length {
            return Err(FlowError::OutOfBounds {
                x: flow_x.to_pt(),
                length: self.length.to_pt(),
            });
        }
        if !self.forced_breaks.iter().any(|b| b.approx_eq(flow_x)) {
            let at = self.forced_breaks.partition_point(|b| *b < flow_x);
            self.forced_breaks.insert(at, flow_x);
        }
        self.invalidate();
        Ok(())
    }

    /// Drop the cached layout.
    pub fn invalidate(&self) {
        self.cache.borrow_mut().take();
    }

    /// The break layout of the flow stored at `id`, recomputed if the scene
    /// changed since it was last computed.
    pub fn layout(
        &self,
        scene: &SceneGraph,
        id: NodeId,
        pages: &dyn PageProvider,
    ) -> Result<FlowLayout, FlowError> {
        if let Some(cached) = self.cache.borrow().as_ref() {
            if cached.revision == scene.revision() {
                return Ok(cached.layout.clone());
            }
        }
        let lines = breaks::generate(self, scene, id, pages)?;
        debug!(
            "flow {id:?}: {} line(s) over {} page(s) for length {}",
            lines.len(),
            lines.last().map_or(0, |l| l.page_index + 1),
            self.length
        );
        let layout = FlowLayout {
            lines: lines.into(),
            length: self.length,
        };
        *self.cache.borrow_mut() = Some(CachedLayout {
            revision: scene.revision(),
            layout: layout.clone(),
        });
        Ok(layout)
    }
}

fn check_positive(what: &str, value: Length) -> Result<(), FlowError> {
    if !value.is_finite() || value <= ZERO {
        return Err(FlowError::InvalidFlowGeometry(format!(
            "{what} must be positive, got {value}"
        )));
    }
    Ok(())
}

fn check_non_negative(what: &str, value: Length) -> Result<(), FlowError> {
    if !value.is_finite() || value < ZERO {
        return Err(FlowError::InvalidFlowGeometry(format!(
            "{what} must not be negative, got {value}"
        )));
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
// FlowLayout
// ═══════════════════════════════════════════════════════════════════════

/// An immutable snapshot of a flow's lines.
///
/// `lines()[0]` is the flow's start; the remaining entries are the generated
/// breaks, in increasing `flow_x` order. Line lengths sum to the flow length.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowLayout {
    lines: Rc<[BreakController]>,
    length: Length,
}

impl FlowLayout {
    pub fn lines(&self) -> &[BreakController] {
        &self.lines
    }

    /// Every line after the first, i.e. the breaks the layout introduced.
    pub fn generated_breaks(&self) -> &[BreakController] {
        &self.lines[1..]
    }

    /// Logical length of the flow.
    pub fn length(&self) -> Length {
        self.length
    }

    /// Number of pages touched by the flow, counted from page 0.
    pub fn page_span(&self) -> usize {
        self.lines.last().map_or(0, |line| line.page_index + 1)
    }

    /// Index of the line containing flow position `x`. A position exactly on
    /// a break belongs to the line that starts there.
    pub fn last_break_index_at(&self, x: Length) -> Result<usize, FlowError> {
        let tolerance = Length::pt(LENGTH_EPSILON);
        if x < -tolerance || x > self.length + tolerance {
            return Err(FlowError::OutOfBounds {
                x: x.to_pt(),
                length: self.length.to_pt(),
            });
        }
        Ok(self
            .lines
            .partition_point(|line| line.flow_x <= x)
            .saturating_sub(1))
    }

    pub fn last_break_at(&self, x: Length) -> Result<&BreakController, FlowError> {
        let index = self.last_break_index_at(x)?;
        Ok(&self.lines[index])
    }

    /// Distance from the start of the line containing `x` back to `x`.
    pub fn dist_to_line_start(&self, x: Length) -> Result<Length, FlowError> {
        Ok(x - self.last_break_at(x)?.flow_x)
    }

    /// Distance from `x` to the end of the line containing it.
    pub fn dist_to_line_end(&self, x: Length) -> Result<Length, FlowError> {
        Ok(self.last_break_at(x)?.end_flow_x() - x)
    }

    /// Canvas position of a point given in the flow's logical space.
    pub fn map_to_canvas(&self, local: Point, pages: &dyn PageProvider) -> Result<Point, FlowError> {
        let line = self.last_break_at(local.x)?;
        let offset = Point::new(local.x - line.flow_x, local.y);
        Ok(line.canvas_pos(pages) + offset)
    }
}
