//! Break-aware render dispatch.
//!
//! A node with a breakable extent that crosses line breaks is drawn as a
//! series of segments: the part before the first break, a continuation for
//! every line it fully covers, and the part after the last break. A
//! [`FlowRender`] implementation receives one callback per segment, in order.

use log::trace;

use crate::constants::LINE_END_SNAP_PT;
use crate::document::Document;
use crate::error::FlowError;
use crate::geometry::Point;
use crate::layout::BreakController;
use crate::mapping::{descendant_pos, enclosing_flow};
use crate::scene::NodeId;
use crate::spanner::breakable_extent;
use crate::units::{Length, ZERO};

/// Which part of a possibly broken node a segment draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// The node fits on one line
    Complete,
    /// From the node's start to the end of its first line
    BeforeBreak,
    /// A whole line in the middle of the node
    SpanningContinuation,
    /// From the start of the node's last line to its end
    AfterBreak,
}

/// One piece of a node to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Extent already covered by earlier segments of the same node
    pub local_start: Length,
    /// Extent covered by this segment
    pub length: Length,
    /// Canvas position where the segment starts
    pub start: Point,
    /// Canvas position where the segment ends
    pub end: Point,
    /// Line the segment is drawn on. `None` outside flows.
    pub line: Option<BreakController>,
}

/// Drawing callbacks for a node that may be split across lines.
///
/// Only [`FlowRender::render_complete`] is required. Primitives that can
/// span breaks override the other three; the defaults fail with
/// [`FlowError::SegmentNotImplemented`].
pub trait FlowRender {
    fn render_complete(&mut self, segment: &Segment) -> Result<(), FlowError>;

    fn render_before_break(&mut self, _segment: &Segment) -> Result<(), FlowError> {
        Err(FlowError::SegmentNotImplemented(SegmentKind::BeforeBreak))
    }

    fn render_spanning_continuation(&mut self, _segment: &Segment) -> Result<(), FlowError> {
        Err(FlowError::SegmentNotImplemented(SegmentKind::SpanningContinuation))
    }

    fn render_after_break(&mut self, _segment: &Segment) -> Result<(), FlowError> {
        Err(FlowError::SegmentNotImplemented(SegmentKind::AfterBreak))
    }
}

/// Compute the segments `node` is drawn as, without drawing anything.
pub fn plan_segments(doc: &Document, node: NodeId) -> Result<Vec<Segment>, FlowError> {
    let scene = doc.scene();
    let extent = breakable_extent(scene, node)?;
    let Some(flow) = enclosing_flow(scene, node)? else {
        let start = doc.canvas_pos(node)?;
        return Ok(vec![complete(start, extent, None)]);
    };

    let layout = doc.flow_layout(flow)?;
    let pages = doc.pages();
    let local = descendant_pos(scene, node, flow)?;
    let mut start = layout.map_to_canvas(local, pages)?;
    let mut first_index = layout.last_break_index_at(local.x)?;
    let lines = layout.lines();
    let mut first_length = lines[first_index].end_flow_x() - local.x;
    if extent == ZERO || extent <= first_length || first_index + 1 == lines.len() {
        return Ok(vec![complete(start, extent, Some(lines[first_index]))]);
    }
    if first_length < Length::pt(LINE_END_SNAP_PT) {
        // Starts at the very end of its line: begin on the next one.
        first_index += 1;
        let line = lines[first_index];
        first_length = line.end_flow_x() - local.x;
        start = line.canvas_pos(pages) + Point::new(local.x - line.flow_x, local.y);
        if extent <= first_length || first_index + 1 == lines.len() {
            return Ok(vec![complete(start, extent, Some(line))]);
        }
    }
    let first_line = lines[first_index];

    let mut segments = vec![Segment {
        kind: SegmentKind::BeforeBreak,
        local_start: ZERO,
        length: first_length,
        start,
        end: start + Point::new(first_length, ZERO),
        line: Some(first_line),
    }];
    let mut covered = first_length;
    for (index, line) in lines.iter().enumerate().skip(first_index + 1) {
        let remaining = extent - covered;
        let is_last_line = index + 1 == lines.len();
        let (kind, length) = if remaining > line.length && !is_last_line {
            (SegmentKind::SpanningContinuation, line.length)
        } else {
            (SegmentKind::AfterBreak, remaining)
        };
        let line_start = line.canvas_pos(pages) + Point::new(ZERO, local.y);
        segments.push(Segment {
            kind,
            local_start: covered,
            length,
            start: line_start,
            end: line_start + Point::new(length, ZERO),
            line: Some(*line),
        });
        covered += length;
        if kind == SegmentKind::AfterBreak {
            break;
        }
    }
    Ok(segments)
}

/// Draw `node` with `primitive`, one callback per segment.
pub fn render_node(doc: &Document, node: NodeId, primitive: &mut dyn FlowRender) -> Result<(), FlowError> {
    let segments = plan_segments(doc, node)?;
    trace!("rendering {node:?} as {} segment(s)", segments.len());
    for segment in &segments {
        match segment.kind {
            SegmentKind::Complete => primitive.render_complete(segment)?,
            SegmentKind::BeforeBreak => primitive.render_before_break(segment)?,
            SegmentKind::SpanningContinuation => primitive.render_spanning_continuation(segment)?,
            SegmentKind::AfterBreak => primitive.render_after_break(segment)?,
        }
    }
    Ok(())
}

fn complete(start: Point, extent: Length, line: Option<BreakController>) -> Segment {
    Segment {
        kind: SegmentKind::Complete,
        local_start: ZERO,
        length: extent,
        start,
        end: start + Point::new(extent, ZERO),
        line,
    }
}
