//! Geometry preview: draws pages, live areas, flow lines and object segments
//! as SVG, so a layout can be inspected without a real rendering backend.

mod svg_builder;

use crate::constants::*;
use crate::document::Document;
use crate::error::FlowError;
use crate::geometry::Point;
use crate::page::Page;
use crate::render::{FlowRender, Segment};
use crate::scene::{NodeId, NodeKind};
use crate::spanner::breakable_extent;
use crate::units::ZERO;

use svg_builder::SvgBuilder;

/// Render the whole document as an SVG preview.
///
/// Every page some flow reaches is drawn, even if its page node has not been
/// generated yet. The canvas is shifted so the first sheet's top-left corner
/// sits at the SVG origin.
pub fn render_preview_svg(doc: &Document) -> Result<String, FlowError> {
    let pages = doc.pages();
    let paper = *pages.paper();

    let mut page_count = pages.len().max(1);
    let flows: Vec<NodeId> = doc.flows().collect();
    let mut layouts = Vec::with_capacity(flows.len());
    for &flow in &flows {
        let layout = doc.flow_layout(flow)?;
        page_count = page_count.max(layout.page_span());
        layouts.push(layout);
    }

    let sheets: Vec<Page> = (0..page_count).map(|index| pages.page(index)).collect();
    let first_sheet = sheets[0].canvas_bounding_rect();
    let shift = Point::new(-first_sheet.x, -first_sheet.y);
    let last_sheet = sheets[page_count - 1].canvas_bounding_rect();
    let width = (last_sheet.x + last_sheet.width + shift.x).to_pt();
    let height = paper.height.to_pt();

    let mut svg = SvgBuilder::new(width, height);

    // ── pages ──
    for sheet in &sheets {
        let bounds = sheet.canvas_bounding_rect().translated(shift);
        svg.rect(
            bounds.x.to_pt(),
            bounds.y.to_pt(),
            bounds.width.to_pt(),
            bounds.height.to_pt(),
            PAGE_FILL_COLOR,
            PAGE_OUTLINE_COLOR,
            PREVIEW_PAGE_STROKE,
        );
        let live = sheet.canvas_live_rect().translated(shift);
        svg.dashed_rect(
            live.x.to_pt(),
            live.y.to_pt(),
            live.width.to_pt(),
            live.height.to_pt(),
            LIVE_AREA_COLOR,
            PREVIEW_PAGE_STROKE,
        );
    }

    // ── flow lines ──
    for (flow, layout) in flows.iter().zip(&layouts) {
        svg.comment(&format!("flow {flow:?}: {} line(s)", layout.lines().len()));
        for line in layout.lines() {
            let at = line.canvas_pos(pages) + shift;
            svg.dashed_rect(
                at.x.to_pt(),
                at.y.to_pt(),
                line.length.to_pt(),
                line.height.to_pt(),
                LINE_BOX_COLOR,
                PREVIEW_LINE_BOX_STROKE,
            );
        }
    }

    // ── objects ──
    let mut painter = SegmentPainter { svg: &mut svg, shift };
    for node in doc.scene().descendants(doc.scene().root()) {
        if !matches!(doc.scene().get(node)?.kind(), NodeKind::Object) {
            continue;
        }
        if breakable_extent(doc.scene(), node)? == ZERO {
            let at = doc.canvas_pos(node)? + shift;
            painter.svg.circle(at.x.to_pt(), at.y.to_pt(), PREVIEW_ATOM_RADIUS, SEGMENT_COLOR);
        } else {
            doc.render(node, &mut painter)?;
        }
    }

    Ok(svg.build())
}

/// Draws every segment kind as a plain stroke.
struct SegmentPainter<'a> {
    svg: &'a mut SvgBuilder,
    shift: Point,
}

impl SegmentPainter<'_> {
    fn stroke(&mut self, segment: &Segment) -> Result<(), FlowError> {
        let start = segment.start + self.shift;
        let end = segment.end + self.shift;
        self.svg.line(
            start.x.to_pt(),
            start.y.to_pt(),
            end.x.to_pt(),
            end.y.to_pt(),
            SEGMENT_COLOR,
            PREVIEW_SEGMENT_STROKE,
        );
        Ok(())
    }
}

impl FlowRender for SegmentPainter<'_> {
    fn render_complete(&mut self, segment: &Segment) -> Result<(), FlowError> {
        self.stroke(segment)
    }

    fn render_before_break(&mut self, segment: &Segment) -> Result<(), FlowError> {
        self.stroke(segment)
    }

    fn render_spanning_continuation(&mut self, segment: &Segment) -> Result<(), FlowError> {
        self.stroke(segment)
    }

    fn render_after_break(&mut self, segment: &Segment) -> Result<(), FlowError> {
        self.stroke(segment)
    }
}
