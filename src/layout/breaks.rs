//! Greedy line and page break generation.
//!
//! Lines are filled as far as the page's live width allows, then cut. A line
//! may end early at a forced break, or at a break opportunity lying within the
//! break threshold of where it would otherwise end. When the next line would
//! overflow the live height, it starts at the top of the next page.

use log::warn;

use super::controllers::margin_at;
use super::{BreakController, FlowContainer};
use crate::error::FlowError;
use crate::geometry::Point;
use crate::mapping::{descendant_pos, first_ancestor_of_capability};
use crate::page::PageProvider;
use crate::scene::{Capability, NodeId, SceneGraph};
use crate::units::{Length, LENGTH_EPSILON, ZERO};

pub(super) fn generate(
    flow: &FlowContainer,
    scene: &SceneGraph,
    id: NodeId,
    pages: &dyn PageProvider,
) -> Result<Vec<BreakController>, FlowError> {
    let page_node =
        first_ancestor_of_capability(scene, id, Capability::Page)?.ok_or(FlowError::NoAncestorPage(id))?;
    let mut page_index = scene
        .get(page_node)?
        .page_index()
        .ok_or(FlowError::NoAncestorPage(id))?;
    let start = descendant_pos(scene, id, page_node)?;
    if start.y + flow.height() > pages.live_page_height(page_index) {
        warn!("flow {id:?} starts too low on page {page_index}; its first line overflows the live area");
    }
    let opportunities = break_opportunities(flow, scene, id)?;
    let tolerance = Length::pt(LENGTH_EPSILON);

    let mut lines: Vec<BreakController> = Vec::new();
    let mut cursor = start;
    let mut flow_x = ZERO;
    let mut is_automatic = true;
    let mut margin_before_next = ZERO;
    loop {
        let line_x = cursor.x + margin_at(flow.margin_controllers(), flow_x);
        let max_length = pages.live_page_width(page_index) - line_x;
        if max_length <= tolerance {
            return Err(FlowError::InvalidFlowGeometry(format!(
                "no room for a line at flow x {flow_x} on page {page_index} (line starts at {line_x})"
            )));
        }
        let max_end = flow_x + max_length;

        let forced = flow
            .forced_breaks()
            .iter()
            .copied()
            .find(|&f| f > flow_x + tolerance && f <= max_end);
        let end = match forced {
            Some(f) => f,
            None => preferred_end(&opportunities, flow_x, max_end, flow.break_threshold()),
        };
        let end = end.min(flow.length());

        lines.push(BreakController {
            flow_x,
            page_index,
            pos: Point::new(line_x, cursor.y),
            length: end - flow_x,
            height: flow.height(),
            margin_before_next,
            is_automatic,
        });
        flow_x = end;
        if flow_x >= flow.length() {
            break;
        }
        is_automatic = forced.is_none();

        let next_y = cursor.y + flow.height() + flow.line_margin();
        if next_y + flow.height() > pages.live_page_height(page_index) {
            page_index += 1;
            cursor = Point::new(ZERO, ZERO);
            margin_before_next = ZERO;
        } else {
            cursor = Point::new(ZERO, next_y);
            margin_before_next = flow.line_margin();
        }
    }
    Ok(lines)
}

/// Where a line running up to `max_end` should stop: the last break
/// opportunity strictly inside the line if it is within `threshold` of the
/// line end, otherwise `max_end`.
fn preferred_end(opportunities: &[Length], line_start: Length, max_end: Length, threshold: Length) -> Length {
    let candidate = opportunities
        .iter()
        .rev()
        .copied()
        .find(|&o| o < max_end && o > line_start + Length::pt(LENGTH_EPSILON));
    match candidate {
        Some(o) if max_end - o < threshold => o,
        _ => max_end,
    }
}

/// Flow x positions of every break opportunity inside the flow, sorted.
fn break_opportunities(flow: &FlowContainer, scene: &SceneGraph, id: NodeId) -> Result<Vec<Length>, FlowError> {
    let mut positions = Vec::new();
    for node in scene.descendants_with_capability(id, Capability::BreakOpportunity) {
        let x = descendant_pos(scene, node, id)?.x;
        if x < ZERO || x > flow.length() {
            warn!("break opportunity {node:?} at {x} lies outside flow {id:?}; ignoring it");
            continue;
        }
        positions.push(x);
    }
    positions.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Ok(positions)
}
