//! JSON layout report: lay out a batch of flows described in JSON and return
//! their lines. This is the bridge for callers that cannot hold a
//! [`Document`] across an FFI boundary.
//!
//! All lengths are in points. Canvas positions are export positions: pages
//! sit side by side with no display gap, whatever the request configures.

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::document::Document;
use crate::error::FlowError;
use crate::geometry::Point;
use crate::layout::{BreakController, MarginController};
use crate::page::PageProvider;
use crate::units::{Length, ZERO};

/// Flows to lay out on a fresh document.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutRequest {
    #[serde(default)]
    pub config: LayoutConfig,
    pub flows: Vec<FlowSpec>,
}

/// One flow placed directly on a page.
#[derive(Debug, Clone, Deserialize)]
pub struct FlowSpec {
    /// Page the flow starts on
    #[serde(default)]
    pub page: usize,
    /// Flow position relative to the page's live area
    #[serde(default)]
    pub pos: Point,
    pub length: Length,
    pub height: Length,
    /// Overrides the configured line margin
    pub line_margin: Option<Length>,
    /// Overrides the configured break threshold
    pub break_threshold: Option<Length>,
    /// Flow x positions of break opportunities
    #[serde(default)]
    pub break_hints: Vec<Length>,
    /// Flow x positions where a line must end
    #[serde(default)]
    pub forced_breaks: Vec<Length>,
    #[serde(default)]
    pub margins: Vec<MarginController>,
}

/// Lines of every requested flow, in request order.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutReport {
    /// Pages needed to hold every flow
    pub page_count: usize,
    pub flows: Vec<FlowReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlowReport {
    pub length: Length,
    pub lines: Vec<LineReport>,
}

/// A line plus its canvas position in export space.
#[derive(Debug, Clone, Serialize)]
pub struct LineReport {
    #[serde(flatten)]
    pub line: BreakController,
    pub canvas: Point,
}

/// Build a document for `request` and report every flow's lines.
pub fn build_layout_report(request: &LayoutRequest) -> Result<LayoutReport, FlowError> {
    let config = LayoutConfig {
        display_gap: ZERO,
        ..request.config
    };
    let mut doc = Document::new(config)?;
    let mut flows = Vec::with_capacity(request.flows.len());
    for spec in &request.flows {
        let page = doc.page(spec.page)?;
        let flow = doc.add_flow(page, spec.pos, spec.length, spec.height)?;
        {
            let container = doc.flow_mut(flow)?;
            if let Some(margin) = spec.line_margin {
                container.set_line_margin(margin)?;
            }
            if let Some(threshold) = spec.break_threshold {
                container.set_break_threshold(threshold)?;
            }
            for &x in &spec.forced_breaks {
                container.add_forced_break(x)?;
            }
            for margin in &spec.margins {
                container.add_margin_controller(margin.clone());
            }
        }
        for &x in &spec.break_hints {
            doc.add_break_hint(flow, Point::new(x, ZERO))?;
        }
        flows.push(flow);
    }

    let page_count = doc.ensure_pages()?;
    let mut reports = Vec::with_capacity(flows.len());
    for flow in flows {
        let layout = doc.flow_layout(flow)?;
        let lines = layout
            .lines()
            .iter()
            .map(|line| LineReport {
                line: *line,
                canvas: line.canvas_pos(doc.pages() as &dyn PageProvider),
            })
            .collect();
        reports.push(FlowReport {
            length: layout.length(),
            lines,
        });
    }
    Ok(LayoutReport {
        page_count,
        flows: reports,
    })
}

/// Parse a [`LayoutRequest`] from JSON and return the [`LayoutReport`] as
/// JSON.
pub fn layout_json(request_json: &str) -> Result<String, FlowError> {
    let request: LayoutRequest =
        serde_json::from_str(request_json).map_err(|e| FlowError::Config(e.to_string()))?;
    request.config.validate()?;
    let report = build_layout_report(&request)?;
    serde_json::to_string_pretty(&report).map_err(|e| FlowError::Config(e.to_string()))
}
