//! Shared defaults for page geometry, flows and the SVG preview (in millimeters
//! unless noted).

// ── Pages ───────────────────────────────────────────────────────────
/// Horizontal gap between pages on the canvas. Only affects previews.
pub const PAGE_DISPLAY_GAP_MM: f64 = 150.0;

// ── Flows ───────────────────────────────────────────────────────────
/// Vertical gap between consecutive lines of a flow on one page.
pub const DEFAULT_LINE_MARGIN_MM: f64 = 5.0;
/// Maximum distance a line is shortened to end on a break opportunity.
pub const DEFAULT_BREAK_THRESHOLD_MM: f64 = 5.0;
/// A broken node starting closer than this to its line end (in points) starts
/// on the next line instead.
pub(crate) const LINE_END_SNAP_PT: f64 = 1.0;

// ── Preview (SVG user units = points) ───────────────────────────────
pub(crate) const PREVIEW_PAGE_STROKE: f64 = 0.8;
pub(crate) const PREVIEW_LINE_BOX_STROKE: f64 = 0.5;
pub(crate) const PREVIEW_SEGMENT_STROKE: f64 = 1.5;
pub(crate) const PREVIEW_ATOM_RADIUS: f64 = 1.5;

// ── Colors ──────────────────────────────────────────────────────────
pub(crate) const PAGE_OUTLINE_COLOR: &str = "#551155";
pub(crate) const PAGE_FILL_COLOR: &str = "white";
pub(crate) const LIVE_AREA_COLOR: &str = "#b38fb3";
pub(crate) const LINE_BOX_COLOR: &str = "#4a4a9a";
pub(crate) const SEGMENT_COLOR: &str = "#1a1a1a";
