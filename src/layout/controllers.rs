//! Controllers attached to flow positions: line starts and margin changes.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::page::PageProvider;
use crate::units::Length;

/// Layer used when a margin controller does not name one.
pub const DEFAULT_MARGIN_LAYER: &str = "default";

/// The start of one line of a flow.
///
/// The first controller of a flow always sits at `flow_x == 0`; every later
/// one is a line or page break.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakController {
    /// Logical position in the flow where this line begins
    pub flow_x: Length,
    pub page_index: usize,
    /// Line origin relative to its page's live area
    pub pos: Point,
    /// Logical length covered by this line
    pub length: Length,
    pub height: Length,
    /// Vertical gap inserted after the previous line: the flow's line margin
    /// for a break on the same page, zero for a page break and for the
    /// flow's first line.
    pub margin_before_next: Length,
    /// False when the line was started by an explicit break
    pub is_automatic: bool,
}

impl BreakController {
    /// Flow x where this line ends.
    pub fn end_flow_x(&self) -> Length {
        self.flow_x + self.length
    }

    /// Line origin in canvas space.
    pub fn canvas_pos(&self, pages: &dyn PageProvider) -> Point {
        pages.page_origin(self.page_index) + self.pos
    }
}

/// Shifts the left edge of every line starting at or after `flow_x`.
///
/// Margins are tracked per layer: the latest controller of each layer applies,
/// and the margins of all layers add up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginController {
    pub flow_x: Length,
    pub margin_left: Length,
    #[serde(default = "default_layer")]
    pub layer: String,
}

fn default_layer() -> String {
    DEFAULT_MARGIN_LAYER.to_string()
}

impl MarginController {
    pub fn new(flow_x: Length, margin_left: Length, layer: impl Into<String>) -> Self {
        Self {
            flow_x,
            margin_left,
            layer: layer.into(),
        }
    }
}

/// Total left margin in effect at `flow_x`. Controllers must be sorted by
/// `flow_x`.
pub(crate) fn margin_at(controllers: &[MarginController], flow_x: Length) -> Length {
    let mut latest: Vec<(&str, Length)> = Vec::new();
    for controller in controllers.iter().take_while(|c| c.flow_x <= flow_x) {
        let layer = controller.layer.as_str();
        match latest.iter_mut().find(|(existing, _)| *existing == layer) {
            Some(entry) => entry.1 = controller.margin_left,
            None => latest.push((layer, controller.margin_left)),
        }
    }
    latest.into_iter().map(|(_, margin)| margin).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::ZERO;

    #[test]
    fn latest_margin_per_layer_is_summed() {
        let controllers = vec![
            MarginController::new(ZERO, Length::pt(10.0), "a"),
            MarginController::new(ZERO, Length::pt(3.0), "b"),
            MarginController::new(Length::pt(100.0), Length::pt(20.0), "a"),
        ];
        assert_eq!(margin_at(&controllers, Length::pt(50.0)), Length::pt(13.0));
        assert_eq!(margin_at(&controllers, Length::pt(100.0)), Length::pt(23.0));
        assert_eq!(margin_at(&[], Length::pt(100.0)), ZERO);
    }
}
