//! Paper geometry used to lay out pages.

use serde::{Deserialize, Serialize};

use crate::error::FlowError;
use crate::units::{Length, ZERO};

/// Physical paper size, margins and binding gutter.
///
/// The *live area* is what remains after margins and gutter; every page
/// position in the engine is relative to its live area's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    pub width: Length,
    pub height: Length,
    #[serde(default)]
    pub margin_top: Length,
    #[serde(default)]
    pub margin_right: Length,
    #[serde(default)]
    pub margin_bottom: Length,
    #[serde(default)]
    pub margin_left: Length,
    /// Binding gutter, placed on the inner side of each page
    #[serde(default)]
    pub gutter: Length,
}

impl Paper {
    /// Paper with margins in the order top, right, bottom, left.
    pub fn new(
        width: Length,
        height: Length,
        margin_top: Length,
        margin_right: Length,
        margin_bottom: Length,
        margin_left: Length,
        gutter: Length,
    ) -> Self {
        Self {
            width,
            height,
            margin_top,
            margin_right,
            margin_bottom,
            margin_left,
            gutter,
        }
    }

    /// Width of the live area.
    pub fn live_width(&self) -> Length {
        self.width - self.gutter - self.margin_left - self.margin_right
    }

    /// Height of the live area.
    pub fn live_height(&self) -> Length {
        self.height - self.margin_bottom - self.margin_top
    }

    /// Reject papers whose live area is empty or whose margins are negative.
    pub fn validate(&self) -> Result<(), FlowError> {
        let margins = [
            ("margin_top", self.margin_top),
            ("margin_right", self.margin_right),
            ("margin_bottom", self.margin_bottom),
            ("margin_left", self.margin_left),
            ("gutter", self.gutter),
        ];
        for (name, value) in margins {
            if value < ZERO {
                return Err(FlowError::InvalidPaper(format!("{name} is negative ({value})")));
            }
        }
        if self.live_width() <= ZERO {
            return Err(FlowError::InvalidPaper(format!(
                "live width must be positive, got {}",
                self.live_width()
            )));
        }
        if self.live_height() <= ZERO {
            return Err(FlowError::InvalidPaper(format!(
                "live height must be positive, got {}",
                self.live_height()
            )));
        }
        Ok(())
    }

    /// A 90-degree clockwise rotation of this paper. The gutter is unchanged.
    pub fn rotated(&self) -> Paper {
        Paper::new(
            self.height,
            self.width,
            self.margin_left,
            self.margin_top,
            self.margin_right,
            self.margin_bottom,
            self.gutter,
        )
    }
}

impl Default for Paper {
    fn default() -> Self {
        A4
    }
}

/// A4 portrait with 20mm margins.
pub const A4: Paper = Paper {
    width: Length::pt(595.275_590_551),
    height: Length::pt(841.889_763_780),
    margin_top: Length::pt(56.692_913_386),
    margin_right: Length::pt(56.692_913_386),
    margin_bottom: Length::pt(56.692_913_386),
    margin_left: Length::pt(56.692_913_386),
    gutter: ZERO,
};

/// US letter portrait with 1in margins.
pub const LETTER: Paper = Paper {
    width: Length::pt(612.0),
    height: Length::pt(792.0),
    margin_top: Length::pt(72.0),
    margin_right: Length::pt(72.0),
    margin_bottom: Length::pt(72.0),
    margin_left: Length::pt(72.0),
    gutter: ZERO,
};
