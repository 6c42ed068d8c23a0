//! Document-wide layout configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BREAK_THRESHOLD_MM, DEFAULT_LINE_MARGIN_MM, PAGE_DISPLAY_GAP_MM};
use crate::error::FlowError;
use crate::paper::Paper;
use crate::units::{Length, ZERO};

/// Paper and flow defaults for a document.
///
/// Every field is optional in JSON; missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub paper: Paper,
    /// Horizontal gap between pages on the canvas
    pub display_gap: Length,
    /// Vertical space between consecutive lines of new flows
    pub line_margin: Length,
    /// Break threshold of new flows
    pub break_threshold: Length,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            paper: Paper::default(),
            display_gap: Length::mm(PAGE_DISPLAY_GAP_MM),
            line_margin: Length::mm(DEFAULT_LINE_MARGIN_MM),
            break_threshold: Length::mm(DEFAULT_BREAK_THRESHOLD_MM),
        }
    }
}

impl LayoutConfig {
    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, FlowError> {
        let config: LayoutConfig =
            serde_json::from_str(json).map_err(|e| FlowError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, FlowError> {
        serde_json::to_string_pretty(self).map_err(|e| FlowError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), FlowError> {
        self.paper.validate()?;
        let values = [
            ("display_gap", self.display_gap),
            ("line_margin", self.line_margin),
            ("break_threshold", self.break_threshold),
        ];
        for (name, value) in values {
            if !value.is_finite() || value < ZERO {
                return Err(FlowError::Config(format!("{name} must not be negative, got {value}")));
            }
        }
        Ok(())
    }
}
