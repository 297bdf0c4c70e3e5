use serde::{Deserialize, Serialize};

/// Stroke width range for trade-flow lines. Widths scale linearly
/// with trade value up to `max_trade_value`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StyleTuning {
    pub min_width: f64,
    pub max_width: f64,
    /// Trade value (USD) at which lines reach `max_width`
    pub max_trade_value: f64,
}

impl Default for StyleTuning {
    fn default() -> Self {
        Self {
            min_width: 1.0,
            max_width: 8.0,
            max_trade_value: 50_000_000.0,
        }
    }
}

impl StyleTuning {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if !self.min_width.is_finite() || self.min_width < 0.0 {
            return Err("style.min_width must be a non-negative number".to_string());
        }
        if !self.max_width.is_finite() || self.max_width < self.min_width {
            return Err("style.max_width must be at least style.min_width".to_string());
        }
        if !self.max_trade_value.is_finite() || self.max_trade_value <= 0.0 {
            return Err("style.max_trade_value must be positive".to_string());
        }
        Ok(())
    }
}
