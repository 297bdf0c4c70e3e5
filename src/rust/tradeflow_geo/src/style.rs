//! Stroke styling for trade-flow lines, as a pure function of the
//! record's item and trade value.

use serde::Serialize;
use tradeflow_config::StyleTuning;

/// Colour used for items without their own entry.
pub const DEFAULT_COLOR: &str = "#6b7280";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlowStyle {
    pub color: &'static str,
    pub width: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StyleSettings {
    pub min_width: f64,
    pub max_width: f64,
    pub max_trade_value: f64,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self::from(&StyleTuning::default())
    }
}

impl From<&StyleTuning> for StyleSettings {
    fn from(tuning: &StyleTuning) -> Self {
        Self {
            min_width: tuning.min_width,
            max_width: tuning.max_width,
            max_trade_value: tuning.max_trade_value,
        }
    }
}

pub fn color_for_item(item: &str) -> &'static str {
    match item {
        "semiconductor" => "#3b82f6",
        "oil" => "#ef4444",
        "copper" => "#f59e0b",
        "plastic_3901" => "#10b981",
        "plastic_3902" => "#16a34a",
        "plastic_3903" => "#22c55e",
        _ => DEFAULT_COLOR,
    }
}

/// Linear between `min_width` (no trade) and `max_width` (at or above
/// `max_trade_value`).
pub fn line_width(trade_value: f64, settings: &StyleSettings) -> f64 {
    if !trade_value.is_finite() || trade_value <= 0.0 || settings.max_trade_value <= 0.0 {
        return settings.min_width;
    }
    let normalized = (trade_value / settings.max_trade_value).min(1.0);
    settings.min_width + (settings.max_width - settings.min_width) * normalized
}

pub fn flow_style(item: Option<&str>, trade_value: f64, settings: &StyleSettings) -> FlowStyle {
    FlowStyle {
        color: item.map(color_for_item).unwrap_or(DEFAULT_COLOR),
        width: line_width(trade_value, settings),
    }
}
