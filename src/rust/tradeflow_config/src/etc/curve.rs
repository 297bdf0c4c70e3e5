//! Tuning for the curved trade-route arcs.
//!
//! All distances are in degrees, measured as straight lines in
//! longitude/latitude space.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CurveTuning {
    /// Endpoints closer than this are joined with a straight segment.
    pub short_hop_distance: f64,

    /// Curvature grows by this fraction of the endpoint distance...
    pub curvature_ratio: f64,

    /// ...but never beyond this many degrees.
    pub max_curvature: f64,

    /// Fraction of the curvature added (or removed) for each direction
    /// of a bidirectional pair.
    pub bidirectional_offset_ratio: f64,

    /// How far along the endpoint-to-apex line each Bézier control point sits.
    pub control_point_ratio: f64,

    /// Fewest segments a curved arc is sampled with.
    pub min_segments: usize,

    /// One extra segment per this many degrees of distance.
    pub degrees_per_segment: f64,
}

impl Default for CurveTuning {
    fn default() -> Self {
        Self {
            short_hop_distance: 5.0,
            curvature_ratio: 0.2,
            max_curvature: 20.0,
            bidirectional_offset_ratio: 0.35,
            control_point_ratio: 0.3,
            min_segments: 15,
            degrees_per_segment: 3.0,
        }
    }
}

impl CurveTuning {
    pub(crate) fn validate(&self) -> Result<(), String> {
        let finite_non_negative = [
            ("short_hop_distance", self.short_hop_distance),
            ("curvature_ratio", self.curvature_ratio),
            ("max_curvature", self.max_curvature),
            ("bidirectional_offset_ratio", self.bidirectional_offset_ratio),
        ];
        for (name, value) in finite_non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("curve.{name} must be a non-negative number"));
            }
        }
        if !(0.0..=1.0).contains(&self.control_point_ratio) {
            return Err("curve.control_point_ratio must be between 0 and 1".to_string());
        }
        if self.min_segments < 1 {
            return Err("curve.min_segments must be at least 1".to_string());
        }
        if !self.degrees_per_segment.is_finite() || self.degrees_per_segment <= 0.0 {
            return Err("curve.degrees_per_segment must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::CurveTuning;

    #[test]
    fn defaults_validate() {
        assert!(CurveTuning::default().validate().is_ok());
    }

    #[test]
    fn zero_segment_length_is_rejected() {
        let tuning = CurveTuning {
            degrees_per_segment: 0.0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn control_ratio_out_of_range_is_rejected() {
        let tuning = CurveTuning {
            control_point_ratio: 1.5,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }
}
