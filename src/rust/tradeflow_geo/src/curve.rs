//! Curved arcs for trade routes.
//!
//! Long routes are drawn as a cubic Bézier bowing toward the pole of
//! the hemisphere they sit in. Bidirectional pairs get an extra
//! latitude offset of opposite sign so the two arcs separate. Short
//! hops are drawn straight.

use crate::aggregator::FlowIndex;
use crate::point::GeoPoint;
use crate::record::FlowRecord;
use tradeflow_config::CurveTuning;

/// Longest straight line between two valid positions: the diagonal of
/// the 360 x 180 degree lon/lat box.
pub const MAX_ARC_DISTANCE: f64 = 402.492_235_95;

/// Upper bound on the segments sampled for one arc.
pub const MAX_SEGMENTS: usize = 4096;

/// Parameters for [`arc_between`]. See [`CurveTuning`] for the meaning
/// of each field.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveSettings {
    pub short_hop_distance: f64,
    pub curvature_ratio: f64,
    pub max_curvature: f64,
    pub bidirectional_offset_ratio: f64,
    pub control_point_ratio: f64,
    pub min_segments: usize,
    pub degrees_per_segment: f64,
}

impl Default for CurveSettings {
    fn default() -> Self {
        Self::from(&CurveTuning::default())
    }
}

impl From<&CurveTuning> for CurveSettings {
    fn from(tuning: &CurveTuning) -> Self {
        Self {
            short_hop_distance: tuning.short_hop_distance,
            curvature_ratio: tuning.curvature_ratio,
            max_curvature: tuning.max_curvature,
            bidirectional_offset_ratio: tuning.bidirectional_offset_ratio,
            control_point_ratio: tuning.control_point_ratio,
            min_segments: tuning.min_segments.max(1),
            degrees_per_segment: tuning.degrees_per_segment,
        }
    }
}

impl CurveSettings {
    /// Number of segments used to sample a curve spanning `distance` degrees.
    ///
    /// Distances beyond [`MAX_ARC_DISTANCE`] are treated as that distance,
    /// and the result never exceeds [`MAX_SEGMENTS`].
    pub fn segments_for(&self, distance: f64) -> usize {
        let scaled = if self.degrees_per_segment > 0.0 {
            (distance.min(MAX_ARC_DISTANCE) / self.degrees_per_segment).ceil()
        } else {
            0.0
        };
        // `as` saturates, NaN becomes zero
        self.min_segments.max(scaled as usize).min(MAX_SEGMENTS)
    }
}

/// An ordered polyline from a flow's start to its end.
///
/// Always holds at least two points; the first and last are exactly
/// the endpoints it was built from.
#[derive(Clone, Debug, PartialEq)]
pub struct ArcPath {
    points: Vec<GeoPoint>,
}

impl ArcPath {
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Never true, provided for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> GeoPoint {
        self.points[0]
    }

    pub fn end(&self) -> GeoPoint {
        self.points[self.points.len() - 1]
    }

    /// The point at index `floor(len / 2)`.
    pub fn middle(&self) -> GeoPoint {
        self.points[self.points.len() / 2]
    }

    pub fn into_points(self) -> Vec<GeoPoint> {
        self.points
    }
}

/// Builds the arc from `start` to `end`.
///
/// `offset_sign` is `1.0` / `-1.0` for the two halves of a
/// bidirectional pair and `0.0` otherwise (see
/// [`FlowIndex::offset_sign`]). Coordinates must be finite.
pub fn arc_between(
    start: GeoPoint,
    end: GeoPoint,
    offset_sign: f64,
    settings: &CurveSettings,
) -> ArcPath {
    let distance = start.distance_to(&end);
    if distance < settings.short_hop_distance {
        return ArcPath {
            points: vec![start, end],
        };
    }

    let midpoint = start.midpoint(&end);
    let curvature = (distance * settings.curvature_ratio).min(settings.max_curvature);
    let hemisphere = if midpoint.lat >= 0.0 { 1.0 } else { -1.0 };
    let offset = offset_sign * curvature * settings.bidirectional_offset_ratio;
    let apex = GeoPoint::new(midpoint.lon, midpoint.lat + hemisphere * curvature + offset);

    let control1 = start.lerp(&apex, settings.control_point_ratio);
    let control2 = end.lerp(&apex, settings.control_point_ratio);

    let segments = settings.segments_for(distance);
    let mut points = Vec::with_capacity(segments + 1);
    points.push(start);
    for step in 1..segments {
        let t = step as f64 / segments as f64;
        points.push(cubic_bezier(start, control1, control2, end, t));
    }
    points.push(end);

    ArcPath { points }
}

/// Builds the arc for one record, looking up its offset in `index`.
pub fn arc_for_record(record: &FlowRecord, index: &FlowIndex, settings: &CurveSettings) -> ArcPath {
    arc_between(
        record.start,
        record.end,
        index.offset_sign_for(record),
        settings,
    )
}

fn cubic_bezier(p0: GeoPoint, p1: GeoPoint, p2: GeoPoint, p3: GeoPoint, t: f64) -> GeoPoint {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    GeoPoint::new(
        a * p0.lon + b * p1.lon + c * p2.lon + d * p3.lon,
        a * p0.lat + b * p1.lat + c * p2.lat + d * p3.lat,
    )
}
