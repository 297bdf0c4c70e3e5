//! Reading trade-flow features and writing rendered layers as GeoJSON.
//!
//! Input features are handled as raw `serde_json::Value`s, since the
//! generated files vary in which properties they carry. Output layers
//! are typed.

use crate::point::GeoPoint;
use crate::record::{parse_direction, sanitize_value, FlowKey, FlowRecord};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Records decoded from a batch of features, plus how many were unusable.
#[derive(Debug, Default)]
pub struct DecodedFeatures {
    pub records: Vec<FlowRecord>,
    pub skipped: usize,
}

/// Decodes every feature that describes a flow.
pub fn decode_features(features: &[Value]) -> DecodedFeatures {
    let mut decoded = DecodedFeatures::default();
    for (index, feature) in features.iter().enumerate() {
        match decode_feature(feature) {
            Some(record) => decoded.records.push(record),
            None => {
                debug!("Skipping feature {index}: not a usable LineString flow");
                decoded.skipped += 1;
            }
        }
    }
    if decoded.skipped > 0 {
        warn!(
            "Skipped {} of {} features that could not be decoded",
            decoded.skipped,
            features.len()
        );
    }
    decoded
}

/// Turns one GeoJSON feature into a [`FlowRecord`].
///
/// The geometry must be a `LineString` with at least two positions,
/// each inside the lon/lat range; the first and last become the endpoints. The direction
/// comes from `flow_direction` ("origin → destination"), or from
/// `partner_name` → `reporter_name` when that property is absent.
pub fn decode_feature(feature: &Value) -> Option<FlowRecord> {
    let geometry = feature.get("geometry")?;
    if geometry.get("type")?.as_str()? != "LineString" {
        return None;
    }
    let coordinates = geometry.get("coordinates")?.as_array()?;
    if coordinates.len() < 2 {
        return None;
    }
    let start = position(coordinates.first()?)?;
    let end = position(coordinates.last()?)?;

    let empty = serde_json::Map::new();
    let properties = feature
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let text = |name: &str| properties.get(name).and_then(Value::as_str);
    let number = |name: &str| properties.get(name).and_then(Value::as_f64);

    let partner = text("partner_name").unwrap_or("Unknown");
    let reporter = text("reporter_name").unwrap_or("Unknown");
    let (origin, destination, key) = match text("flow_direction") {
        Some(direction) => match parse_direction(direction) {
            Some((origin, destination)) => {
                (origin, destination, Some(FlowKey::new(origin, destination)))
            }
            None => (partner, reporter, None),
        },
        None => (partner, reporter, Some(FlowKey::new(partner, reporter))),
    };

    Some(FlowRecord {
        origin: origin.to_string(),
        destination: destination.to_string(),
        key,
        start,
        end,
        trade_value: sanitize_value(number("trade_value").unwrap_or(0.0)),
        net_weight: sanitize_value(number("net_weight").unwrap_or(0.0)),
        quantity: sanitize_value(
            number("quantity")
                .or_else(|| number("trade_quantity"))
                .unwrap_or(0.0),
        ),
        item: text("item").map(str::to_string),
        year: properties
            .get("year")
            .and_then(Value::as_u64)
            .and_then(|year| u16::try_from(year).ok()),
    })
}

fn position(value: &Value) -> Option<GeoPoint> {
    let pair = value.as_array()?;
    if pair.len() < 2 {
        return None;
    }
    let point = GeoPoint::new(pair[0].as_f64()?, pair[1].as_f64()?);
    point.is_valid_position().then_some(point)
}

/// Geometry for the rendered layers.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(GeoPoint),
    LineString(Vec<GeoPoint>),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Feature<P> {
    #[serde(rename = "type")]
    kind: &'static str,
    pub geometry: Geometry,
    pub properties: P,
}

impl<P> Feature<P> {
    pub fn new(geometry: Geometry, properties: P) -> Self {
        Self {
            kind: "Feature",
            geometry,
            properties,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeatureCollection<P> {
    #[serde(rename = "type")]
    kind: &'static str,
    pub features: Vec<Feature<P>>,
}

impl<P> FeatureCollection<P> {
    pub fn new(features: Vec<Feature<P>>) -> Self {
        Self {
            kind: "FeatureCollection",
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
