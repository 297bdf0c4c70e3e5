//! Turns trade-flow records into map-ready arc and label layers.

use crate::aggregator::FlowIndex;
use crate::curve::{arc_for_record, CurveSettings};
use crate::dataset::FlowCollection;
use crate::geojson::{decode_features, Feature, FeatureCollection, Geometry};
use crate::label::place_label;
use crate::record::FlowRecord;
use crate::style::{flow_style, StyleSettings};
use serde::Serialize;
use tracing::info;
use tradeflow_config::Config;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderSettings {
    pub curve: CurveSettings,
    pub style: StyleSettings,
}

impl From<&Config> for RenderSettings {
    fn from(config: &Config) -> Self {
        Self {
            curve: CurveSettings::from(&config.curve),
            style: StyleSettings::from(&config.style),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArcProperties {
    /// `None` for records whose direction could not be parsed
    pub flow_key: Option<String>,
    pub origin: String,
    pub destination: String,
    pub trade_value: f64,
    pub item: Option<String>,
    pub year: Option<u16>,
    pub bidirectional: bool,
    pub stroke: &'static str,
    pub stroke_width: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabelProperties {
    pub text: String,
    pub trade_value: f64,
}

/// One arc and one label per input record, in input order.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedLayers {
    pub arcs: FeatureCollection<ArcProperties>,
    pub labels: FeatureCollection<LabelProperties>,
    /// Input features that did not describe a flow
    pub skipped: usize,
}

/// Renders already-decoded records. `default_item` colours records
/// that don't name their own item.
pub fn render_records(
    records: &[FlowRecord],
    default_item: Option<&str>,
    settings: &RenderSettings,
) -> RenderedLayers {
    let index = FlowIndex::build(records);
    let mut arcs = Vec::with_capacity(records.len());
    let mut labels = Vec::with_capacity(records.len());

    for record in records.iter() {
        let arc = arc_for_record(record, &index, &settings.curve);
        let label = place_label(&arc, &record.origin, &record.destination, record.trade_value);
        let item = record.item.as_deref().or(default_item);
        let style = flow_style(item, record.trade_value, &settings.style);

        arcs.push(Feature::new(
            Geometry::LineString(arc.into_points()),
            ArcProperties {
                flow_key: record.key.as_ref().map(|key| key.to_string()),
                origin: record.origin.clone(),
                destination: record.destination.clone(),
                trade_value: record.trade_value,
                item: item.map(str::to_string),
                year: record.year,
                bidirectional: record
                    .key
                    .as_ref()
                    .map(|key| index.is_bidirectional(key))
                    .unwrap_or(false),
                stroke: style.color,
                stroke_width: style.width,
            },
        ));
        labels.push(Feature::new(
            Geometry::Point(label.position),
            LabelProperties {
                text: label.text,
                trade_value: label.trade_value,
            },
        ));
    }

    info!(
        "Rendered {} arcs, {} bidirectional routes",
        arcs.len(),
        index.bidirectional_keys().count()
    );
    RenderedLayers {
        arcs: FeatureCollection::new(arcs),
        labels: FeatureCollection::new(labels),
        skipped: 0,
    }
}

/// Decodes and renders a loaded collection.
pub fn render_collection(collection: &FlowCollection, settings: &RenderSettings) -> RenderedLayers {
    let decoded = decode_features(&collection.features);
    let mut layers = render_records(
        &decoded.records,
        Some(collection.metadata.item.as_str()),
        settings,
    );
    layers.skipped = decoded.skipped;
    layers
}
