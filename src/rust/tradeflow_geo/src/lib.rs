//! Geometry and aggregation for the trade-flow map.
//!
//! Raw GeoJSON trade-flow features are decoded into [`FlowRecord`]s,
//! indexed by direction ([`FlowIndex`]), turned into curved arcs
//! ([`ArcPath`]) with a midpoint [`LabelPoint`] each, and styled. The
//! [`dataset`] module finds and concatenates the generated files on disk.

pub mod aggregator;
pub mod curve;
pub mod dataset;
pub mod geojson;
pub mod label;
pub mod point;
pub mod record;
pub mod render;
pub mod stats;
pub mod style;

pub use aggregator::FlowIndex;
pub use curve::{arc_between, arc_for_record, ArcPath, CurveSettings};
pub use dataset::{CollectionMetadata, DatasetError, FlowCollection, TradeDataset};
pub use geojson::{decode_feature, decode_features, DecodedFeatures};
pub use label::{label_text, place_label, shorten_place, LabelPoint};
pub use point::GeoPoint;
pub use record::{parse_direction, FlowKey, FlowRecord, DIRECTION_SEPARATOR};
pub use render::{render_collection, render_records, RenderSettings, RenderedLayers};
pub use stats::{format_compact, summarize, FlowSummary, PlaceTotal};
pub use style::{color_for_item, flow_style, line_width, FlowStyle, StyleSettings};
