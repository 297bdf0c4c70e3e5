//! Aggregate statistics shown beside the map.

use crate::record::FlowRecord;
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeMap;

/// Summed trade for one exporting or importing place.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlaceTotal {
    pub name: String,
    pub value: f64,
    pub flows: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlowSummary {
    pub total_trade_value: f64,
    pub total_quantity: f64,
    pub total_flows: usize,
    pub average_trade_value: f64,
    pub top_exporters: Vec<PlaceTotal>,
    pub top_importers: Vec<PlaceTotal>,
}

/// Totals over every record; the exporter/importer rankings only
/// consider records with a parsed direction.
pub fn summarize(records: &[FlowRecord], top_n: usize) -> FlowSummary {
    let total_trade_value: f64 = records.iter().map(|r| r.trade_value).sum();
    let total_quantity: f64 = records.iter().map(|r| r.quantity).sum();
    let average_trade_value = if records.is_empty() {
        0.0
    } else {
        total_trade_value / records.len() as f64
    };

    let mut exporters: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    let mut importers: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for flow in records.iter().filter(|r| r.key.is_some()) {
        let exporter = exporters.entry(flow.origin.as_str()).or_default();
        exporter.0 += flow.trade_value;
        exporter.1 += 1;
        let importer = importers.entry(flow.destination.as_str()).or_default();
        importer.0 += flow.trade_value;
        importer.1 += 1;
    }

    FlowSummary {
        total_trade_value,
        total_quantity,
        total_flows: records.len(),
        average_trade_value,
        top_exporters: top_places(exporters, top_n),
        top_importers: top_places(importers, top_n),
    }
}

fn top_places(places: BTreeMap<&str, (f64, usize)>, top_n: usize) -> Vec<PlaceTotal> {
    places
        .into_iter()
        // BTreeMap iterates by name, and the sort is stable, so ties stay alphabetical
        .sorted_by(|a, b| b.1 .0.total_cmp(&a.1 .0))
        .take(top_n)
        .map(|(name, (value, flows))| PlaceTotal {
            name: name.to_string(),
            value,
            flows,
        })
        .collect()
}

/// Short human form of a number: 1.5B, 2.5M, 1.2K, 950.
pub fn format_compact(value: f64) -> String {
    if value >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.1}K", value / 1e3)
    } else {
        format!("{value:.0}")
    }
}
