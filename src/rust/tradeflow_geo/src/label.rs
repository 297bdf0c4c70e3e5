use crate::curve::ArcPath;
use crate::point::GeoPoint;
use crate::record::DIRECTION_SEPARATOR;
use serde::Serialize;

/// Place names longer than this are cut short on labels.
pub const LABEL_NAME_CHARS: usize = 8;

/// Text anchored at the middle of an arc.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabelPoint {
    pub position: GeoPoint,
    pub text: String,
    pub trade_value: f64,
}

/// "United States" becomes "United S...". Counts characters, not bytes.
pub fn shorten_place(name: &str) -> String {
    if name.chars().count() > LABEL_NAME_CHARS {
        let mut short: String = name.chars().take(LABEL_NAME_CHARS).collect();
        short.push_str("...");
        short
    } else {
        name.to_string()
    }
}

pub fn label_text(origin: &str, destination: &str) -> String {
    format!(
        "{}{DIRECTION_SEPARATOR}{}",
        shorten_place(origin),
        shorten_place(destination)
    )
}

/// Places a label at index `floor(len / 2)` of `arc`.
pub fn place_label(arc: &ArcPath, origin: &str, destination: &str, trade_value: f64) -> LabelPoint {
    LabelPoint {
        position: arc.middle(),
        text: label_text(origin, destination),
        trade_value,
    }
}
