use crate::point::GeoPoint;
use std::fmt;

/// Separator used in `flow_direction` strings: "Chile → China".
pub const DIRECTION_SEPARATOR: &str = " → ";

/// Identifies a directed trade relationship, displayed as
/// `origin-destination`.
///
/// The origin and destination are kept separately so that the reverse
/// key can be built even when a place name itself contains a dash
/// ("Guinea-Bissau").
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlowKey {
    text: String,
    origin: String,
    destination: String,
}

impl FlowKey {
    pub fn new(origin: &str, destination: &str) -> Self {
        Self {
            text: format!("{origin}-{destination}"),
            origin: origin.to_string(),
            destination: destination.to_string(),
        }
    }

    /// The key for trade flowing the other way.
    pub fn reverse(&self) -> Self {
        Self::new(&self.destination, &self.origin)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }
}

impl fmt::Display for FlowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Splits "origin → destination" into its two halves. Returns `None`
/// if the separator is missing or either side is blank.
pub fn parse_direction(direction: &str) -> Option<(&str, &str)> {
    let (origin, destination) = direction.split_once(DIRECTION_SEPARATOR)?;
    let (origin, destination) = (origin.trim(), destination.trim());
    if origin.is_empty() || destination.is_empty() {
        return None;
    }
    Some((origin, destination))
}

/// A single directed trade flow between two places.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowRecord {
    pub origin: String,
    pub destination: String,
    /// `None` when the source direction string could not be parsed.
    /// Such records are still drawn, but never paired with a reverse flow.
    pub key: Option<FlowKey>,
    pub start: GeoPoint,
    pub end: GeoPoint,
    pub trade_value: f64,
    pub net_weight: f64,
    pub quantity: f64,
    pub item: Option<String>,
    pub year: Option<u16>,
}

impl FlowRecord {
    /// Builds a keyed record with no optional attributes.
    pub fn new(
        origin: &str,
        destination: &str,
        start: GeoPoint,
        end: GeoPoint,
        trade_value: f64,
    ) -> Self {
        Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            key: Some(FlowKey::new(origin, destination)),
            start,
            end,
            trade_value: sanitize_value(trade_value),
            net_weight: 0.0,
            quantity: 0.0,
            item: None,
            year: None,
        }
    }

    pub fn with_item(mut self, item: &str) -> Self {
        self.item = Some(item.to_string());
        self
    }
}

/// Trade values are never negative; anything unusable counts as zero.
pub(crate) fn sanitize_value(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn key_text_and_reverse() {
        let key = FlowKey::new("Chile", "China");
        assert_eq!(key.as_str(), "Chile-China");
        assert_eq!(key.reverse().as_str(), "China-Chile");
        assert_eq!(key.reverse().reverse(), key);
    }

    #[test]
    fn reverse_with_dashed_names() {
        let key = FlowKey::new("Guinea-Bissau", "Portugal");
        assert_eq!(key.reverse(), FlowKey::new("Portugal", "Guinea-Bissau"));
    }

    #[test]
    fn direction_parsing() {
        assert_eq!(
            parse_direction("United States → China"),
            Some(("United States", "China"))
        );
        assert_eq!(parse_direction("United States to China"), None);
        assert_eq!(parse_direction(" → China"), None);
        assert_eq!(parse_direction(""), None);
    }

    #[test]
    fn negative_values_are_zero() {
        let record = FlowRecord::new(
            "A",
            "B",
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 1.0),
            -5.0,
        );
        assert_eq!(record.trade_value, 0.0);
        assert_eq!(sanitize_value(f64::NAN), 0.0);
    }
}
