//! Groups flow records by direction and finds bidirectional pairs.

use crate::record::{FlowKey, FlowRecord};
use std::collections::{BTreeMap, BTreeSet};

/// Index of flow records by [`FlowKey`].
///
/// A key is *bidirectional* when its reverse key is also present. The
/// pairing is answered by lookup ([`FlowIndex::has_reverse`]) rather
/// than by records referring to one another.
#[derive(Debug, Default)]
pub struct FlowIndex<'a> {
    by_key: BTreeMap<&'a FlowKey, Vec<&'a FlowRecord>>,
    bidirectional: BTreeSet<&'a FlowKey>,
}

impl<'a> FlowIndex<'a> {
    /// Indexes `records`. Records without a key are left out.
    pub fn build(records: &'a [FlowRecord]) -> Self {
        let mut by_key: BTreeMap<&'a FlowKey, Vec<&'a FlowRecord>> = BTreeMap::new();
        for record in records.iter() {
            if let Some(key) = &record.key {
                by_key.entry(key).or_default().push(record);
            }
        }

        let bidirectional = by_key
            .keys()
            .filter(|key| {
                let reverse = key.reverse();
                reverse != ***key && by_key.contains_key(&reverse)
            })
            .copied()
            .collect();

        Self {
            by_key,
            bidirectional,
        }
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// All records sharing `key`, in input order.
    pub fn get(&self, key: &FlowKey) -> Option<&[&'a FlowRecord]> {
        self.by_key.get(key).map(|records| records.as_slice())
    }

    /// Is the reverse of `key` present in the index?
    pub fn has_reverse(&self, key: &FlowKey) -> bool {
        let reverse = key.reverse();
        reverse != *key && self.by_key.contains_key(&reverse)
    }

    pub fn is_bidirectional(&self, key: &FlowKey) -> bool {
        self.bidirectional.contains(key)
    }

    pub fn bidirectional_keys(&self) -> impl Iterator<Item = &'a FlowKey> + '_ {
        self.bidirectional.iter().copied()
    }

    /// Lateral offset direction for arcs drawn for `key`.
    ///
    /// Of a bidirectional pair, the key whose (origin, destination)
    /// sorts first is the forward flow (`1.0`) and its partner the
    /// reverse flow (`-1.0`). Everything else gets `0.0`.
    ///
    /// Compares the names rather than the joined text, which can be the
    /// same for both halves when names contain dashes.
    pub fn offset_sign(&self, key: &FlowKey) -> f64 {
        if !self.is_bidirectional(key) {
            return 0.0;
        }
        if (key.origin(), key.destination()) < (key.destination(), key.origin()) {
            1.0
        } else {
            -1.0
        }
    }

    /// [`FlowIndex::offset_sign`] for a record, `0.0` when it has no key.
    pub fn offset_sign_for(&self, record: &FlowRecord) -> f64 {
        record
            .key
            .as_ref()
            .map(|key| self.offset_sign(key))
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod test {
    use super::FlowIndex;
    use crate::point::GeoPoint;
    use crate::record::{FlowKey, FlowRecord};

    fn record(origin: &str, destination: &str) -> FlowRecord {
        FlowRecord::new(
            origin,
            destination,
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(10.0, 10.0),
            100.0,
        )
    }

    #[test]
    fn empty_input() {
        let index = FlowIndex::build(&[]);
        assert!(index.is_empty());
        assert_eq!(index.bidirectional_keys().count(), 0);
    }

    #[test]
    fn pair_is_bidirectional() {
        let records = vec![record("A", "B"), record("B", "A")];
        let index = FlowIndex::build(&records);
        let ab = FlowKey::new("A", "B");
        let ba = FlowKey::new("B", "A");
        assert!(index.is_bidirectional(&ab));
        assert!(index.is_bidirectional(&ba));
        assert!(index.has_reverse(&ab));
        assert_eq!(index.bidirectional_keys().count(), 2);
    }

    #[test]
    fn lone_flow_is_not_bidirectional() {
        let records = vec![record("A", "B")];
        let index = FlowIndex::build(&records);
        let ab = FlowKey::new("A", "B");
        assert!(!index.is_bidirectional(&ab));
        assert!(!index.has_reverse(&ab));
        assert_eq!(index.offset_sign(&ab), 0.0);
    }

    #[test]
    fn duplicates_share_a_key() {
        let records = vec![record("A", "B"), record("A", "B"), record("C", "D")];
        let index = FlowIndex::build(&records);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(&FlowKey::new("A", "B")).map(|r| r.len()), Some(2));
        assert!(index.get(&FlowKey::new("B", "A")).is_none());
    }

    #[test]
    fn self_loop_is_not_its_own_reverse() {
        let records = vec![record("A", "A")];
        let index = FlowIndex::build(&records);
        assert!(!index.is_bidirectional(&FlowKey::new("A", "A")));
    }

    #[test]
    fn offsets_have_opposite_signs() {
        let records = vec![record("Chile", "China"), record("China", "Chile")];
        let index = FlowIndex::build(&records);
        let forward = index.offset_sign(&FlowKey::new("Chile", "China"));
        let reverse = index.offset_sign(&FlowKey::new("China", "Chile"));
        assert_eq!(forward, 1.0);
        assert_eq!(reverse, -1.0);
    }

    #[test]
    fn dashed_names_get_opposite_signs() {
        let records = vec![record("a", "a-a"), record("a-a", "a")];
        let index = FlowIndex::build(&records);
        let forward = FlowKey::new("a", "a-a");
        let reverse = FlowKey::new("a-a", "a");
        assert_eq!(forward.as_str(), reverse.as_str());
        assert!(index.is_bidirectional(&forward));
        assert!(index.is_bidirectional(&reverse));
        assert_eq!(index.offset_sign(&forward), 1.0);
        assert_eq!(index.offset_sign(&reverse), -1.0);

        let records = vec![
            record("Guinea-Bissau", "Senegal"),
            record("Senegal", "Guinea-Bissau"),
        ];
        let index = FlowIndex::build(&records);
        let sum = index.offset_sign_for(&records[0]) + index.offset_sign_for(&records[1]);
        assert_eq!(sum, 0.0);
        assert_ne!(index.offset_sign_for(&records[0]), 0.0);
    }

    #[test]
    fn unkeyed_records_are_skipped() {
        let mut broken = record("A", "B");
        broken.key = None;
        let records = vec![broken, record("B", "A")];
        let index = FlowIndex::build(&records);
        assert_eq!(index.len(), 1);
        assert_eq!(index.offset_sign_for(&records[0]), 0.0);
        assert!(!index.is_bidirectional(&FlowKey::new("B", "A")));
    }
}
