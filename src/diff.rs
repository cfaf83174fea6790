use std::collections::BTreeMap;

use crate::types::{RawAttribute, RawValue};

/// Last reported value of every attribute of one device.
pub(crate) type Snapshot = BTreeMap<String, RawValue>;

/// Attributes whose value in `delta` differs from `previous`, as `(name, old, new)`,
/// sorted by name. Duplicate names in a delta collapse to the last value.
pub(crate) fn diff_attributes(
    previous: &Snapshot,
    delta: &[RawAttribute],
) -> Vec<(String, Option<RawValue>, RawValue)> {
    let latest: BTreeMap<&str, RawValue> =
        delta.iter().map(|a| (a.name.as_str(), a.value)).collect();
    latest
        .into_iter()
        .filter_map(|(name, new)| {
            let old = previous.get(name).copied();
            (old != Some(new)).then(|| (name.to_string(), old, new))
        })
        .collect()
}

pub(crate) fn merge_attributes(snapshot: &mut Snapshot, delta: &[RawAttribute]) {
    for attr in delta {
        snapshot.insert(attr.name.clone(), attr.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pairs: &[(&str, i64)]) -> Snapshot {
        pairs
            .iter()
            .map(|(n, v)| (n.to_string(), RawValue::Int(*v)))
            .collect()
    }

    #[test]
    fn detects_changed_value() {
        let prev = snapshot(&[("acMode", 1), ("acRunning", 1)]);
        let changes = diff_attributes(&prev, &[RawAttribute::new("acMode", 8)]);
        assert_eq!(
            changes,
            vec![("acMode".to_string(), Some(RawValue::Int(1)), RawValue::Int(8))]
        );
    }

    #[test]
    fn ignores_unchanged() {
        let prev = snapshot(&[("on", 1)]);
        assert!(diff_attributes(&prev, &[RawAttribute::new("on", 1)]).is_empty());
    }

    #[test]
    fn new_attribute_has_no_old_value() {
        let changes = diff_attributes(&Snapshot::new(), &[RawAttribute::new("battery", 90)]);
        assert_eq!(changes[0].1, None);
    }

    #[test]
    fn duplicates_collapse_to_last() {
        let prev = snapshot(&[("on", 0)]);
        let delta = [RawAttribute::new("on", 1), RawAttribute::new("on", 0)];
        assert!(diff_attributes(&prev, &delta).is_empty());
    }

    #[test]
    fn merge_overwrites() {
        let mut snap = snapshot(&[("on", 0), ("brightness", 10)]);
        merge_attributes(&mut snap, &[RawAttribute::new("on", 1)]);
        assert_eq!(snap["on"], RawValue::Int(1));
        assert_eq!(snap["brightness"], RawValue::Int(10));
    }
}
