use serde_json::{json, Value};
use uuid::Uuid;

use crate::types::RawAttribute;
use crate::{Error, Result};

pub const INTENT_EXECUTE: &str = "execute";

/// Parse a hub attribute list (`[{"attr": .., "value": ..}, ..]`).
/// Entries that are not attribute objects are skipped.
pub fn parse_attributes(value: &Value) -> Vec<RawAttribute> {
    let Some(items) = value.as_array() else {
        return vec![];
    };
    items
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect()
}

/// Split a hub report into per-device deltas, in delivery order.
///
/// Accepts `{"entities": [{"id": .., "attributes": [..]}, ..]}`; entities
/// without an id are dropped.
pub fn parse_report(body: &str) -> Result<Vec<(String, Vec<RawAttribute>)>> {
    let parsed: Value = serde_json::from_str(body)?;
    let entities = match parsed.get("entities") {
        Some(Value::Array(entities)) => entities,
        _ => return Err(Error::Protocol("report without entities".to_string())),
    };
    Ok(entities
        .iter()
        .filter_map(|entity| {
            let id = entity.get("id")?.as_str()?;
            let attrs = parse_attributes(entity.get("attributes").unwrap_or(&Value::Null));
            Some((id.to_string(), attrs))
        })
        .collect())
}

pub fn attributes_json(attrs: &[RawAttribute]) -> Value {
    Value::Array(
        attrs
            .iter()
            .map(|a| json!({ "attr": a.name, "value": a.value }))
            .collect(),
    )
}

/// Request envelope writing `attrs` to one device.
pub fn execute_message(device_id: &str, attrs: &[RawAttribute]) -> Value {
    json!({
        "reqId": Uuid::new_v4().to_string(),
        "intent": INTENT_EXECUTE,
        "entities": [{
            "id": device_id,
            "attributes": attributes_json(attrs),
        }]
    })
}
