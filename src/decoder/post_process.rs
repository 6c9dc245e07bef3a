//! Post-processing of walked fields
//!
//! Turns each protocol's field list into its final object, filters the outputs
//! down to spendable ones and applies the Bit.sv placeholder normalisation.

use super::walker::{DecodedField, FieldRecord, UNNAMED_PROTOCOL};
use crate::types::protocols::constants::{BITSV_PREFIX, MAP};
use crate::types::Output;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Final per-protocol objects keyed by protocol name
pub type ProtocolRecord = BTreeMap<String, Map<String, Value>>;

/// MAP field carrying the command (`SET`, `ADD`, ...)
pub const MAP_COMMAND_FIELD: &str = "cmd";

/// Collapse MAP's alternating key/value pushdata into one object.
///
/// `cmd` is copied as-is. Every other field alternates key, value, key, value by
/// position: parity decides the role, not the field name. A sequence such as
/// `key, key, val` therefore pairs the first key with the second key's value.
/// A key slot without a value leaves nothing pending, and a trailing key with no
/// value is dropped.
pub fn collapse_map_fields(fields: &[DecodedField]) -> Map<String, Value> {
    let mut collapsed = Map::new();
    let mut pending_key: Option<String> = None;
    let mut slot = 0usize;

    for field in fields {
        if field.name == MAP_COMMAND_FIELD {
            collapsed.insert(
                MAP_COMMAND_FIELD.to_string(),
                field.value.clone().unwrap_or(Value::Null),
            );
            continue;
        }

        if slot % 2 == 0 {
            // An absent key drops its value. JS bmap decoders write it under
            // the literal key "undefined" instead.
            pending_key = field.value.as_ref().map(map_key);
        } else if let Some(key) = pending_key.take() {
            collapsed.insert(key, field.value.clone().unwrap_or(Value::Null));
        }
        slot += 1;
    }

    if let Some(key) = pending_key {
        debug!("MAP key {:?} has no value, dropped", key);
    }

    collapsed
}

fn map_key(value: &Value) -> String {
    match value {
        Value::String(key) => key.clone(),
        other => other.to_string(),
    }
}

/// Merge single-field entries in order; later names overwrite earlier ones
pub fn reduce_fields(fields: &[DecodedField]) -> Map<String, Value> {
    fields
        .iter()
        .map(|field| {
            (
                field.name.clone(),
                field.value.clone().unwrap_or(Value::Null),
            )
        })
        .collect()
}

/// Shape every protocol's fields into its final object
pub fn finalise_protocols(record: FieldRecord) -> ProtocolRecord {
    record
        .into_iter()
        .map(|(protocol, fields)| {
            let shaped = if protocol == MAP {
                collapse_map_fields(&fields)
            } else {
                reduce_fields(&fields)
            };
            (protocol, shaped)
        })
        .collect()
}

/// Outputs that carry value and are not data carriers, in original order
pub fn spendable_outputs(outputs: &[Output]) -> Vec<Output> {
    outputs
        .iter()
        .filter(|output| output.has_spendable_value() && !output.is_data_carrier())
        .cloned()
        .collect()
}

/// Bit.sv placeholder normalisation.
///
/// An `OP_FALSE OP_RETURN <Bit.sv prefix>` carrier walks as an unnamed protocol
/// whose only pushdata is the Bit.sv prefix. That record is re-keyed as an
/// empty object under the prefix itself. Returns whether the record changed.
pub fn collapse_legacy_placeholder(protocols: &mut ProtocolRecord) -> bool {
    let is_placeholder = protocols
        .get(UNNAMED_PROTOCOL)
        .and_then(|fields| fields.get("pushdata"))
        .and_then(Value::as_str)
        == Some(BITSV_PREFIX);

    if is_placeholder {
        protocols.remove(UNNAMED_PROTOCOL);
        protocols.insert(BITSV_PREFIX.to_string(), Map::new());
        debug!("Collapsed unnamed Bit.sv placeholder record");
    }

    is_placeholder
}
