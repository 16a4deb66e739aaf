// Slot normalization: the availability webhook has returned its slots as a
// list of labels, as an id -> label mapping and as a JSON string holding
// either. Everything is flattened into an ordered Vec<Slot>.

use crate::models::Slot;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotError {
    #[error("expected a JSON object with a `slots` field")]
    NotAnObject,
    #[error("`slots` is neither a list nor a mapping")]
    UnsupportedShape,
    #[error("`slots` string is not valid JSON: {0}")]
    EmbeddedJson(String),
    #[error("slot entry {0} has no usable label")]
    UnlabelledEntry(usize),
}

const LABEL_KEYS: [&str; 4] = ["label", "slot", "time", "date"];
const ID_KEYS: [&str; 2] = ["id", "slot_id"];

/// Normalize a `{"slots": ...}` reply. A missing or null `slots` field
/// yields an empty list.
pub fn normalize_slots(reply: &Value) -> Result<Vec<Slot>, SlotError> {
    let object = reply.as_object().ok_or(SlotError::NotAnObject)?;
    match object.get("slots") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(encoded)) => {
            let decoded: Value = serde_json::from_str(encoded)
                .map_err(|err| SlotError::EmbeddedJson(err.to_string()))?;
            normalize_collection(&decoded)
        }
        Some(other) => normalize_collection(other),
    }
}

fn normalize_collection(value: &Value) -> Result<Vec<Slot>, SlotError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => from_list(items),
        Value::Object(mapping) => from_mapping(mapping),
        _ => Err(SlotError::UnsupportedShape),
    }
}

fn from_list(items: &[Value]) -> Result<Vec<Slot>, SlotError> {
    let mut slots = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let slot = match item {
            Value::String(label) => Slot::labelled(label.trim()),
            Value::Number(number) => Slot::labelled(&number.to_string()),
            Value::Object(fields) => {
                let label = first_text(fields, &LABEL_KEYS)
                    .ok_or(SlotError::UnlabelledEntry(index))?;
                Slot {
                    id: first_text(fields, &ID_KEYS),
                    label,
                }
            }
            _ => return Err(SlotError::UnlabelledEntry(index)),
        };
        if !slot.label.is_empty() {
            slots.push(slot);
        }
    }
    Ok(slots)
}

// Key order is the order in the reply (serde_json preserve_order). The key
// is the slot id; an object value only contributes its label.
fn from_mapping(mapping: &Map<String, Value>) -> Result<Vec<Slot>, SlotError> {
    let mut slots = Vec::with_capacity(mapping.len());
    for (index, (id, value)) in mapping.iter().enumerate() {
        let label = match value {
            Value::Object(fields) => {
                first_text(fields, &LABEL_KEYS).ok_or(SlotError::UnlabelledEntry(index))?
            }
            other => scalar_text(other).ok_or(SlotError::UnlabelledEntry(index))?,
        };
        if !label.is_empty() {
            slots.push(Slot::with_id(id, &label));
        }
    }
    Ok(slots)
}

fn first_text(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .filter_map(scalar_text)
        .find(|text| !text.is_empty())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
