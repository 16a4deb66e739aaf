use glucose_relay::models::Slot;
use glucose_relay::slots::{normalize_slots, SlotError};
use serde_json::{json, Value};

fn read_fixture(name: &str) -> Value {
    let data = std::fs::read_to_string(format!("tests/fixtures/{name}")).expect("fixture missing");
    serde_json::from_str(&data).expect("fixture is not JSON")
}

fn labels(slots: &[Slot]) -> Vec<&str> {
    slots.iter().map(|slot| slot.label.as_str()).collect()
}

#[test]
fn list_of_labels() {
    let slots = normalize_slots(&read_fixture("slots_list.json")).expect("normalize failed");
    assert_eq!(labels(&slots), vec!["Mon 09:00", "Mon 10:30", "Tue 14:00"]);
    assert!(slots.iter().all(|slot| slot.id.is_none()));
}

#[test]
fn mapping_keeps_reply_order_and_ids() {
    let slots = normalize_slots(&read_fixture("slots_mapping.json")).expect("normalize failed");
    assert_eq!(
        slots,
        vec![
            Slot::with_id("17", "Wed 11:00"),
            Slot::with_id("3", "Wed 15:30"),
            Slot::with_id("9", "Thu 08:45"),
        ]
    );
}

#[test]
fn json_string_is_decoded() {
    let slots = normalize_slots(&read_fixture("slots_encoded.json")).expect("normalize failed");
    assert_eq!(
        slots,
        vec![Slot::with_id("a1", "Fri 09:15"), Slot::with_id("b2", "Fri 13:00")]
    );

    let encoded_list = json!({ "slots": "[\"A\", \"B\"]" });
    let slots = normalize_slots(&encoded_list).expect("normalize failed");
    assert_eq!(labels(&slots), vec!["A", "B"]);
}

#[test]
fn missing_or_null_slots_is_empty() {
    assert!(normalize_slots(&json!({})).expect("normalize failed").is_empty());
    assert!(normalize_slots(&json!({ "slots": null })).expect("normalize failed").is_empty());
    assert!(normalize_slots(&json!({ "slots": [] })).expect("normalize failed").is_empty());
}

#[test]
fn object_entries_and_numbers() {
    let reply = json!({
        "slots": [
            { "id": 4, "time": "Sat 10:00" },
            { "slot_id": "x9", "label": "Sat 12:00" },
            1300,
            "  ",
        ]
    });
    let slots = normalize_slots(&reply).expect("normalize failed");
    assert_eq!(
        slots,
        vec![
            Slot::with_id("4", "Sat 10:00"),
            Slot::with_id("x9", "Sat 12:00"),
            Slot::labelled("1300"),
        ]
    );
}

#[test]
fn blank_label_falls_through_to_next_key() {
    let reply = json!({
        "slots": [
            { "label": " ", "time": "Sat 10:00" },
            { "slot": "", "date": 20240309 },
        ]
    });
    let slots = normalize_slots(&reply).expect("normalize failed");
    assert_eq!(labels(&slots), vec!["Sat 10:00", "20240309"]);
}

#[test]
fn mapping_values_may_be_objects() {
    let reply = json!({ "slots": { "1": "A", "3": { "label": "C", "id": "ignored" }, "4": 1430 } });
    let slots = normalize_slots(&reply).expect("normalize failed");
    assert_eq!(
        slots,
        vec![
            Slot::with_id("1", "A"),
            Slot::with_id("3", "C"),
            Slot::with_id("4", "1430"),
        ]
    );
}

#[test]
fn rejects_unusable_shapes() {
    assert_eq!(
        normalize_slots(&json!({ "slots": { "1": "A", "2": null, "3": { "label": "C" } } })),
        Err(SlotError::UnlabelledEntry(1))
    );
    assert_eq!(
        normalize_slots(&json!({ "slots": { "1": { "id": "1" } } })),
        Err(SlotError::UnlabelledEntry(0))
    );
    assert_eq!(
        normalize_slots(&json!({ "slots": ["A", null] })),
        Err(SlotError::UnlabelledEntry(1))
    );
    assert_eq!(normalize_slots(&json!(["A"])), Err(SlotError::NotAnObject));
    assert_eq!(
        normalize_slots(&json!({ "slots": 5 })),
        Err(SlotError::UnsupportedShape)
    );
    assert_eq!(
        normalize_slots(&json!({ "slots": [{ "id": 1 }] })),
        Err(SlotError::UnlabelledEntry(0))
    );
    assert!(matches!(
        normalize_slots(&json!({ "slots": "not json" })),
        Err(SlotError::EmbeddedJson(_))
    ));
}
