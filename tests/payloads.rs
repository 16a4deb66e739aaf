use chrono::NaiveDate;
use glucose_relay::models::{
    ConfirmStyle, GlucoseLevel, GlucoseSubmission, Reading, ReadingError, ReadingType, Slot,
    SlotSelection,
};
use serde_json::json;

#[test]
fn submission_matches_webhook_shape() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 7).expect("valid date");
    let readings = vec![
        Reading::new(100, ReadingType::PreMeal).expect("valid reading"),
        Reading::new(140, ReadingType::PostMeal).expect("valid reading"),
    ];
    let submission = GlucoseSubmission::dated(date, " Jane Roe ", readings, "Felt dizzy")
        .expect("valid submission");

    let value = serde_json::to_value(&submission).expect("serialize failed");
    assert_eq!(
        value,
        json!({
            "Date": "2024-03-07",
            "Patient_Name": "Jane Roe",
            "Readings": [
                { "Glucose_Level": 100, "Reading_Type": "Pre-Meal" },
                { "Glucose_Level": 140, "Reading_Type": "Post-Meal" }
            ],
            "Notes": "Felt dizzy"
        })
    );
}

#[test]
fn reading_type_labels_match_wire_tags() {
    for kind in [ReadingType::PreMeal, ReadingType::PostMeal] {
        assert_eq!(serde_json::to_value(kind).expect("serialize failed"), json!(kind.label()));
    }
}

#[test]
fn every_accepted_value_gives_dated_payload() {
    for value in 20..=500u16 {
        let submission = GlucoseSubmission::pre_and_post_meal("John Doe", value, value, "")
            .expect("value in range");
        let payload = serde_json::to_value(&submission).expect("serialize failed");

        let date = payload["Date"].as_str().expect("date is a string");
        assert!(NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok(), "bad date {date}");
        assert_eq!(payload["Readings"][0]["Glucose_Level"], json!(value));
        assert_eq!(payload["Readings"][1]["Reading_Type"], json!("Post-Meal"));
    }
}

#[test]
fn out_of_range_values_are_rejected() {
    assert_eq!(GlucoseLevel::new(19), Err(ReadingError::OutOfRange(19)));
    assert_eq!(GlucoseLevel::new(501), Err(ReadingError::OutOfRange(501)));
    assert_eq!(GlucoseLevel::new(20).map(GlucoseLevel::value), Ok(20));
    assert_eq!(GlucoseLevel::new(500).map(GlucoseLevel::value), Ok(500));

    let err = GlucoseSubmission::pre_and_post_meal("John Doe", 100, 900, "").unwrap_err();
    assert_eq!(err, ReadingError::OutOfRange(900));
}

#[test]
fn one_or_two_readings_only() {
    let single = vec![Reading::new(95, ReadingType::PreMeal).expect("valid reading")];
    assert!(GlucoseSubmission::new("John Doe", single, "").is_ok());

    assert_eq!(
        GlucoseSubmission::new("John Doe", Vec::new(), "").unwrap_err(),
        ReadingError::ReadingCount(0)
    );

    let three = vec![Reading::new(95, ReadingType::PreMeal).expect("valid reading"); 3];
    assert_eq!(
        GlucoseSubmission::new("John Doe", three, "").unwrap_err(),
        ReadingError::ReadingCount(3)
    );
}

#[test]
fn confirm_payload_styles() {
    let selection = SlotSelection::new(Slot::with_id("17", "Wed 11:00"), "Jane Roe");
    assert_eq!(
        selection.to_payload(ConfirmStyle::Date),
        json!({ "selected_date": "Wed 11:00", "patient": "Jane Roe" })
    );
    assert_eq!(
        selection.to_payload(ConfirmStyle::Slot),
        json!({
            "selected_slot": "Wed 11:00",
            "slot_id": "17",
            "patient_name": "Jane Roe",
            "status": "confirmed"
        })
    );

    let without_id = SlotSelection::new(Slot::labelled("Mon 09:00"), "Jane Roe");
    let body = without_id.to_payload(ConfirmStyle::Slot);
    assert!(body.get("slot_id").is_none());
}
