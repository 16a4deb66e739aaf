// Data model: the request structures sent to the workflow webhooks.
// Field names on the wire follow what the webhooks expect, so serde
// renames are used instead of changing the Rust names.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Lowest glucose value the form accepts, in mg/dL.
pub const MIN_GLUCOSE: u16 = 20;
/// Highest glucose value the form accepts, in mg/dL.
pub const MAX_GLUCOSE: u16 = 500;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadingError {
    #[error("glucose value {0} mg/dL is outside 20-500")]
    OutOfRange(u16),
    #[error("a submission needs one or two readings, got {0}")]
    ReadingCount(usize),
}

/// A glucose value in mg/dL, guaranteed to be within the accepted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GlucoseLevel(u16);

impl GlucoseLevel {
    pub fn new(value: u16) -> Result<Self, ReadingError> {
        if (MIN_GLUCOSE..=MAX_GLUCOSE).contains(&value) {
            Ok(GlucoseLevel(value))
        } else {
            Err(ReadingError::OutOfRange(value))
        }
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReadingType {
    #[serde(rename = "Pre-Meal")]
    PreMeal,
    #[serde(rename = "Post-Meal")]
    PostMeal,
}

impl ReadingType {
    pub fn label(self) -> &'static str {
        match self {
            ReadingType::PreMeal => "Pre-Meal",
            ReadingType::PostMeal => "Post-Meal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reading {
    #[serde(rename = "Glucose_Level")]
    pub level: GlucoseLevel,
    #[serde(rename = "Reading_Type")]
    pub kind: ReadingType,
}

impl Reading {
    pub fn new(value: u16, kind: ReadingType) -> Result<Self, ReadingError> {
        Ok(Reading {
            level: GlucoseLevel::new(value)?,
            kind,
        })
    }
}

/// Body POSTed to the analysis webhook.
#[derive(Debug, Clone, Serialize)]
pub struct GlucoseSubmission {
    #[serde(rename = "Date", serialize_with = "serialize_iso_date")]
    pub date: NaiveDate,
    #[serde(rename = "Patient_Name")]
    pub patient_name: String,
    #[serde(rename = "Readings")]
    pub readings: Vec<Reading>,
    #[serde(rename = "Notes")]
    pub notes: String,
}

impl GlucoseSubmission {
    /// Build a submission dated today (local clock).
    pub fn new(
        patient_name: &str,
        readings: Vec<Reading>,
        notes: &str,
    ) -> Result<Self, ReadingError> {
        Self::dated(Local::now().date_naive(), patient_name, readings, notes)
    }

    pub fn dated(
        date: NaiveDate,
        patient_name: &str,
        readings: Vec<Reading>,
        notes: &str,
    ) -> Result<Self, ReadingError> {
        if readings.is_empty() || readings.len() > 2 {
            return Err(ReadingError::ReadingCount(readings.len()));
        }
        Ok(GlucoseSubmission {
            date,
            patient_name: patient_name.trim().to_string(),
            readings,
            notes: notes.to_string(),
        })
    }

    /// The usual form submit: one pre-meal and one post-meal reading.
    pub fn pre_and_post_meal(
        patient_name: &str,
        pre_meal: u16,
        post_meal: u16,
        notes: &str,
    ) -> Result<Self, ReadingError> {
        let readings = vec![
            Reading::new(pre_meal, ReadingType::PreMeal)?,
            Reading::new(post_meal, ReadingType::PostMeal)?,
        ];
        Self::new(patient_name, readings, notes)
    }
}

fn serialize_iso_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&date.format("%Y-%m-%d"))
}

/// A bookable appointment time as offered by the availability webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub id: Option<String>,
    pub label: String,
}

impl Slot {
    pub fn labelled(label: &str) -> Self {
        Slot {
            id: None,
            label: label.to_string(),
        }
    }

    pub fn with_id(id: &str, label: &str) -> Self {
        Slot {
            id: Some(id.to_string()),
            label: label.to_string(),
        }
    }
}

/// Shape of the body POSTed to the confirm webhook. Deployed workflows
/// accept one or the other, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmStyle {
    /// `{"selected_date", "patient"}`
    #[default]
    Date,
    /// `{"selected_slot", "slot_id", "patient_name", "status"}`
    Slot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSelection {
    pub slot: Slot,
    pub patient_name: String,
}

impl SlotSelection {
    pub fn new(slot: Slot, patient_name: &str) -> Self {
        SlotSelection {
            slot,
            patient_name: patient_name.trim().to_string(),
        }
    }

    pub fn to_payload(&self, style: ConfirmStyle) -> Value {
        match style {
            ConfirmStyle::Date => json!({
                "selected_date": self.slot.label,
                "patient": self.patient_name,
            }),
            ConfirmStyle::Slot => {
                let mut body = json!({
                    "selected_slot": self.slot.label,
                    "patient_name": self.patient_name,
                    "status": "confirmed",
                });
                if let (Some(id), Some(map)) = (&self.slot.id, body.as_object_mut()) {
                    map.insert("slot_id".into(), Value::String(id.clone()));
                }
                body
            }
        }
    }
}
