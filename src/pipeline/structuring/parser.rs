use serde_json::{Map, Value};

use super::types::{DoctorInfo, Frequency, MedicineEntry, PatientInfo, PrescriptionRecord};

/// Name used when the model does not supply one.
pub const UNKNOWN_MEDICINE: &str = "Unknown Medicine";

/// Confidence used when the model omits it or gives a non-number.
pub const DEFAULT_CONFIDENCE: u8 = 70;

/// Outcome of parsing a model reply that should be a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    /// A JSON object, ready for field-level repair.
    Object(Map<String, Value>),
    /// Valid JSON of another kind (array, string, number...).
    NotAnObject(&'static str),
    /// Not JSON at all.
    Unparseable(String),
}

/// Remove Markdown code-fence markers the model sometimes wraps JSON in.
pub fn strip_code_fences(reply: &str) -> String {
    reply
        .trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse a raw model reply into a tagged result.
pub fn parse_model_reply(reply: &str) -> ModelReply {
    let cleaned = strip_code_fences(reply);
    match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Object(map)) => ModelReply::Object(map),
        Ok(other) => ModelReply::NotAnObject(json_kind(&other)),
        Err(e) => ModelReply::Unparseable(e.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Lenient text view of a JSON scalar. Strings pass through unchanged;
/// numbers and booleans are rendered; null and containers are absent.
pub fn value_to_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Build a complete prescription from a parsed reply object.
///
/// Pure and total: every required field gets a default, so the result
/// always satisfies the record's invariants.
pub fn repair_prescription(reply: &Map<String, Value>) -> PrescriptionRecord {
    let medicines = reply
        .get("medicines")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_object).map(repair_medicine).collect())
        .unwrap_or_default();

    let patient = reply.get("patientInfo").and_then(Value::as_object);
    let doctor = reply.get("doctorInfo").and_then(Value::as_object);

    PrescriptionRecord {
        medicines,
        patient_info: PatientInfo {
            name: patient.and_then(|p| value_to_text(p.get("name"))),
            age: patient.and_then(|p| value_to_text(p.get("age"))),
            gender: patient.and_then(|p| value_to_text(p.get("gender"))),
        },
        doctor_info: DoctorInfo {
            name: doctor.and_then(|d| value_to_text(d.get("name"))),
            specialization: doctor.and_then(|d| value_to_text(d.get("specialization"))),
        },
        diagnosis: value_to_text(reply.get("diagnosis")),
        date: value_to_text(reply.get("date")),
    }
}

fn repair_medicine(item: &Map<String, Value>) -> MedicineEntry {
    let name = value_to_text(item.get("name"))
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_MEDICINE.to_string());

    MedicineEntry {
        name,
        confidence: repair_confidence(item.get("confidence")).unwrap_or(DEFAULT_CONFIDENCE),
        dosage: value_to_text(item.get("dosage")),
        frequency: repair_frequency(item.get("frequency")),
        duration: value_to_text(item.get("duration")),
        special_instructions: value_to_text(item.get("specialInstructions")),
    }
}

/// Integers pass through, fractions round, out-of-range values clamp to
/// 0-100. `None` when missing or non-numeric.
fn repair_confidence(value: Option<&Value>) -> Option<u8> {
    let raw = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok()?,
        _ => return None,
    };
    if raw.is_nan() {
        return None;
    }
    Some(raw.round().clamp(0.0, 100.0) as u8)
}

/// Missing slots default to `false`.
fn repair_frequency(value: Option<&Value>) -> Frequency {
    let Some(slots) = value.and_then(Value::as_object) else {
        return Frequency::default();
    };
    let slot = |key: &str| match slots.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => {
            matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes")
        }
        _ => false,
    };
    Frequency {
        morning: slot("morning"),
        afternoon: slot("afternoon"),
        evening: slot("evening"),
        night: slot("night"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn strips_json_code_fences() {
        let reply = "```json\n{\"medicines\": []}\n```";
        assert_eq!(strip_code_fences(reply), "{\"medicines\": []}");
    }

    #[test]
    fn parse_object_reply() {
        match parse_model_reply("  {\"medicines\": []}  ") {
            ModelReply::Object(map) => assert!(map.contains_key("medicines")),
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn parse_array_reply_is_not_an_object() {
        assert_eq!(parse_model_reply("[1, 2]"), ModelReply::NotAnObject("array"));
    }

    #[test]
    fn parse_prose_reply_is_unparseable() {
        assert!(matches!(
            parse_model_reply("Sorry, I cannot read this prescription."),
            ModelReply::Unparseable(_)
        ));
    }

    #[test]
    fn missing_frequency_defaults_to_all_false() {
        let record = repair_prescription(&object(json!({
            "medicines": [{"name": "Dolo 650", "dosage": "650mg"}]
        })));
        let med = &record.medicines[0];
        assert_eq!(med.frequency, Frequency::default());

        let rendered = serde_json::to_value(med).unwrap();
        assert_eq!(
            rendered["frequency"],
            json!({"morning": false, "afternoon": false, "evening": false, "night": false})
        );
    }

    #[test]
    fn partial_frequency_is_completed() {
        let record = repair_prescription(&object(json!({
            "medicines": [{"name": "X", "frequency": {"morning": true, "night": "yes"}}]
        })));
        assert_eq!(
            record.medicines[0].frequency,
            Frequency { morning: true, afternoon: false, evening: false, night: true }
        );
    }

    #[test]
    fn missing_or_blank_name_becomes_unknown_medicine() {
        let record = repair_prescription(&object(json!({
            "medicines": [{"dosage": "5ml"}, {"name": "   "}, {"name": null}]
        })));
        assert_eq!(record.medicines.len(), 3);
        assert!(record.medicines.iter().all(|m| m.name == UNKNOWN_MEDICINE));
    }

    #[test]
    fn optional_fields_pass_through() {
        let record = repair_prescription(&object(json!({
            "medicines": [{
                "name": "Amoxicillin",
                "confidence": 92,
                "dosage": "500mg",
                "duration": "7 days",
                "specialInstructions": "After food"
            }],
            "diagnosis": "Throat infection",
            "date": "2024-03-02"
        })));
        let med = &record.medicines[0];
        assert_eq!(med.confidence, 92);
        assert_eq!(med.dosage.as_deref(), Some("500mg"));
        assert_eq!(med.duration.as_deref(), Some("7 days"));
        assert_eq!(med.special_instructions.as_deref(), Some("After food"));
        assert_eq!(record.diagnosis.as_deref(), Some("Throat infection"));
        assert_eq!(record.date.as_deref(), Some("2024-03-02"));
    }

    #[test]
    fn confidence_is_clamped_rounded_or_defaulted() {
        let record = repair_prescription(&object(json!({
            "medicines": [
                {"name": "a", "confidence": 140},
                {"name": "b", "confidence": -5},
                {"name": "c", "confidence": 87.6},
                {"name": "d", "confidence": "75%"},
                {"name": "e", "confidence": "high"},
                {"name": "f"}
            ]
        })));
        let confidences: Vec<u8> = record.medicines.iter().map(|m| m.confidence).collect();
        assert_eq!(
            confidences,
            vec![100, 0, 88, 75, DEFAULT_CONFIDENCE, DEFAULT_CONFIDENCE]
        );
    }

    #[test]
    fn missing_patient_and_doctor_become_empty_objects() {
        let record = repair_prescription(&object(json!({"medicines": []})));
        let rendered = serde_json::to_value(&record).unwrap();
        assert_eq!(rendered["patientInfo"], json!({}));
        assert_eq!(rendered["doctorInfo"], json!({}));
        assert!(rendered.get("diagnosis").is_none());
    }

    #[test]
    fn patient_age_number_is_rendered_as_text() {
        let record = repair_prescription(&object(json!({
            "patientInfo": {"name": "Asha", "age": 42, "gender": null},
            "doctorInfo": {"name": "Dr. Rao", "specialization": "ENT"}
        })));
        assert_eq!(record.patient_info.age.as_deref(), Some("42"));
        assert!(record.patient_info.gender.is_none());
        assert_eq!(record.doctor_info.specialization.as_deref(), Some("ENT"));
        assert!(record.medicines.is_empty());
    }

    #[test]
    fn non_object_medicine_items_are_skipped() {
        let record = repair_prescription(&object(json!({
            "medicines": ["Dolo", {"name": "Pan 40"}]
        })));
        assert_eq!(record.medicines.len(), 1);
        assert_eq!(record.medicines[0].name, "Pan 40");
    }
}
