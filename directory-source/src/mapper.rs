use std::collections::BTreeSet;

use directory_core::{
    ChoiceSource, ConsultationType, DirectoryError, DoctorRecord, PLACEHOLDER_AVAILABILITY,
    PLACEHOLDER_RATING,
};
use serde_json::Value;

const REVIEW_COUNT_BASE: u32 = 10;
const REVIEW_COUNT_SPAN: usize = 100;

/// Map an upstream JSON array into doctor records.
///
/// Only the top-level shape can fail. Entries without a usable `name` are
/// skipped, every other field falls back to its default.
pub fn map_doctors_value(
    payload: &Value,
    choices: &mut dyn ChoiceSource,
) -> Result<Vec<DoctorRecord>, DirectoryError> {
    let entries = payload.as_array().ok_or_else(|| {
        DirectoryError::Parse(format!(
            "Expected a JSON array of doctors, received {}",
            json_kind(payload)
        ))
    })?;

    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match map_doctor(entry, choices) {
            Some(record) => records.push(record),
            None => tracing::debug!(index, "skipping doctor entry without a name"),
        }
    }

    Ok(records)
}

/// Map a single upstream object. Returns `None` when it has no name.
pub fn map_doctor(entry: &Value, choices: &mut dyn ChoiceSource) -> Option<DoctorRecord> {
    let name = entry
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())?
        .to_string();

    let address = entry.pointer("/clinic/address");

    Some(DoctorRecord {
        name,
        specialties: extract_specialties(entry),
        city: text_at(address, "city")
            .or_else(|| text_at(Some(entry), "city"))
            .unwrap_or_default(),
        address: text_at(address, "address_line1")
            .or_else(|| text_at(Some(entry), "address"))
            .unwrap_or_default(),
        experience_years: entry.get("experience").map_or(0, parse_experience),
        fees: entry.get("fees").map_or(0, parse_fees),
        rating: PLACEHOLDER_RATING,
        review_count: REVIEW_COUNT_BASE + choices.pick(REVIEW_COUNT_SPAN) as u32,
        availability: PLACEHOLDER_AVAILABILITY.to_string(),
        image_url: text_at(Some(entry), "photo").or_else(|| text_at(Some(entry), "image")),
        consultation_types: extract_consultation_types(entry),
    })
}

/// Years of experience from free text such as `"13 Years of experience"`.
/// Takes the first run of digits; anything unparseable is 0.
pub fn parse_experience(value: &Value) -> u32 {
    match value {
        Value::Number(number) => number_to_u32(number),
        Value::String(text) => first_digit_run(text)
            .and_then(|digits| digits.parse().ok())
            .unwrap_or(0),
        _ => 0,
    }
}

/// Fee from free text such as `"₹ 1,200"`: every non-digit is dropped.
pub fn parse_fees(value: &Value) -> u32 {
    match value {
        Value::Number(number) => number_to_u32(number),
        Value::String(text) => {
            let digits: String = text.chars().filter(char::is_ascii_digit).collect();
            digits.parse().unwrap_or(0)
        }
        _ => 0,
    }
}

fn number_to_u32(number: &serde_json::Number) -> u32 {
    if let Some(n) = number.as_u64() {
        return u32::try_from(n).unwrap_or(0);
    }
    match number.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 && f <= f64::from(u32::MAX) => f as u32,
        _ => 0,
    }
}

fn first_digit_run(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

fn extract_specialties(entry: &Value) -> Vec<String> {
    // Upstream uses `specialities: [{name}]`; already-flattened payloads use `specialty: [String]`.
    if let Some(list) = entry.get("specialities").and_then(Value::as_array) {
        return list
            .iter()
            .filter_map(|item| item.get("name").and_then(Value::as_str))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
    }

    entry
        .get("specialty")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn extract_consultation_types(entry: &Value) -> Option<BTreeSet<ConsultationType>> {
    if let Some(tags) = entry.get("consultationType").and_then(Value::as_array) {
        let types: BTreeSet<ConsultationType> = tags
            .iter()
            .filter_map(Value::as_str)
            .filter_map(|tag| tag.parse().ok())
            .collect();
        return (!types.is_empty()).then_some(types);
    }

    let mut types = BTreeSet::new();
    if entry.get("video_consult").and_then(Value::as_bool) == Some(true) {
        types.insert(ConsultationType::Video);
    }
    if entry.get("in_clinic").and_then(Value::as_bool) == Some(true) {
        types.insert(ConsultationType::Clinic);
    }
    (!types.is_empty()).then_some(types)
}

fn text_at(value: Option<&Value>, key: &str) -> Option<String> {
    value?
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
