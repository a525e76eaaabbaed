use std::collections::BTreeSet;
use std::fs;

use directory_core::{
    apply, ConsultationType, DoctorRecord, ScriptedChoice, PLACEHOLDER_AVAILABILITY,
    PLACEHOLDER_RATING,
};
use directory_source::load_doctors_str;
use pretty_assertions::assert_eq;

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn load_fixture() -> Vec<DoctorRecord> {
    let payload = fs::read_to_string(fixture_path("doctors.json"))
        .expect("Không đọc được dữ liệu mẫu");
    // Ba lần chọn số lượt đánh giá, sau đó một lần chọn hình thức khám cho Dr. Rohan Gupta.
    let mut choices = ScriptedChoice::new([5, 20, 99, 1]);
    load_doctors_str(&payload, &mut choices).expect("Không tải được danh sách")
}

#[test]
fn fixture_maps_to_expected_records() {
    let expected = vec![
        DoctorRecord {
            name: "Dr. Amit Sharma".into(),
            specialties: vec!["Dentist".into()],
            city: "Bangalore".into(),
            address: "12 CMH Road".into(),
            experience_years: 13,
            fees: 500,
            rating: PLACEHOLDER_RATING,
            review_count: 15,
            availability: PLACEHOLDER_AVAILABILITY.into(),
            image_url: Some("https://doctorapi.example/photos/amit.png".into()),
            consultation_types: Some(BTreeSet::from([
                ConsultationType::Video,
                ConsultationType::Clinic,
            ])),
        },
        DoctorRecord {
            name: "Dr. Priya Nair".into(),
            specialties: vec!["General Physician".into(), "Dietitian/Nutritionist".into()],
            city: "Kochi".into(),
            address: String::new(),
            experience_years: 7,
            fees: 300,
            rating: PLACEHOLDER_RATING,
            review_count: 30,
            availability: PLACEHOLDER_AVAILABILITY.into(),
            image_url: None,
            consultation_types: Some(BTreeSet::from([ConsultationType::Video])),
        },
        DoctorRecord {
            name: "Dr. Rohan Gupta".into(),
            specialties: Vec::new(),
            city: String::new(),
            address: String::new(),
            experience_years: 0,
            fees: 0,
            rating: PLACEHOLDER_RATING,
            review_count: 109,
            availability: PLACEHOLDER_AVAILABILITY.into(),
            image_url: None,
            consultation_types: Some(BTreeSet::from([ConsultationType::Clinic])),
        },
    ];

    assert_eq!(load_fixture(), expected);
}

#[test]
fn doctor_without_specialities_never_matches_specialty_filter() {
    let records = load_fixture();
    let selected = vec!["Dentist".to_string(), "General Physician".to_string()];

    let names: Vec<_> = apply(&records, "", None, &selected, None)
        .into_iter()
        .map(|r| r.name.as_str())
        .collect();

    assert_eq!(names, vec!["Dr. Amit Sharma", "Dr. Priya Nair"]);
}

#[test]
fn rejects_payload_that_is_not_json() {
    let err = load_doctors_str("<html>", &mut ScriptedChoice::new([0])).unwrap_err();
    assert!(err.to_string().starts_with("Không đọc được dữ liệu"));
}
