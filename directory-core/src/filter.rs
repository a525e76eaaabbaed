//! Lọc và sắp xếp danh sách bác sĩ.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use crate::{ConsultationType, DoctorRecord, SortKey};

/// Tính danh sách hiển thị từ danh sách gốc và các lựa chọn hiện tại.
///
/// Các nhóm bộ lọc kết hợp theo AND; trong nhóm chuyên khoa là OR.
/// Sắp xếp luôn ổn định, danh sách gốc không bị thay đổi.
pub fn apply<'a>(
    records: &'a [DoctorRecord],
    search_term: &str,
    consultation: Option<ConsultationType>,
    selected_specialties: &[String],
    sort: Option<SortKey>,
) -> Vec<&'a DoctorRecord> {
    let needle = search_term.to_lowercase();

    let mut matched: Vec<&DoctorRecord> = records
        .iter()
        .filter(|record| needle.is_empty() || record.name_contains_lowercase(&needle))
        .filter(|record| consultation.map_or(true, |kind| record.offers(kind)))
        .filter(|record| matches_specialties(record, selected_specialties))
        .collect();

    match sort {
        Some(SortKey::Fees) => matched.sort_by_key(|record| record.fees),
        Some(SortKey::Experience) => matched.sort_by_key(|record| Reverse(record.experience_years)),
        None => {}
    }

    matched
}

fn matches_specialties(record: &DoctorRecord, selected: &[String]) -> bool {
    selected.is_empty()
        || record
            .specialties
            .iter()
            .any(|specialty| selected.contains(specialty))
}

/// Tập chuyên khoa duy nhất, đã sắp xếp, dùng cho bảng lọc.
pub fn all_specialties(records: &[DoctorRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|record| record.specialties.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
