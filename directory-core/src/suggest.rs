//! Gợi ý tên bác sĩ cho ô tìm kiếm.

use crate::DoctorRecord;

/// Số gợi ý tối đa hiển thị dưới ô tìm kiếm.
pub const MAX_SUGGESTIONS: usize = 3;

/// Tối đa [`MAX_SUGGESTIONS`] bác sĩ có tên chứa `term`, giữ thứ tự gốc.
pub fn suggest<'a>(records: &'a [DoctorRecord], term: &str) -> Vec<&'a DoctorRecord> {
    if term.is_empty() {
        return Vec::new();
    }

    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|record| record.name_contains_lowercase(&needle))
        .take(MAX_SUGGESTIONS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(names: &[&str]) -> Vec<DoctorRecord> {
        names
            .iter()
            .map(|name| DoctorRecord {
                name: name.to_string(),
                ..DoctorRecord::default()
            })
            .collect()
    }

    #[test]
    fn empty_term_gives_no_suggestions() {
        let records = named(&["Dr A", "Dr B"]);
        assert!(suggest(&records, "").is_empty());
    }

    #[test]
    fn caps_at_three_in_original_order() {
        let records = named(&["Dr Ray", "Dr Roy", "Nina", "Dr Rao", "Dr Rai"]);
        let out: Vec<_> = suggest(&records, "dr r").iter().map(|r| r.name.as_str()).collect();
        assert_eq!(out, vec!["Dr Ray", "Dr Roy", "Dr Rao"]);
    }

    #[test]
    fn no_match_is_empty() {
        let records = named(&["Dr Ray"]);
        assert!(suggest(&records, "zz").is_empty());
    }
}
