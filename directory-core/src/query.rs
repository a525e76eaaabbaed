//! Đồng bộ trạng thái bộ lọc với query string của URL.
//!
//! Khóa: `search`, `consultation`, `specialties` (nối bằng dấu phẩy), `sort`.
//! Bộ lọc trống thì bỏ hẳn khóa, không bao giờ ghi giá trị rỗng.

use std::borrow::Cow;

use url::form_urlencoded;

use crate::FilterState;

const KEY_SEARCH: &str = "search";
const KEY_CONSULTATION: &str = "consultation";
const KEY_SPECIALTIES: &str = "specialties";
const KEY_SORT: &str = "sort";

const SPECIALTY_SEPARATOR: char = ',';

impl FilterState {
    /// Đọc trạng thái từ query string, chấp nhận có hoặc không có `?` ở đầu.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut state = FilterState::default();
        let mut seen = [false; 4];

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                KEY_SEARCH => 0,
                KEY_CONSULTATION => 1,
                KEY_SPECIALTIES => 2,
                KEY_SORT => 3,
                _ => continue,
            };
            // Giống URLSearchParams.get: lần xuất hiện đầu tiên thắng.
            if std::mem::replace(&mut seen[slot], true) {
                continue;
            }

            match slot {
                0 => state.search = value.into_owned(),
                1 => state.consultation = parse_option(KEY_CONSULTATION, &value),
                2 => state.specialties = split_specialties(&value),
                _ => state.sort = parse_option(KEY_SORT, &value),
            }
        }

        state
    }

    /// Ghi trạng thái thành query string (không có `?`); trạng thái trống cho chuỗi rỗng.
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());

        if !self.search.is_empty() {
            serializer.append_pair(KEY_SEARCH, &self.search);
        }
        if let Some(kind) = self.consultation {
            serializer.append_pair(KEY_CONSULTATION, kind.as_str());
        }
        let specialties = join_specialties(&self.specialties);
        if !specialties.is_empty() {
            serializer.append_pair(KEY_SPECIALTIES, &specialties);
        }
        if let Some(key) = self.sort {
            serializer.append_pair(KEY_SORT, key.as_str());
        }

        serializer.finish()
    }
}

fn parse_option<T>(key: &'static str, value: &Cow<'_, str>) -> Option<T>
where
    T: std::str::FromStr,
{
    if value.is_empty() {
        return None;
    }
    let parsed = value.parse().ok();
    if parsed.is_none() {
        tracing::debug!(key, value = %value, "dropping unknown query value");
    }
    parsed
}

fn split_specialties(value: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in value.split(SPECIALTY_SEPARATOR) {
        if !part.is_empty() && !out.iter().any(|existing| existing == part) {
            out.push(part.to_string());
        }
    }
    out
}

fn join_specialties(specialties: &[String]) -> String {
    specialties
        .iter()
        .filter(|s| !s.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConsultationType, SortKey};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_state_serializes_to_no_keys() {
        assert_eq!(FilterState::default().to_query(), "");
        assert_eq!(FilterState::from_query(""), FilterState::default());
        assert_eq!(FilterState::from_query("?"), FilterState::default());
    }

    #[test]
    fn reads_all_keys() {
        let state = FilterState::from_query(
            "?search=dr+a%26b&consultation=video&specialties=Dentist,General%20Physician&sort=fees",
        );
        assert_eq!(
            state,
            FilterState {
                search: "dr a&b".to_string(),
                consultation: Some(ConsultationType::Video),
                specialties: vec!["Dentist".to_string(), "General Physician".to_string()],
                sort: Some(SortKey::Fees),
            }
        );
    }

    #[test]
    fn writes_keys_in_fixed_order_and_omits_empty_ones() {
        let state = FilterState {
            search: String::new(),
            consultation: Some(ConsultationType::Clinic),
            specialties: vec!["Dentist".to_string(), "ENT".to_string()],
            sort: Some(SortKey::Experience),
        };
        assert_eq!(
            state.to_query(),
            "consultation=clinic&specialties=Dentist%2CENT&sort=experience"
        );
    }

    #[test]
    fn unknown_and_empty_values_mean_no_filter() {
        let state = FilterState::from_query("consultation=phone&sort=&specialties=,,&search=");
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn first_duplicate_key_wins_and_specialties_are_deduplicated() {
        let state = FilterState::from_query("sort=experience&sort=fees&specialties=ENT,ENT,Dentist");
        assert_eq!(state.sort, Some(SortKey::Experience));
        assert_eq!(state.specialties, vec!["ENT", "Dentist"]);
    }

    #[test]
    fn round_trips_a_full_state() {
        let state = FilterState {
            search: "  Dr. Ünal ?=&".to_string(),
            consultation: Some(ConsultationType::Video),
            specialties: vec!["Dietitian/Nutritionist".to_string(), "Dentist".to_string()],
            sort: Some(SortKey::Fees),
        };
        assert_eq!(FilterState::from_query(&state.to_query()), state);
    }
}
