//! Logic lõi của danh bạ bác sĩ: bộ lọc, sắp xếp, gợi ý và đồng bộ URL.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod enhance;
pub mod filter;
pub mod query;
pub mod store;
pub mod suggest;

pub use enhance::{enhance, ChoiceSource, RngChoice, ScriptedChoice};
pub use filter::{all_specialties, apply};
pub use store::{DirectoryStore, DirectoryView, LoadStatus, RequestToken};
pub use suggest::{suggest, MAX_SUGGESTIONS};

/// Endpoint JSON công khai chứa danh sách bác sĩ.
pub const DEFAULT_ENDPOINT: &str = "https://srijandubey.github.io/campus-api-mock/SRM-C1-25.json";

/// Điểm đánh giá giữ chỗ, dữ liệu nguồn không cung cấp.
pub const PLACEHOLDER_RATING: f32 = 4.5;

/// Trạng thái lịch khám giữ chỗ.
pub const PLACEHOLDER_AVAILABILITY: &str = "Available today";

/// Cấu hình nguồn dữ liệu và thời gian dữ liệu còn "tươi".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectoryConfig {
    /// URL trả về mảng JSON bác sĩ.
    pub endpoint: String,
    /// Số giây trước khi danh sách đã tải bị coi là cũ.
    pub stale_after_secs: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            stale_after_secs: 5 * 60,
        }
    }
}

impl DirectoryConfig {
    /// Cửa sổ staleness dưới dạng `chrono::Duration`.
    pub fn staleness(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.stale_after_secs).unwrap_or(i64::MAX))
    }
}

/// Hình thức khám: trực tuyến hoặc tại phòng khám.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationType {
    Video,
    Clinic,
}

impl ConsultationType {
    pub const ALL: [ConsultationType; 2] = [ConsultationType::Video, ConsultationType::Clinic];

    pub fn as_str(self) -> &'static str {
        match self {
            ConsultationType::Video => "video",
            ConsultationType::Clinic => "clinic",
        }
    }
}

impl fmt::Display for ConsultationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsultationType {
    type Err = DirectoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "video" => Ok(ConsultationType::Video),
            "clinic" => Ok(ConsultationType::Clinic),
            other => Err(DirectoryError::UnknownOption {
                key: "consultation",
                value: other.to_string(),
            }),
        }
    }
}

/// Tiêu chí sắp xếp danh sách kết quả.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Phí khám tăng dần.
    Fees,
    /// Số năm kinh nghiệm giảm dần.
    Experience,
}

impl SortKey {
    pub const ALL: [SortKey; 2] = [SortKey::Fees, SortKey::Experience];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Fees => "fees",
            SortKey::Experience => "experience",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = DirectoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "fees" => Ok(SortKey::Fees),
            "experience" => Ok(SortKey::Experience),
            other => Err(DirectoryError::UnknownOption {
                key: "sort",
                value: other.to_string(),
            }),
        }
    }
}

/// Một bác sĩ sau khi đã chuẩn hóa từ dữ liệu nguồn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoctorRecord {
    pub name: String,
    pub specialties: Vec<String>,
    pub city: String,
    pub address: String,
    pub experience_years: u32,
    pub fees: u32,
    pub rating: f32,
    pub review_count: u32,
    pub availability: String,
    pub image_url: Option<String>,
    /// `None` nghĩa là nguồn không cho biết; bộ enhancer sẽ điền vào.
    pub consultation_types: Option<BTreeSet<ConsultationType>>,
}

impl Default for DoctorRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            specialties: Vec::new(),
            city: String::new(),
            address: String::new(),
            experience_years: 0,
            fees: 0,
            rating: PLACEHOLDER_RATING,
            review_count: 0,
            availability: PLACEHOLDER_AVAILABILITY.to_string(),
            image_url: None,
            consultation_types: None,
        }
    }
}

impl DoctorRecord {
    /// Bác sĩ có nhận hình thức khám `kind` hay không.
    pub fn offers(&self, kind: ConsultationType) -> bool {
        self.consultation_types
            .as_ref()
            .is_some_and(|types| types.contains(&kind))
    }

    /// So khớp tên không phân biệt hoa thường; `needle` phải được hạ chữ thường sẵn.
    pub(crate) fn name_contains_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }
}

/// Trạng thái bộ lọc hiện tại trên giao diện.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterState {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub consultation: Option<ConsultationType>,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub sort: Option<SortKey>,
}

impl FilterState {
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Chọn lại đúng hình thức đang chọn thì bỏ chọn.
    pub fn toggle_consultation(&mut self, kind: ConsultationType) {
        self.consultation = if self.consultation == Some(kind) {
            None
        } else {
            Some(kind)
        };
    }

    pub fn toggle_specialty(&mut self, specialty: &str) {
        if specialty.is_empty() {
            return;
        }
        if let Some(pos) = self.specialties.iter().position(|s| s == specialty) {
            self.specialties.remove(pos);
        } else {
            self.specialties.push(specialty.to_string());
        }
    }

    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort = if self.sort == Some(key) {
            None
        } else {
            Some(key)
        };
    }

    pub fn clear(&mut self) {
        *self = FilterState::default();
    }

    /// Không có bộ lọc hay tiêu chí sắp xếp nào đang bật.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.consultation.is_none()
            && self.specialties.is_empty()
            && self.sort.is_none()
    }

    /// Áp dụng toàn bộ bộ lọc lên danh sách gốc.
    pub fn apply<'a>(&self, records: &'a [DoctorRecord]) -> Vec<&'a DoctorRecord> {
        filter::apply(
            records,
            &self.search,
            self.consultation,
            &self.specialties,
            self.sort,
        )
    }
}

/// Lỗi chung của danh bạ.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DirectoryError {
    #[error("Không tải được danh sách bác sĩ: {0}")]
    Fetch(String),
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
    #[error("Giá trị `{value}` không hợp lệ cho `{key}`")]
    UnknownOption { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_clear_on_second_selection() {
        let mut state = FilterState::default();
        state.toggle_consultation(ConsultationType::Video);
        assert_eq!(state.consultation, Some(ConsultationType::Video));
        state.toggle_consultation(ConsultationType::Clinic);
        assert_eq!(state.consultation, Some(ConsultationType::Clinic));
        state.toggle_consultation(ConsultationType::Clinic);
        assert_eq!(state.consultation, None);

        state.toggle_sort(SortKey::Fees);
        state.toggle_sort(SortKey::Fees);
        assert_eq!(state.sort, None);
    }

    #[test]
    fn specialty_toggle_keeps_insertion_order() {
        let mut state = FilterState::default();
        state.toggle_specialty("Dentist");
        state.toggle_specialty("Cardiologist");
        state.toggle_specialty("");
        assert_eq!(state.specialties, vec!["Dentist", "Cardiologist"]);
        state.toggle_specialty("Dentist");
        assert_eq!(state.specialties, vec!["Cardiologist"]);
    }

    #[test]
    fn clear_resets_every_filter() {
        let mut state = FilterState::default();
        assert!(state.is_empty());

        state.set_search("dr");
        state.toggle_specialty("ENT");
        state.toggle_sort(SortKey::Experience);
        assert!(!state.is_empty());

        state.clear();
        assert!(state.is_empty());
        assert_eq!(state.to_query(), "");
    }

    #[test]
    fn closed_option_sets_reject_unknown_values() {
        assert_eq!("video".parse::<ConsultationType>(), Ok(ConsultationType::Video));
        assert_eq!("experience".parse::<SortKey>(), Ok(SortKey::Experience));
        assert!(matches!(
            "phone".parse::<ConsultationType>(),
            Err(DirectoryError::UnknownOption { key: "consultation", .. })
        ));
        assert!("rating".parse::<SortKey>().is_err());
    }

    #[test]
    fn default_config_uses_five_minute_window() {
        let config = DirectoryConfig::default();
        assert_eq!(config.staleness(), chrono::Duration::minutes(5));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }
}
