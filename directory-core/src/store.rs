//! Giữ danh sách bác sĩ đã tải cùng vòng đời tải dữ liệu.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{DirectoryConfig, DirectoryError, DoctorRecord, FilterState};

/// Trạng thái của lần tải gần nhất.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Thẻ định danh một lần tải; chỉ thẻ mới nhất được chấp nhận.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Kết quả hiển thị tương ứng với trạng thái hiện tại.
#[derive(Debug, PartialEq)]
pub enum DirectoryView<'a> {
    Loading,
    Empty,
    Populated(Vec<&'a DoctorRecord>),
}

#[derive(Debug, Clone)]
pub struct DirectoryStore {
    records: Vec<DoctorRecord>,
    fetched_at: Option<DateTime<Utc>>,
    status: LoadStatus,
    generation: u64,
    staleness: Duration,
}

impl DirectoryStore {
    pub fn new(staleness: Duration) -> Self {
        Self {
            records: Vec::new(),
            fetched_at: None,
            status: LoadStatus::Idle,
            generation: 0,
            staleness,
        }
    }

    pub fn from_config(config: &DirectoryConfig) -> Self {
        Self::new(config.staleness())
    }

    pub fn records(&self) -> &[DoctorRecord] {
        &self.records
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    /// Cần tải lại khi chưa tải lần nào hoặc dữ liệu đã quá cửa sổ staleness.
    /// Không tự thử lại sau lỗi; xem [`DirectoryStore::retry`].
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            LoadStatus::Idle => true,
            LoadStatus::Ready => self
                .fetched_at
                .map_or(true, |at| now.signed_duration_since(at) > self.staleness),
            LoadStatus::Loading | LoadStatus::Failed(_) => false,
        }
    }

    /// Bắt đầu một lần tải mới; mọi thẻ cũ hơn sẽ bị bỏ qua.
    pub fn begin_fetch(&mut self) -> RequestToken {
        self.generation += 1;
        self.status = LoadStatus::Loading;
        RequestToken(self.generation)
    }

    /// Ghi nhận kết quả tải. Trả về `false` nếu kết quả đã lỗi thời và bị bỏ qua.
    pub fn complete(
        &mut self,
        token: RequestToken,
        outcome: Result<Vec<DoctorRecord>, DirectoryError>,
        now: DateTime<Utc>,
    ) -> bool {
        if token.0 != self.generation {
            tracing::debug!(
                token = token.0,
                latest = self.generation,
                "discarding stale fetch result"
            );
            return false;
        }

        match outcome {
            Ok(records) => {
                tracing::info!(count = records.len(), "doctor list loaded");
                self.records = records;
                self.fetched_at = Some(now);
                self.status = LoadStatus::Ready;
            }
            Err(err) => {
                tracing::warn!(error = %err, "doctor list fetch failed");
                self.status = LoadStatus::Failed(err.to_string());
            }
        }
        true
    }

    /// Cho phép tải lại sau khi lỗi.
    pub fn retry(&mut self) {
        if matches!(self.status, LoadStatus::Failed(_)) {
            self.status = LoadStatus::Idle;
        }
    }

    /// Danh sách hiển thị; chưa có dữ liệu mà chưa tải xong thì coi là đang tải.
    pub fn view(&self, filters: &FilterState) -> DirectoryView<'_> {
        let pending = matches!(self.status, LoadStatus::Idle | LoadStatus::Loading);
        if pending && self.records.is_empty() {
            return DirectoryView::Loading;
        }

        let matched = filters.apply(&self.records);
        if matched.is_empty() {
            DirectoryView::Empty
        } else {
            DirectoryView::Populated(matched)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 9, minute, 0).unwrap()
    }

    fn doctor(name: &str) -> DoctorRecord {
        DoctorRecord {
            name: name.to_string(),
            ..DoctorRecord::default()
        }
    }

    #[test]
    fn fresh_store_needs_refresh_then_waits_for_staleness() {
        let mut store = DirectoryStore::new(Duration::minutes(5));
        assert!(store.needs_refresh(at(0)));

        let token = store.begin_fetch();
        assert!(!store.needs_refresh(at(0)));
        assert_eq!(store.view(&FilterState::default()), DirectoryView::Loading);

        assert!(store.complete(token, Ok(vec![doctor("Dr A")]), at(0)));
        assert_eq!(store.status(), &LoadStatus::Ready);
        assert!(!store.needs_refresh(at(5)));
        assert!(store.needs_refresh(at(6)));
    }

    #[test]
    fn idle_store_without_records_reports_loading() {
        let store = DirectoryStore::new(Duration::minutes(5));
        assert_eq!(store.status(), &LoadStatus::Idle);
        assert_eq!(store.view(&FilterState::default()), DirectoryView::Loading);
    }

    #[test]
    fn failed_first_load_reports_empty_not_loading() {
        let mut store = DirectoryStore::new(Duration::minutes(5));
        let token = store.begin_fetch();
        store.complete(token, Err(DirectoryError::Fetch("HTTP 500".into())), at(0));
        assert_eq!(store.view(&FilterState::default()), DirectoryView::Empty);
    }

    #[test]
    fn late_response_from_older_request_is_discarded() {
        let mut store = DirectoryStore::new(Duration::minutes(5));
        let first = store.begin_fetch();
        let second = store.begin_fetch();

        assert!(store.complete(second, Ok(vec![doctor("new")]), at(1)));
        assert!(!store.complete(first, Ok(vec![doctor("old")]), at(2)));

        assert_eq!(store.records()[0].name, "new");
        assert_eq!(store.fetched_at(), Some(at(1)));
    }

    #[test]
    fn failure_keeps_last_records_and_does_not_retry() {
        let mut store = DirectoryStore::new(Duration::minutes(5));
        let token = store.begin_fetch();
        store.complete(token, Ok(vec![doctor("Dr A")]), at(0));

        let token = store.begin_fetch();
        // Dữ liệu cũ vẫn hiển thị trong lúc tải lại.
        assert!(matches!(
            store.view(&FilterState::default()),
            DirectoryView::Populated(_)
        ));
        store.complete(token, Err(DirectoryError::Fetch("HTTP 503".into())), at(10));

        assert!(matches!(store.status(), LoadStatus::Failed(msg) if msg.contains("HTTP 503")));
        assert_eq!(store.records().len(), 1);
        assert!(!store.needs_refresh(at(30)));

        store.retry();
        assert!(store.needs_refresh(at(30)));
    }

    #[test]
    fn view_distinguishes_empty_from_populated() {
        let mut store = DirectoryStore::new(Duration::minutes(5));
        let token = store.begin_fetch();
        store.complete(token, Ok(vec![doctor("Dr A"), doctor("Dr B")]), at(0));

        let mut filters = FilterState::default();
        filters.set_search("zzz");
        assert_eq!(store.view(&filters), DirectoryView::Empty);

        filters.set_search("dr b");
        match store.view(&filters) {
            DirectoryView::Populated(records) => assert_eq!(records[0].name, "Dr B"),
            other => panic!("unexpected view: {other:?}"),
        }
    }
}
