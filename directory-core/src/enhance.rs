//! Bổ sung hình thức khám còn thiếu cho dữ liệu nguồn.

use std::collections::BTreeSet;

use rand::rngs::ThreadRng;
use rand::Rng;

use crate::{ConsultationType, DoctorRecord};

/// Nguồn lựa chọn ngẫu nhiên có thể thay thế khi kiểm thử.
pub trait ChoiceSource {
    /// Trả về một chỉ số trong `[0, upper)`. `upper` luôn lớn hơn 0.
    fn pick(&mut self, upper: usize) -> usize;
}

/// Bọc một bộ sinh `rand`.
#[derive(Debug, Clone)]
pub struct RngChoice<R>(pub R);

impl RngChoice<ThreadRng> {
    pub fn thread() -> Self {
        Self(rand::thread_rng())
    }
}

impl<R: Rng> ChoiceSource for RngChoice<R> {
    fn pick(&mut self, upper: usize) -> usize {
        self.0.gen_range(0..upper.max(1))
    }
}

/// Lặp lại một chuỗi chỉ số cố định, dùng cho kết quả tất định.
#[derive(Debug, Clone)]
pub struct ScriptedChoice {
    script: Vec<usize>,
    cursor: usize,
}

impl ScriptedChoice {
    pub fn new(script: impl Into<Vec<usize>>) -> Self {
        Self {
            script: script.into(),
            cursor: 0,
        }
    }
}

impl ChoiceSource for ScriptedChoice {
    fn pick(&mut self, upper: usize) -> usize {
        if self.script.is_empty() {
            return 0;
        }
        let value = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        value.min(upper.saturating_sub(1))
    }
}

/// Ba kết quả cố định, chọn đều nhau khi bản ghi thiếu hình thức khám.
fn fallback_outcome(index: usize) -> BTreeSet<ConsultationType> {
    match index {
        0 => BTreeSet::from([ConsultationType::Video]),
        1 => BTreeSet::from([ConsultationType::Clinic]),
        _ => BTreeSet::from(ConsultationType::ALL),
    }
}

/// Gán hình thức khám cho các bản ghi chưa có; bản ghi đã có giữ nguyên.
pub fn enhance(records: Vec<DoctorRecord>, choices: &mut dyn ChoiceSource) -> Vec<DoctorRecord> {
    let mut assigned = 0usize;
    let enhanced: Vec<DoctorRecord> = records
        .into_iter()
        .map(|mut record| {
            if record.consultation_types.is_none() {
                record.consultation_types = Some(fallback_outcome(choices.pick(3)));
                assigned += 1;
            }
            record
        })
        .collect();

    tracing::debug!(
        total = enhanced.len(),
        assigned,
        "filled missing consultation types"
    );
    enhanced
}
