//! Bridge WASM <-> JavaScript trung lập framework.

use directory_core::{
    all_specialties, suggest, DirectoryError, DoctorRecord, FilterState, RngChoice,
};
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

/// Bộ lọc dạng chuỗi như JS gửi sang; giá trị rỗng nghĩa là không lọc.
#[derive(Deserialize, Default)]
struct JsFilterState {
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    consultation: Option<String>,
    #[serde(default)]
    specialties: Option<Vec<String>>,
    #[serde(default)]
    sort: Option<String>,
}

impl TryFrom<JsFilterState> for FilterState {
    type Error = DirectoryError;

    fn try_from(js: JsFilterState) -> Result<Self, Self::Error> {
        let mut state = FilterState::default();
        state.set_search(js.search.unwrap_or_default());
        state.consultation = non_empty(js.consultation)
            .map(|value| value.parse())
            .transpose()?;
        for specialty in js.specialties.unwrap_or_default() {
            if !state.specialties.contains(&specialty) {
                state.toggle_specialty(&specialty);
            }
        }
        state.sort = non_empty(js.sort).map(|value| value.parse()).transpose()?;
        Ok(state)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Chuẩn hóa mảng JSON thô thành danh sách bác sĩ đầy đủ.
#[wasm_bindgen]
pub fn load_doctors(raw_doctors: JsValue) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let payload = from_value::<serde_json::Value>(raw_doctors)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được JSON bác sĩ: {err}")))?;

    let records = directory_source::load_doctors_value(&payload, &mut RngChoice::thread())
        .map_err(|err| JsValue::from_str(&format_directory_error(err)))?;

    to_js(&records)
}

#[wasm_bindgen]
pub fn filter_doctors(records: JsValue, filters: JsValue) -> Result<JsValue, JsValue> {
    let records = read_records(records)?;
    let state = read_filters(filters)?;
    to_js(&state.apply(&records))
}

#[wasm_bindgen]
pub fn search_suggestions(records: JsValue, term: &str) -> Result<JsValue, JsValue> {
    let records = read_records(records)?;
    to_js(&suggest(&records, term))
}

#[wasm_bindgen]
pub fn list_specialties(records: JsValue) -> Result<JsValue, JsValue> {
    let records = read_records(records)?;
    to_js(&all_specialties(&records))
}

/// Đọc bộ lọc từ `location.search`.
#[wasm_bindgen]
pub fn parse_query(query: &str) -> Result<JsValue, JsValue> {
    to_js(&FilterState::from_query(query))
}

/// Ghi bộ lọc thành query string, không kèm `?`.
#[wasm_bindgen]
pub fn to_query(filters: JsValue) -> Result<String, JsValue> {
    Ok(read_filters(filters)?.to_query())
}

fn read_records(records: JsValue) -> Result<Vec<DoctorRecord>, JsValue> {
    from_value(records)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được danh sách bác sĩ: {err}")))
}

fn read_filters(filters: JsValue) -> Result<FilterState, JsValue> {
    let js: JsFilterState = if filters.is_undefined() || filters.is_null() {
        JsFilterState::default()
    } else {
        from_value(filters)
            .map_err(|err| JsValue::from_str(&format!("Không đọc được bộ lọc: {err}")))?
    };
    FilterState::try_from(js).map_err(|err| JsValue::from_str(&format_directory_error(err)))
}

fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|err| JsValue::from_str(&format!("Không serialize kết quả: {err}")))
}

fn format_directory_error(err: DirectoryError) -> String {
    format!("Directory error: {err}")
}
