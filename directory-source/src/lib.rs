//! Upstream doctor JSON to `DoctorRecord` conversion and fetching.

use directory_core::{enhance, ChoiceSource, DirectoryError, DoctorRecord};
use serde_json::Value;

mod fetch;
mod mapper;

pub use fetch::DoctorClient;
pub use mapper::{map_doctor, map_doctors_value, parse_experience, parse_fees};

/// Load the doctor list from a JSON string: map every entry, then fill in
/// missing consultation types.
pub fn load_doctors_str(
    payload: &str,
    choices: &mut dyn ChoiceSource,
) -> Result<Vec<DoctorRecord>, DirectoryError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|err| DirectoryError::Parse(err.to_string()))?;
    load_doctors_value(&value, choices)
}

/// Load the doctor list from a `serde_json::Value`.
pub fn load_doctors_value(
    payload: &Value,
    choices: &mut dyn ChoiceSource,
) -> Result<Vec<DoctorRecord>, DirectoryError> {
    let records = map_doctors_value(payload, choices)?;
    Ok(enhance(records, choices))
}
