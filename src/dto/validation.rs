//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::dto::DATE_FORMAT;

/// Validates that an event date is a real calendar date in `YYYY-MM-DD` form.
///
/// # Examples
///
/// ```ignore
/// validate_event_date("2024-06-01") // Ok
/// validate_event_date("2024-6-1")   // Err - not zero-padded
/// validate_event_date("2024-02-30") // Err - no such day
/// ```
pub fn validate_event_date(raw: &str) -> Result<(), ValidationError> {
    if time::Date::parse(raw, &DATE_FORMAT).is_err() {
        let mut err = ValidationError::new("event_date");
        err.message = Some(format!("`{raw}` is not a valid YYYY-MM-DD date").into());
        return Err(err);
    }

    Ok(())
}
