//! Parsing of raw date and hour inputs.

use chrono::NaiveDate;
use validator::ValidationErrors;

use courtbook_core::error::AppError;
use courtbook_core::result::AppResult;
use courtbook_core::types::HourLabel;

/// Wire format of calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        AppError::validation(format!("Invalid date '{raw}': expected YYYY-MM-DD"))
    })
}

/// Parse an `HH:00` hour label.
pub fn parse_hour(raw: &str) -> AppResult<HourLabel> {
    HourLabel::parse(raw.trim())
}

/// Map derive-validator failures onto a validation error.
pub(crate) fn invalid(errors: ValidationErrors) -> AppError {
    let field_errors = errors.field_errors();
    let fields: Vec<&str> = field_errors.keys().map(|k| k.as_ref()).collect();
    AppError::validation(format!("Invalid input: {errors}"))
        .with_details(serde_json::json!({ "fields": fields }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtbook_core::ErrorKind;
    use validator::Validate;

    #[derive(Validate)]
    struct Named {
        #[validate(length(min = 1))]
        name: String,
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-06-10").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
        );
        for bad in ["", "10/06/2024", "2024-13-01", "2024-02-30", "amanhã"] {
            assert!(parse_date(bad).unwrap_err().is(ErrorKind::Validation), "{bad}");
        }
    }

    #[test]
    fn test_parse_hour() {
        assert_eq!(parse_hour("14:00").unwrap().hour(), 14);
        assert!(parse_hour("14:30").is_err());
        assert!(parse_hour("24:00").is_err());
    }

    #[test]
    fn test_invalid_lists_failing_fields() {
        let errors = Named { name: String::new() }.validate().unwrap_err();
        let err = invalid(errors);
        assert!(err.is(ErrorKind::Validation));
        assert_eq!(
            err.details,
            Some(serde_json::json!({ "fields": ["name"] }))
        );
    }
}
