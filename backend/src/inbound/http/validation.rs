//! Shared validation helpers for the HTTP adapter.
//!
//! Multipart form fields arrive as text; these helpers turn missing or
//! malformed fields into the domain error envelope with `{field, code}`
//! details instead of letting the extractor produce an opaque 400.

use serde_json::json;

use crate::domain::{CamperId, Error};

pub(crate) fn missing_field_error(field: &'static str) -> Error {
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

pub(crate) fn invalid_number_error(field: &'static str, value: &str) -> Error {
    Error::invalid_request(format!("{field} must be a number")).with_details(json!({
        "field": field,
        "value": value,
        "code": "invalid_number",
    }))
}

fn invalid_id_error(value: &str) -> Error {
    Error::invalid_request("camper id must be a valid UUID").with_details(json!({
        "field": "id",
        "value": value,
        "code": "invalid_id",
    }))
}

pub(crate) fn parse_camper_id(value: &str) -> Result<CamperId, Error> {
    CamperId::parse(value).map_err(|_| invalid_id_error(value))
}

/// Required text field: absent is an error, surrounding whitespace trimmed.
pub(crate) fn require_text(
    value: Option<String>,
    field: &'static str,
) -> Result<String, Error> {
    value
        .map(|text| text.trim().to_owned())
        .ok_or_else(|| missing_field_error(field))
}

/// Non-negative integer field, validated here so the caller sees the domain
/// envelope rather than a deserialiser error.
pub(crate) fn parse_age(value: Option<String>) -> Result<u32, Error> {
    let raw = require_text(value, "age")?;
    raw.parse().map_err(|_| invalid_number_error("age", &raw))
}

/// Optional numeric amount; an empty string counts as absent, matching the
/// registration form which submits blanks for untouched inputs.
pub(crate) fn parse_payment(value: Option<String>) -> Result<Option<f64>, Error> {
    match value {
        None => Ok(None),
        Some(raw) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(None);
            }
            raw.parse()
                .map(Some)
                .map_err(|_| invalid_number_error("payment", raw))
        }
    }
}

/// Optional free text; blanks collapse to absent.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn missing_required_text_names_the_field() {
        let error = require_text(None, "name").expect_err("missing");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            error
                .details()
                .and_then(|details| details.get("field"))
                .and_then(serde_json::Value::as_str),
            Some("name")
        );
    }

    #[rstest]
    #[case("14", Ok(14))]
    #[case(" 14 ", Ok(14))]
    #[case("fourteen", Err(()))]
    #[case("-1", Err(()))]
    fn age_must_be_a_non_negative_integer(#[case] raw: &str, #[case] expected: Result<u32, ()>) {
        let result = parse_age(Some(raw.into()));
        match expected {
            Ok(age) => assert_eq!(result.expect("valid age"), age),
            Err(()) => {
                let error = result.expect_err("invalid age");
                assert_eq!(error.code(), ErrorCode::InvalidRequest);
            }
        }
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("1500"), Some(1500.0))]
    #[case(Some("1500.50"), Some(1500.5))]
    fn payment_treats_blank_as_absent(
        #[case] raw: Option<&str>,
        #[case] expected: Option<f64>,
    ) {
        let parsed = parse_payment(raw.map(String::from)).expect("valid payment");
        assert_eq!(parsed, expected);
    }

    #[rstest]
    fn malformed_payment_is_rejected() {
        let error = parse_payment(Some("lots".into())).expect_err("invalid payment");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn malformed_ids_are_invalid_requests() {
        let error = parse_camper_id("not-a-uuid").expect_err("invalid id");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn blank_optional_text_collapses_to_none() {
        assert_eq!(optional_text(Some("  ".into())), None);
        assert_eq!(optional_text(Some(" note ".into())), Some("note".into()));
        assert_eq!(optional_text(None), None);
    }
}
