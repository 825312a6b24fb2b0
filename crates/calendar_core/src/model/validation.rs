//! Field normalization and validation rules shared by all records.
//!
//! # Responsibility
//! - Normalize user input (phone numbers, colors, dates) into canonical form.
//! - Report format and uniqueness violations as `ValidationError`.
//!
//! # Invariants
//! - Phone numbers are compared after whitespace removal.
//! - Canonical phone format is `XXX XXX XXX`.
//! - Date-times are truncated to minute precision.
//! - Stored text never holds control characters other than tab and line breaks.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static PHONE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{9}$").expect("valid phone regex"));
static CLOCK_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]?[0-9]|2[0-3]):([0-5][0-9])$").expect("valid time regex"));
static COLOR_HEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#?([0-9a-fA-F]{6})$").expect("valid color regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%d.%m.%Y %H:%M"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y"];

/// Format or uniqueness violation detected before any store write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is blank after trim.
    BlankField(&'static str),
    /// Text field holds a control character.
    ControlCharacter(&'static str),
    /// Phone number is not exactly nine digits after whitespace removal.
    InvalidPhoneNumber(String),
    /// Color is not a six-digit hex code.
    InvalidColor(String),
    /// Clock/offset value is not `H:MM` or `HH:MM`.
    InvalidTime(String),
    /// Date or date-time input cannot be parsed.
    InvalidDateTime(String),
    /// Another active category already uses this name.
    DuplicateCategoryName(String),
    /// Another active event is already scheduled at this date-time.
    DateTimeOccupied(NaiveDateTime),
    /// Another active contact already uses this phone number.
    DuplicatePhoneNumber(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::ControlCharacter(field) => {
                write!(f, "{field} must not contain control characters")
            }
            Self::InvalidPhoneNumber(value) => {
                write!(f, "invalid phone number `{value}`; expected 9 digits")
            }
            Self::InvalidColor(value) => {
                write!(f, "invalid color `{value}`; expected #RRGGBB")
            }
            Self::InvalidTime(value) => write!(f, "invalid time `{value}`; expected HH:MM"),
            Self::InvalidDateTime(value) => write!(f, "invalid date/time `{value}`"),
            Self::DuplicateCategoryName(name) => {
                write!(f, "category `{name}` already exists")
            }
            Self::DateTimeOccupied(date_time) => write!(
                f,
                "an event is already scheduled at {}",
                date_time.format("%d.%m.%Y %H:%M")
            ),
            Self::DuplicatePhoneNumber(phone) => {
                write!(f, "phone number `{phone}` already exists")
            }
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and rejects blank input or control characters.
pub fn require_non_blank(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = normalize_text(field, value)?;
    if trimmed.is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(trimmed)
}

/// Trims optional free text and rejects control characters.
pub fn normalize_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.chars().any(is_forbidden_char) {
        return Err(ValidationError::ControlCharacter(field));
    }
    Ok(trimmed.to_string())
}

/// Characters a text field may not hold. Tab, CR and LF are allowed.
pub fn is_forbidden_char(ch: char) -> bool {
    (ch.is_control() && !matches!(ch, '\t' | '\n' | '\r')) || matches!(ch, '\u{FFFE}' | '\u{FFFF}')
}

/// Removes all whitespace from a phone number.
pub fn normalize_phone_number(value: &str) -> String {
    WHITESPACE_RE.replace_all(value, "").into_owned()
}

/// Returns whether `value` holds exactly nine digits, ignoring whitespace.
pub fn is_phone_number_valid(value: &str) -> bool {
    PHONE_NUMBER_RE.is_match(&normalize_phone_number(value))
}

/// Converts a phone number to canonical `XXX XXX XXX` form.
pub fn format_phone_number(value: &str) -> Result<String, ValidationError> {
    let digits = normalize_phone_number(value);
    if !PHONE_NUMBER_RE.is_match(&digits) {
        return Err(ValidationError::InvalidPhoneNumber(value.to_string()));
    }
    let mut formatted = String::with_capacity(11);
    for (index, digit) in digits.chars().enumerate() {
        if index == 3 || index == 6 {
            formatted.push(' ');
        }
        formatted.push(digit);
    }
    Ok(formatted)
}

/// Returns whether `value` is a valid `H:MM`/`HH:MM` clock value.
pub fn is_time_valid(value: &str) -> bool {
    CLOCK_TIME_RE.is_match(value.trim())
}

/// Parses `H:MM`/`HH:MM` into `(hours, minutes)`.
pub fn parse_clock_time(value: &str) -> Result<(u32, u32), ValidationError> {
    let trimmed = value.trim();
    let caps = CLOCK_TIME_RE
        .captures(trimmed)
        .ok_or_else(|| ValidationError::InvalidTime(value.to_string()))?;
    let hours = caps[1]
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidTime(value.to_string()))?;
    let minutes = caps[2]
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidTime(value.to_string()))?;
    Ok((hours, minutes))
}

/// Normalizes a color to uppercase `#RRGGBB`. Blank input means "no color".
pub fn normalize_color(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    let caps = COLOR_HEX_RE
        .captures(trimmed)
        .ok_or_else(|| ValidationError::InvalidColor(value.to_string()))?;
    Ok(format!("#{}", caps[1].to_ascii_uppercase()))
}

/// Parses a date-time in one of the accepted input formats.
pub fn parse_date_time(value: &str) -> Result<NaiveDateTime, ValidationError> {
    let trimmed = value.trim();
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(truncate_to_minute)
        .ok_or_else(|| ValidationError::InvalidDateTime(value.to_string()))
}

/// Parses a calendar date in one of the accepted input formats.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| ValidationError::InvalidDateTime(value.to_string()))
}

/// Drops seconds and sub-second precision.
pub fn truncate_to_minute(value: NaiveDateTime) -> NaiveDateTime {
    value
        .with_second(0)
        .and_then(|v| v.with_nanosecond(0))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_number_is_normalized_and_formatted() {
        assert_eq!(format_phone_number(" 123 45 6789 ").unwrap(), "123 456 789");
        assert!(is_phone_number_valid("123 456 789"));
        assert!(!is_phone_number_valid("12345678"));
        assert!(!is_phone_number_valid("12345678a"));
        assert_eq!(
            format_phone_number("1234").unwrap_err(),
            ValidationError::InvalidPhoneNumber("1234".to_string())
        );
    }

    #[test]
    fn non_ascii_digits_are_not_phone_numbers() {
        let arabic_indic = "\u{0661}\u{0662}\u{0663}\u{0664}\u{0665}\u{0666}\u{0667}\u{0668}\u{0669}";
        assert!(!is_phone_number_valid(arabic_indic));
        assert_eq!(
            format_phone_number(arabic_indic).unwrap_err(),
            ValidationError::InvalidPhoneNumber(arabic_indic.to_string())
        );
    }

    #[test]
    fn control_characters_are_rejected() {
        assert_eq!(
            require_non_blank("name", "Work\u{1}").unwrap_err(),
            ValidationError::ControlCharacter("name")
        );
        assert_eq!(
            normalize_text("location", "Room\u{7f}").unwrap_err(),
            ValidationError::ControlCharacter("location")
        );
        assert_eq!(
            normalize_text("description", " line one\nline\ttwo ").unwrap(),
            "line one\nline\ttwo"
        );
    }

    #[test]
    fn clock_time_accepts_single_digit_hours() {
        assert_eq!(parse_clock_time("9:05").unwrap(), (9, 5));
        assert_eq!(parse_clock_time("23:59").unwrap(), (23, 59));
        assert!(parse_clock_time("24:00").is_err());
        assert!(parse_clock_time("12:60").is_err());
        assert!(!is_time_valid("noon"));
    }

    #[test]
    fn color_is_uppercased_with_hash() {
        assert_eq!(normalize_color("ff8800").unwrap(), "#FF8800");
        assert_eq!(normalize_color("#a1b2c3").unwrap(), "#A1B2C3");
        assert_eq!(normalize_color("  ").unwrap(), "");
        assert!(normalize_color("#12345").is_err());
    }

    #[test]
    fn date_time_parsing_accepts_iso_and_dotted_forms() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(parse_date_time("2025-01-10 09:00").unwrap(), expected);
        assert_eq!(parse_date_time("2025-01-10T09:00").unwrap(), expected);
        assert_eq!(parse_date_time("10.01.2025 09:00").unwrap(), expected);
        assert!(parse_date_time("tomorrow").is_err());
    }

    #[test]
    fn blank_fields_are_rejected() {
        assert_eq!(
            require_non_blank("name", "   ").unwrap_err(),
            ValidationError::BlankField("name")
        );
        assert_eq!(require_non_blank("name", " Work ").unwrap(), "Work");
    }
}
