//! Field validation for the reminder form.
//!
//! Every rule is checked independently so the user sees all problems at
//! once; nothing short-circuits. An empty error map is the only pass
//! signal.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::session::ScheduleEntry;

/// Indian mobile number: +91 followed by exactly ten digits.
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+91[0-9]{10}$").unwrap());

/// Validation outcome, mapping field key to human-readable message.
///
/// Keys are `phone`, `confirmation`, and the per-index
/// `frequency_<i>` / `startDate_<i>` / `time_<i>` triple. The map is
/// rebuilt from scratch on every validation pass, never merged with
/// prior results.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    /// True when no rule failed; the sole pass/fail signal.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message for a field key, if that field failed.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn insert(&mut self, key: String, message: &str) {
        self.0.insert(key, message.to_string());
    }
}

/// Check the whole form at once.
///
/// `entries` is index-aligned with the medication list; an empty list
/// leaves only the phone and confirmation rules in play.
pub fn validate(phone: &str, entries: &[ScheduleEntry], confirmed: bool) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if phone.is_empty() {
        errors.insert("phone".into(), "Phone number is required");
    } else if !PHONE_PATTERN.is_match(phone) {
        errors.insert(
            "phone".into(),
            "Please enter a valid phone number in format +91XXXXXXXXXX",
        );
    }

    for (index, entry) in entries.iter().enumerate() {
        if entry.frequency.is_none() {
            errors.insert(format!("frequency_{index}"), "Please select a frequency");
        }
        if entry.start_date.is_none() {
            errors.insert(format!("startDate_{index}"), "Please select a start date");
        }
        if entry.time.is_none() {
            errors.insert(format!("time_{index}"), "Please select a time");
        }
    }

    if !confirmed {
        errors.insert(
            "confirmation".into(),
            "Please confirm your medication settings",
        );
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    use crate::models::Frequency;

    const VALID_PHONE: &str = "+911234567890";

    fn complete_entry() -> ScheduleEntry {
        ScheduleEntry {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            frequency: Some(Frequency::Everyday),
            time: NaiveTime::from_hms_opt(8, 0, 0),
        }
    }

    fn blank_entry() -> ScheduleEntry {
        ScheduleEntry {
            start_date: None,
            frequency: None,
            time: None,
        }
    }

    // ── pass signal ─────────────────────────────────────────

    #[test]
    fn complete_form_produces_empty_map() {
        let errors = validate(VALID_PHONE, &[complete_entry(), complete_entry()], true);
        assert!(errors.is_empty());
    }

    // ── phone rule ──────────────────────────────────────────

    #[test]
    fn empty_phone_is_required() {
        let errors = validate("", &[], true);
        assert_eq!(errors.get("phone"), Some("Phone number is required"));
    }

    #[test]
    fn short_phone_fails_format_check() {
        let errors = validate("+9112345", &[], true);
        assert_eq!(
            errors.get("phone"),
            Some("Please enter a valid phone number in format +91XXXXXXXXXX")
        );
    }

    #[test]
    fn phone_without_prefix_fails() {
        let errors = validate("9112345678", &[], true);
        assert!(errors.get("phone").is_some());
    }

    #[test]
    fn ten_digit_plus_91_phone_passes() {
        let errors = validate(VALID_PHONE, &[], true);
        assert_eq!(errors.get("phone"), None);
    }

    // ── per-index rules ─────────────────────────────────────

    #[test]
    fn missing_fields_reported_under_their_index() {
        let errors = validate(VALID_PHONE, &[complete_entry(), blank_entry()], true);
        assert_eq!(errors.get("frequency_1"), Some("Please select a frequency"));
        assert_eq!(errors.get("startDate_1"), Some("Please select a start date"));
        assert_eq!(errors.get("time_1"), Some("Please select a time"));
        assert_eq!(errors.get("frequency_0"), None);
        assert_eq!(errors.get("startDate_0"), None);
        assert_eq!(errors.get("time_0"), None);
    }

    #[test]
    fn all_rules_checked_independently() {
        // Nothing short-circuits: one failure per rule, all present at once.
        let errors = validate("", &[blank_entry()], false);
        assert_eq!(errors.len(), 5);
        assert!(errors.get("phone").is_some());
        assert!(errors.get("frequency_0").is_some());
        assert!(errors.get("startDate_0").is_some());
        assert!(errors.get("time_0").is_some());
        assert!(errors.get("confirmation").is_some());
    }

    #[test]
    fn empty_list_reports_exactly_phone_and_confirmation() {
        let errors = validate("", &[], false);
        let keys: Vec<&str> = errors.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["confirmation", "phone"]);
    }

    // ── confirmation rule ───────────────────────────────────

    #[test]
    fn unconfirmed_form_is_blocked() {
        let errors = validate(VALID_PHONE, &[complete_entry()], false);
        assert_eq!(
            errors.get("confirmation"),
            Some("Please confirm your medication settings")
        );
    }

    // ── serialization ───────────────────────────────────────

    #[test]
    fn error_map_serializes_as_plain_object() {
        let errors = validate("", &[], false);
        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(value["phone"], "Phone number is required");
        assert_eq!(value["confirmation"], "Please confirm your medication settings");
    }
}
