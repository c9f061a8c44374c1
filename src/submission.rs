//! Outbound payload assembly for the reminder service.
//!
//! `build_submission` merges each extracted medication with its chosen
//! schedule into the JSON document the reminder service expects. Pure
//! and side-effect free; the session calls it only after validation
//! passes, and any hole it still finds comes back as a typed error
//! rather than a panic.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{DaySlot, FoodRelationship, Frequency, Medication};
use crate::schedule;
use crate::session::ScheduleEntry;

#[derive(Error, Debug, PartialEq)]
pub enum SubmissionError {
    #[error("Schedule entry {index} is incomplete; validation must pass before building")]
    IncompleteEntry { index: usize },

    #[error("No end date can be projected for entry {index}")]
    EndDateUnavailable { index: usize },

    #[error("Medication list and schedule entries are out of step ({medications} medications, {entries} entries)")]
    LengthMismatch { medications: usize, entries: usize },
}

/// One medication with its schedule attached, as the reminder service
/// stores it. Static fields travel unchanged from the extracted record;
/// dates serialize as `YYYY-MM-DD` and the dose time as `HH:MM`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledMedication {
    pub medicine_name: String,
    pub time_of_day: DaySlot,
    pub number_of_days: u32,
    pub food_relationship: FoodRelationship,
    pub dosage: String,
    pub frequency: Frequency,
    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,
    #[serde(rename = "endDate")]
    pub end_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
}

impl ScheduledMedication {
    /// The SMS body the reminder service sends for each dose.
    pub fn reminder_line(&self) -> String {
        format!(
            "Reminder: Take your {} at {} ({}). Dosage: {}. {}",
            self.medicine_name,
            self.time.format("%H:%M"),
            self.time_of_day.as_str(),
            self.dosage,
            self.food_relationship.as_str(),
        )
    }
}

/// Full outbound document for the reminder service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSubmission {
    pub phone_number: String,
    pub medications: Vec<ScheduledMedication>,
    pub confirmed: bool,
}

/// Merge medications with their schedule entries into the submission.
///
/// Index-aligned: entry `i` schedules medication `i`, and static
/// medication fields are copied through untouched.
pub fn build_submission(
    medications: &[Medication],
    entries: &[ScheduleEntry],
    phone_number: &str,
    confirmed: bool,
) -> Result<ReminderSubmission, SubmissionError> {
    if medications.len() != entries.len() {
        return Err(SubmissionError::LengthMismatch {
            medications: medications.len(),
            entries: entries.len(),
        });
    }

    let mut scheduled = Vec::with_capacity(medications.len());
    for (index, (medication, entry)) in medications.iter().zip(entries).enumerate() {
        let (start_date, frequency, time) =
            match (entry.start_date, entry.frequency.clone(), entry.time) {
                (Some(start), Some(frequency), Some(time)) => (start, frequency, time),
                _ => return Err(SubmissionError::IncompleteEntry { index }),
            };

        let end_date =
            schedule::course_end_date(Some(start_date), medication.number_of_days, &frequency)
                .ok_or(SubmissionError::EndDateUnavailable { index })?;

        scheduled.push(ScheduledMedication {
            medicine_name: medication.medicine_name.clone(),
            time_of_day: medication.time_of_day.clone(),
            number_of_days: medication.number_of_days,
            food_relationship: medication.food_relationship.clone(),
            dosage: medication.dosage.clone(),
            frequency,
            start_date,
            end_date,
            time,
        });
    }

    Ok(ReminderSubmission {
        phone_number: phone_number.to_string(),
        medications: scheduled,
        confirmed,
    })
}

/// Serialize dose times as `HH:MM`, the reminder service's format.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn med(name: &str, days: u32, dosage: &str) -> Medication {
        Medication {
            medicine_name: name.into(),
            time_of_day: DaySlot::Morning,
            number_of_days: days,
            food_relationship: FoodRelationship::AfterFood,
            dosage: dosage.into(),
        }
    }

    fn entry(start: &str, frequency: Frequency, hour: u32, minute: u32) -> ScheduleEntry {
        ScheduleEntry {
            start_date: Some(NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap()),
            frequency: Some(frequency),
            time: NaiveTime::from_hms_opt(hour, minute, 0),
        }
    }

    // ── build_submission ────────────────────────────────────

    #[test]
    fn build_preserves_count_and_static_fields() {
        let medications = vec![med("Paracetamol", 5, "2"), med("Amoxicillin", 7, "500mg")];
        let entries = vec![
            entry("2024-01-01", Frequency::Everyday, 8, 0),
            entry("2024-01-02", Frequency::Alternate, 20, 30),
        ];

        let submission =
            build_submission(&medications, &entries, "+911234567890", true).unwrap();

        assert_eq!(submission.medications.len(), medications.len());
        for (scheduled, medication) in submission.medications.iter().zip(&medications) {
            assert_eq!(scheduled.medicine_name, medication.medicine_name);
            assert_eq!(scheduled.time_of_day, medication.time_of_day);
            assert_eq!(scheduled.number_of_days, medication.number_of_days);
            assert_eq!(scheduled.food_relationship, medication.food_relationship);
            assert_eq!(scheduled.dosage, medication.dosage);
        }
        assert_eq!(submission.phone_number, "+911234567890");
        assert!(submission.confirmed);
    }

    #[test]
    fn build_projects_end_dates_per_frequency() {
        let medications = vec![med("Paracetamol", 5, "2"), med("Cetirizine", 5, "1")];
        let entries = vec![
            entry("2024-01-01", Frequency::Everyday, 8, 0),
            entry("2024-01-01", Frequency::Alternate, 8, 0),
        ];

        let submission = build_submission(&medications, &entries, "+911234567890", true).unwrap();

        assert_eq!(
            submission.medications[0].end_date,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
        assert_eq!(
            submission.medications[1].end_date,
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
        );
    }

    #[test]
    fn incomplete_entry_is_an_error_not_a_panic() {
        let medications = vec![med("Paracetamol", 5, "2"), med("Cetirizine", 5, "1")];
        let mut second = entry("2024-01-01", Frequency::Everyday, 8, 0);
        second.time = None;
        let entries = vec![entry("2024-01-01", Frequency::Everyday, 8, 0), second];

        let err = build_submission(&medications, &entries, "+911234567890", true).unwrap_err();
        assert_eq!(err, SubmissionError::IncompleteEntry { index: 1 });
    }

    #[test]
    fn zero_day_course_yields_end_date_error() {
        let medications = vec![med("Paracetamol", 0, "2")];
        let entries = vec![entry("2024-01-01", Frequency::Everyday, 8, 0)];

        let err = build_submission(&medications, &entries, "+911234567890", true).unwrap_err();
        assert_eq!(err, SubmissionError::EndDateUnavailable { index: 0 });
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let medications = vec![med("Paracetamol", 5, "2")];
        let err = build_submission(&medications, &[], "+911234567890", true).unwrap_err();
        assert_eq!(
            err,
            SubmissionError::LengthMismatch {
                medications: 1,
                entries: 0,
            }
        );
    }

    // ── wire format ─────────────────────────────────────────

    #[test]
    fn payload_serializes_with_service_keys() {
        let medications = vec![med("Paracetamol", 5, "2")];
        let entries = vec![entry("2024-01-01", Frequency::Everyday, 8, 0)];
        let submission = build_submission(&medications, &entries, "+911234567890", true).unwrap();

        let value = serde_json::to_value(&submission).unwrap();
        assert_eq!(value["phoneNumber"], "+911234567890");
        assert_eq!(value["confirmed"], true);

        let first = &value["medications"][0];
        assert_eq!(first["medicine_name"], "Paracetamol");
        assert_eq!(first["time_of_day"], "morning");
        assert_eq!(first["food_relationship"], "after_food");
        assert_eq!(first["dosage"], "2");
        assert_eq!(first["frequency"], "everyday");
        assert_eq!(first["startDate"], "2024-01-01");
        assert_eq!(first["endDate"], "2024-01-05");
        assert_eq!(first["time"], "08:00");
    }

    #[test]
    fn dose_time_parses_back_from_hhmm() {
        let json = r#"{
            "medicine_name": "Paracetamol",
            "time_of_day": "night",
            "number_of_days": 5,
            "food_relationship": "before_food",
            "dosage": "2",
            "frequency": "alternate",
            "startDate": "2024-01-01",
            "endDate": "2024-01-10",
            "time": "21:30"
        }"#;
        let scheduled: ScheduledMedication = serde_json::from_str(json).unwrap();
        assert_eq!(scheduled.time, NaiveTime::from_hms_opt(21, 30, 0).unwrap());
        assert_eq!(scheduled.frequency, Frequency::Alternate);
    }

    // ── SMS preview ─────────────────────────────────────────

    #[test]
    fn reminder_line_matches_sms_format() {
        let medications = vec![med("Paracetamol", 5, "2")];
        let entries = vec![entry("2024-01-01", Frequency::Everyday, 8, 0)];
        let submission = build_submission(&medications, &entries, "+911234567890", true).unwrap();

        assert_eq!(
            submission.medications[0].reminder_line(),
            "Reminder: Take your Paracetamol at 08:00 (morning). Dosage: 2. after_food"
        );
    }
}
