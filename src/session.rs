//! Session state for one prescription-to-reminder pass.
//!
//! `ReminderSession` owns everything the form screen reads and writes:
//! the extracted medication list, the per-index schedule entries, the
//! contact number and the confirmation flag. One session covers one
//! uploaded prescription; only a successful submission resets it.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Frequency, Medication};
use crate::schedule;
use crate::submission::{self, ReminderSubmission, SubmissionError};
use crate::validation::{self, ValidationErrors};

/// User-chosen schedule for the medication at the same index.
///
/// All three fields are optional so validation can report each one
/// missing independently. Seeding fills the date and frequency; the
/// time always starts unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// First dose date, `YYYY-MM-DD` on the wire.
    pub start_date: Option<NaiveDate>,
    pub frequency: Option<Frequency>,
    /// Dose time of day, `HH:MM` on the wire.
    pub time: Option<NaiveTime>,
}

// ═══════════════════════════════════════════
// ReminderSession
// ═══════════════════════════════════════════

/// State object for one reminder-configuration session.
///
/// Medications are keyed by their position in the extracted list; the
/// upstream service provides no stable identifier, so reordering or
/// removing medications mid-session is unsupported. A new list fully
/// replaces all per-index state.
#[derive(Debug)]
pub struct ReminderSession {
    /// Correlates log lines across the upload and submission calls.
    id: Uuid,
    medications: Vec<Medication>,
    entries: Vec<ScheduleEntry>,
    phone_number: String,
    confirmed: bool,
}

impl ReminderSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            medications: Vec::new(),
            entries: Vec::new(),
            phone_number: String::new(),
            confirmed: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    // ── Medication list intake ──────────────────────────────

    /// Install a freshly extracted medication list and seed schedule
    /// defaults: start date today, frequency `Everyday`, time unset.
    ///
    /// Called exactly once per upload, never per edit. Re-delivering a
    /// list equal to the current one keeps the edits already made; a
    /// genuinely new list rebuilds every entry and drops all prior
    /// per-index state.
    pub fn receive_medications(&mut self, medications: Vec<Medication>) {
        if self.medications == medications {
            tracing::debug!(
                session = %self.id,
                "Identical medication list re-delivered, keeping edits"
            );
            return;
        }

        let today = schedule::today();
        self.entries = medications
            .iter()
            .map(|_| ScheduleEntry {
                start_date: Some(today),
                frequency: Some(Frequency::Everyday),
                time: None,
            })
            .collect();
        self.medications = medications;

        tracing::info!(
            session = %self.id,
            count = self.medications.len(),
            "Medication list received, schedule defaults seeded"
        );
    }

    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    // ── Index-scoped edits ──────────────────────────────────

    /// Panics if `index` is out of range; callers only address indices
    /// of medications they received.
    pub fn set_start_date(&mut self, index: usize, date: Option<NaiveDate>) {
        self.entries[index].start_date = date;
    }

    pub fn set_frequency(&mut self, index: usize, frequency: Frequency) {
        self.entries[index].frequency = Some(frequency);
    }

    pub fn set_time(&mut self, index: usize, time: Option<NaiveTime>) {
        self.entries[index].time = time;
    }

    /// Projected last dose day for the medication at `index`, or `None`
    /// while its inputs are incomplete.
    pub fn end_date_preview(&self, index: usize) -> Option<NaiveDate> {
        let entry = &self.entries[index];
        // An unset frequency previews like Everyday; only Alternate stretches the span.
        let frequency = entry.frequency.as_ref().unwrap_or(&Frequency::Everyday);
        schedule::course_end_date(
            entry.start_date,
            self.medications[index].number_of_days,
            frequency,
        )
    }

    // ── Contact & confirmation ──────────────────────────────

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn set_phone_number(&mut self, phone: &str) {
        self.phone_number = phone.to_string();
    }

    pub fn confirmed(&self) -> bool {
        self.confirmed
    }

    /// Flip the single confirmation flag.
    pub fn toggle_confirmation(&mut self) {
        self.confirmed = !self.confirmed;
    }

    // ── Submission path ─────────────────────────────────────

    /// Run every validation rule over the current state.
    pub fn validate(&self) -> ValidationErrors {
        let errors = validation::validate(&self.phone_number, &self.entries, self.confirmed);
        if !errors.is_empty() {
            tracing::debug!(
                session = %self.id,
                issues = errors.len(),
                "Validation blocked submission"
            );
        }
        errors
    }

    /// Assemble the outbound payload from the current state.
    ///
    /// Expects a prior passing `validate`; an incomplete entry comes
    /// back as an error rather than a panic.
    pub fn build_submission(&self) -> Result<ReminderSubmission, SubmissionError> {
        submission::build_submission(
            &self.medications,
            &self.entries,
            &self.phone_number,
            self.confirmed,
        )
    }

    /// Drop all session state back to the empty form.
    ///
    /// Invoked after a successful submission only; failures keep every
    /// edit so the user can retry.
    pub fn reset(&mut self) {
        self.medications.clear();
        self.entries.clear();
        self.phone_number.clear();
        self.confirmed = false;
        tracing::info!(session = %self.id, "Session reset after submission");
    }
}

impl Default for ReminderSession {
    fn default() -> Self {
        Self::new()
    }
}
