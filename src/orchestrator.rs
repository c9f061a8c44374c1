//! Screen-level orchestration: upload a prescription, submit reminders.
//!
//! Ties the session to the two service clients the way the form screen
//! drives them. Both functions protect the same invariant: a failed
//! service call never touches session state, so the user keeps every
//! edit and can retry. Only a successful submission resets the form.

use thiserror::Error;

use crate::recognition::{RecognitionApi, RecognitionError};
use crate::reminder::{ReminderAck, ReminderApi, ReminderError};
use crate::session::ReminderSession;
use crate::submission::SubmissionError;
use crate::validation::ValidationErrors;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Submission blocked by {} validation issue(s)", .0.len())]
    Invalid(ValidationErrors),

    #[error("Submission could not be assembled: {0}")]
    Build(#[from] SubmissionError),

    #[error("Reminder service call failed: {0}")]
    Transport(#[from] ReminderError),
}

/// Upload a prescription image and install the extracted medications
/// into the session, seeding schedule defaults.
///
/// Returns how many medications were extracted. On failure the session
/// is left untouched.
pub fn ingest_prescription(
    session: &mut ReminderSession,
    api: &dyn RecognitionApi,
    image: &[u8],
    content_type: &str,
) -> Result<usize, RecognitionError> {
    let scan = api.extract_medications(image, content_type)?;
    let count = scan.medications.len();
    session.receive_medications(scan.medications);
    Ok(count)
}

/// Validate, assemble and submit the session's reminder schedule.
///
/// Validation failures and service failures both come back as errors
/// with all session edits intact; the session resets only after the
/// service accepts the submission.
pub fn submit_reminders(
    session: &mut ReminderSession,
    api: &dyn ReminderApi,
) -> Result<ReminderAck, SubmitError> {
    let errors = session.validate();
    if !errors.is_empty() {
        return Err(SubmitError::Invalid(errors));
    }

    let submission = session.build_submission()?;
    let ack = api.set_reminders(&submission)?;

    session.reset();
    Ok(ack)
}
