//! Application status machine.
//!
//! applied → under-review → shortlisted → interview-scheduled → {offer-received | rejected}
//!
//! Moves go strictly forward (skipping stages is allowed), rejection is reachable
//! from any open state, and offer-received / rejected are final.

use crate::errors::AppError;
use crate::models::application::ApplicationStatus;

impl ApplicationStatus {
    fn stage(&self) -> u8 {
        match self {
            ApplicationStatus::Applied => 0,
            ApplicationStatus::UnderReview => 1,
            ApplicationStatus::Shortlisted => 2,
            ApplicationStatus::InterviewScheduled => 3,
            ApplicationStatus::OfferReceived | ApplicationStatus::Rejected => 4,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::OfferReceived | ApplicationStatus::Rejected
        )
    }

    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            ApplicationStatus::Rejected => true,
            next => next.stage() > self.stage(),
        }
    }

    pub fn next_statuses(&self) -> Vec<ApplicationStatus> {
        ApplicationStatus::ALL
            .into_iter()
            .filter(|next| self.can_transition_to(*next))
            .collect()
    }
}

pub fn validate_transition(from: ApplicationStatus, to: ApplicationStatus) -> Result<(), AppError> {
    if from.can_transition_to(to) {
        return Ok(());
    }
    let allowed: Vec<&str> = from.next_statuses().iter().map(|s| s.as_str()).collect();
    let hint = if allowed.is_empty() {
        format!("'{from}' is final")
    } else {
        format!("allowed: {}", allowed.join(", "))
    };
    Err(AppError::UnprocessableEntity(format!(
        "Cannot move application from '{from}' to '{to}' ({hint})"
    )))
}
