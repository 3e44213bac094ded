use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationStatus {
    Applied,
    UnderReview,
    Shortlisted,
    InterviewScheduled,
    OfferReceived,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Applied,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::InterviewScheduled,
        ApplicationStatus::OfferReceived,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::UnderReview => "under-review",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::InterviewScheduled => "interview-scheduled",
            ApplicationStatus::OfferReceived => "offer-received",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "applied" => ApplicationStatus::Applied,
            "under-review" => ApplicationStatus::UnderReview,
            "shortlisted" => ApplicationStatus::Shortlisted,
            "interview-scheduled" => ApplicationStatus::InterviewScheduled,
            "offer-received" => ApplicationStatus::OfferReceived,
            "rejected" => ApplicationStatus::Rejected,
            other => bail!("unknown application status '{other}'"),
        })
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum InterviewType {
    Phone,
    Video,
    InPerson,
    Technical,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Phone => "phone",
            InterviewType::Video => "video",
            InterviewType::InPerson => "in-person",
            InterviewType::Technical => "technical",
        }
    }
}

impl FromStr for InterviewType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "phone" => InterviewType::Phone,
            "video" => InterviewType::Video,
            "in-person" => InterviewType::InPerson,
            "technical" => InterviewType::Technical,
            other => bail!("unknown interview type '{other}'"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub company: String,
    pub position: String,
    pub applied_date: DateTime<Utc>,
    pub status: ApplicationStatus,
    pub interview_date: Option<DateTime<Utc>>,
    pub interview_type: Option<InterviewType>,
    pub notes: Option<String>,
    pub expected_salary: Option<i64>,
    pub cover_letter: Option<String>,
}

/// Insert payload; company and position are copied from the listing at submit time.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub company: String,
    pub position: String,
    pub expected_salary: Option<i64>,
    pub cover_letter: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InterviewSchedule {
    pub date: DateTime<Utc>,
    pub interview_type: InterviewType,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub company: String,
    pub position: String,
    pub applied_date: DateTime<Utc>,
    pub status: String,
    pub interview_date: Option<DateTime<Utc>>,
    pub interview_type: Option<String>,
    pub interview_notes: Option<String>,
    pub expected_salary: Option<i64>,
    pub cover_letter: Option<String>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = anyhow::Error;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(Application {
            id: row.id,
            user_id: row.user_id,
            job_id: row.job_id,
            company: row.company,
            position: row.position,
            applied_date: row.applied_date,
            status: row.status.parse()?,
            interview_date: row.interview_date,
            interview_type: row
                .interview_type
                .as_deref()
                .map(InterviewType::from_str)
                .transpose()?,
            notes: row.interview_notes,
            expected_salary: row.expected_salary,
            cover_letter: row.cover_letter,
        })
    }
}
