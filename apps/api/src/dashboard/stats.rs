//! Dashboard counters for seekers and recruiters.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::application::{Application, ApplicationStatus};

pub const UPCOMING_INTERVIEW_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    pub total: usize,
    /// Every status is present, zero-filled.
    pub by_status: BTreeMap<ApplicationStatus, usize>,
    /// Not yet offered or rejected.
    pub active: usize,
    /// Share of applications that moved past `applied`, 0-100.
    pub response_rate: u8,
    /// Soonest first.
    pub upcoming_interviews: Vec<Application>,
}

pub fn summarize_applications(applications: &[Application], now: DateTime<Utc>) -> ApplicationSummary {
    let mut by_status: BTreeMap<ApplicationStatus, usize> =
        ApplicationStatus::ALL.into_iter().map(|s| (s, 0)).collect();
    for application in applications {
        *by_status.entry(application.status).or_default() += 1;
    }

    let total = applications.len();
    let active = applications
        .iter()
        .filter(|a| !a.status.is_terminal())
        .count();
    let responded = total - by_status[&ApplicationStatus::Applied];
    let response_rate = if total == 0 {
        0
    } else {
        ((responded * 100) as f64 / total as f64).round() as u8
    };

    let mut upcoming: Vec<Application> = applications
        .iter()
        .filter(|a| {
            a.status == ApplicationStatus::InterviewScheduled
                && a.interview_date.is_some_and(|d| d > now)
        })
        .cloned()
        .collect();
    upcoming.sort_by_key(|a| (a.interview_date, a.id));
    upcoming.truncate(UPCOMING_INTERVIEW_LIMIT);

    ApplicationSummary {
        total,
        by_status,
        active,
        response_rate,
        upcoming_interviews: upcoming,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "kebab-case")]
pub enum DashboardStats {
    #[serde(rename_all = "camelCase")]
    JobSeeker {
        #[serde(flatten)]
        applications: ApplicationSummary,
        saved_jobs: usize,
    },
    #[serde(rename_all = "camelCase")]
    Recruiter {
        #[serde(flatten)]
        applications: ApplicationSummary,
        active_postings: usize,
    },
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use uuid::Uuid;

    use super::*;
    use crate::models::application::InterviewType;

    fn application(status: ApplicationStatus, interview_in: Option<Duration>, now: DateTime<Utc>) -> Application {
        Application {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            company: "Acme".into(),
            position: "Engineer".into(),
            applied_date: now - Duration::days(10),
            status,
            interview_date: interview_in.map(|d| now + d),
            interview_type: interview_in.map(|_| InterviewType::Video),
            notes: None,
            expected_salary: None,
            cover_letter: None,
        }
    }

    #[test]
    fn test_summary_ignores_input_order() {
        let now = Utc::now();
        let apps = vec![
            application(ApplicationStatus::InterviewScheduled, Some(Duration::days(3)), now),
            application(ApplicationStatus::InterviewScheduled, Some(Duration::days(1)), now),
            application(ApplicationStatus::Rejected, None, now),
        ];
        let mut reversed = apps.clone();
        reversed.reverse();
        assert_eq!(
            summarize_applications(&apps, now),
            summarize_applications(&reversed, now)
        );
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize_applications(&[], Utc::now());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.response_rate, 0);
        assert_eq!(summary.by_status.len(), ApplicationStatus::ALL.len());
        assert!(summary.by_status.values().all(|&n| n == 0));
    }

    #[test]
    fn test_counts_and_rate() {
        let now = Utc::now();
        let apps = vec![
            application(ApplicationStatus::Applied, None, now),
            application(ApplicationStatus::Applied, None, now),
            application(ApplicationStatus::Shortlisted, None, now),
            application(ApplicationStatus::Rejected, None, now),
        ];
        let summary = summarize_applications(&apps, now);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.by_status[&ApplicationStatus::Applied], 2);
        assert_eq!(summary.active, 3);
        assert_eq!(summary.response_rate, 50);
    }

    #[test]
    fn test_upcoming_interviews_are_future_and_sorted() {
        let now = Utc::now();
        let later = application(ApplicationStatus::InterviewScheduled, Some(Duration::days(4)), now);
        let sooner = application(ApplicationStatus::InterviewScheduled, Some(Duration::days(1)), now);
        let past = application(ApplicationStatus::InterviewScheduled, Some(Duration::days(-1)), now);
        let summary = summarize_applications(&[later.clone(), past, sooner.clone()], now);
        let ids: Vec<_> = summary.upcoming_interviews.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![sooner.id, later.id]);
    }

    #[test]
    fn test_stats_wire_format() {
        let stats = DashboardStats::Recruiter {
            applications: summarize_applications(&[], Utc::now()),
            active_postings: 2,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["role"], "recruiter");
        assert_eq!(json["activePostings"], 2);
        assert_eq!(json["byStatus"]["under-review"], 0);
    }
}
