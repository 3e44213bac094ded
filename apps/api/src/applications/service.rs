//! Application submit / status / interview flows.
//!
//! Each operation is one remote write scoped by the acting user; handlers
//! re-fetch the full list afterwards.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use super::lifecycle::validate_transition;
use crate::errors::AppError;
use crate::models::application::{
    Application, ApplicationStatus, InterviewSchedule, InterviewType, NewApplication,
};
use crate::models::job::JobListing;
use crate::models::profile::UserRole;
use crate::repo::{ApplicationRepository, JobRepository};
use crate::session::CurrentUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyFlow {
    /// Cover letter required.
    Full,
    /// Job id only.
    Quick,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplication {
    pub job_id: Uuid,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub expected_salary: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInterview {
    pub interview_date: DateTime<Utc>,
    pub interview_type: InterviewType,
    #[serde(default)]
    pub notes: Option<String>,
}

pub async fn submit_application(
    applications: &dyn ApplicationRepository,
    jobs: &dyn JobRepository,
    user: &CurrentUser,
    request: SubmitApplication,
    flow: ApplyFlow,
) -> Result<Application, AppError> {
    if user.role != UserRole::JobSeeker {
        return Err(AppError::Forbidden);
    }

    let cover_letter = request
        .cover_letter
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    if flow == ApplyFlow::Full && cover_letter.is_none() {
        return Err(AppError::invalid_field(
            "coverLetter",
            "A cover letter is required",
        ));
    }
    if matches!(request.expected_salary, Some(s) if s <= 0) {
        return Err(AppError::invalid_field(
            "expectedSalary",
            "Expected salary must be a positive amount",
        ));
    }

    let job = jobs
        .get_job(request.job_id, Some(user.id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", request.job_id)))?;

    if applications.find_for_job(user.id, job.id).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "You have already applied to {}",
            job.title
        )));
    }

    let application = applications
        .insert_application(NewApplication {
            user_id: user.id,
            job_id: job.id,
            company: job.company.name,
            position: job.title,
            expected_salary: request.expected_salary,
            cover_letter: match flow {
                ApplyFlow::Full => cover_letter,
                ApplyFlow::Quick => None,
            },
        })
        .await
        .map_err(|e| {
            error!("Failed to submit application for job {}: {e}", job.id);
            e
        })?;

    info!(
        "User {} applied to job {} ({:?} flow)",
        user.id, application.job_id, flow
    );
    Ok(application)
}

/// Loads an application and checks the recruiter owns the posting it targets.
async fn owned_application(
    applications: &dyn ApplicationRepository,
    jobs: &dyn JobRepository,
    recruiter: &CurrentUser,
    id: Uuid,
) -> Result<(Application, JobListing), AppError> {
    if recruiter.role != UserRole::Recruiter {
        return Err(AppError::Forbidden);
    }
    let application = applications
        .get_application(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;
    let job = jobs
        .get_job(application.job_id, None)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", application.job_id)))?;
    if job.recruiter_id != Some(recruiter.id) {
        return Err(AppError::Forbidden);
    }
    Ok((application, job))
}

pub async fn update_status(
    applications: &dyn ApplicationRepository,
    jobs: &dyn JobRepository,
    recruiter: &CurrentUser,
    id: Uuid,
    status: ApplicationStatus,
) -> Result<Application, AppError> {
    if status == ApplicationStatus::InterviewScheduled {
        return Err(AppError::invalid_field(
            "status",
            "Schedule an interview to move an application to interview-scheduled",
        ));
    }

    let (current, _) = owned_application(applications, jobs, recruiter, id).await?;
    validate_transition(current.status, status)?;

    let updated = applications.update_status(id, status).await.map_err(|e| {
        error!("Failed to update application {id}: {e}");
        e
    })?;
    info!("Application {id}: {} -> {status}", current.status);
    Ok(updated)
}

/// Records an interview. An already scheduled interview may be moved.
pub async fn schedule_interview(
    applications: &dyn ApplicationRepository,
    jobs: &dyn JobRepository,
    recruiter: &CurrentUser,
    id: Uuid,
    request: ScheduleInterview,
    now: DateTime<Utc>,
) -> Result<Application, AppError> {
    if request.interview_date <= now {
        return Err(AppError::invalid_field(
            "interviewDate",
            "Interview date must be in the future",
        ));
    }

    let (current, _) = owned_application(applications, jobs, recruiter, id).await?;
    if current.status != ApplicationStatus::InterviewScheduled {
        validate_transition(current.status, ApplicationStatus::InterviewScheduled)?;
    }

    let schedule = InterviewSchedule {
        date: request.interview_date,
        interview_type: request.interview_type,
        notes: request
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
    };
    let updated = applications
        .schedule_interview(id, &schedule)
        .await
        .map_err(|e| {
            error!("Failed to schedule interview for application {id}: {e}");
            e
        })?;
    info!(
        "Interview for application {id} set for {} ({})",
        schedule.date,
        schedule.interview_type.as_str()
    );
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::models::job::SalaryRange;
    use crate::repo::MemoryRepository;
    use crate::search::fixtures::{id, job};

    fn user(role: UserRole) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "someone@example.com".into(),
            name: "Someone".into(),
            role,
            avatar_url: None,
        }
    }

    fn repo_with_posting(recruiter: &CurrentUser) -> MemoryRepository {
        let mut posting = job(1, "Backend Engineer", "DataWorks", SalaryRange::default());
        posting.recruiter_id = Some(recruiter.id);
        MemoryRepository::with_jobs(vec![posting])
    }

    fn full(job_id: Uuid, cover: Option<&str>) -> SubmitApplication {
        SubmitApplication {
            job_id,
            cover_letter: cover.map(String::from),
            expected_salary: None,
        }
    }

    async fn applied(repo: &MemoryRepository, seeker: &CurrentUser) -> Application {
        submit_application(repo, repo, seeker, full(id(1), None), ApplyFlow::Quick)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_full_flow_requires_cover_letter() {
        let recruiter = user(UserRole::Recruiter);
        let repo = repo_with_posting(&recruiter);
        let seeker = user(UserRole::JobSeeker);

        let err = submit_application(&repo, &repo, &seeker, full(id(1), Some("  ")), ApplyFlow::Full)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidField { field: "coverLetter", .. }));
        assert!(repo.list_for_user(seeker.id).await.unwrap().is_empty());

        let app = submit_application(
            &repo,
            &repo,
            &seeker,
            full(id(1), Some("Dear hiring team")),
            ApplyFlow::Full,
        )
        .await
        .unwrap();
        assert_eq!(app.status, ApplicationStatus::Applied);
        assert_eq!(app.company, "DataWorks");
        assert_eq!(app.position, "Backend Engineer");
        assert_eq!(app.cover_letter.as_deref(), Some("Dear hiring team"));
    }

    #[tokio::test]
    async fn test_quick_apply_needs_only_job_id() {
        let recruiter = user(UserRole::Recruiter);
        let repo = repo_with_posting(&recruiter);
        let seeker = user(UserRole::JobSeeker);
        let app = applied(&repo, &seeker).await;
        assert!(app.cover_letter.is_none());

        let listing = repo.get_job(id(1), Some(seeker.id)).await.unwrap().unwrap();
        assert!(listing.has_applied);
    }

    #[tokio::test]
    async fn test_duplicate_application_conflicts() {
        let recruiter = user(UserRole::Recruiter);
        let repo = repo_with_posting(&recruiter);
        let seeker = user(UserRole::JobSeeker);
        applied(&repo, &seeker).await;

        let err = submit_application(&repo, &repo, &seeker, full(id(1), None), ApplyFlow::Quick)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_unknown_job_and_wrong_role() {
        let recruiter = user(UserRole::Recruiter);
        let repo = repo_with_posting(&recruiter);
        let seeker = user(UserRole::JobSeeker);

        let err = submit_application(&repo, &repo, &seeker, full(id(99), None), ApplyFlow::Quick)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = submit_application(&repo, &repo, &recruiter, full(id(1), None), ApplyFlow::Quick)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn test_negative_expected_salary_is_rejected() {
        let recruiter = user(UserRole::Recruiter);
        let repo = repo_with_posting(&recruiter);
        let seeker = user(UserRole::JobSeeker);
        let request = SubmitApplication {
            expected_salary: Some(-1),
            ..full(id(1), None)
        };
        let err = submit_application(&repo, &repo, &seeker, request, ApplyFlow::Quick)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidField { field: "expectedSalary", .. }));
    }

    #[tokio::test]
    async fn test_status_updates_follow_lifecycle() {
        let recruiter = user(UserRole::Recruiter);
        let repo = repo_with_posting(&recruiter);
        let app = applied(&repo, &user(UserRole::JobSeeker)).await;

        let updated = update_status(&repo, &repo, &recruiter, app.id, ApplicationStatus::Shortlisted)
            .await
            .unwrap();
        assert_eq!(updated.status, ApplicationStatus::Shortlisted);

        let err = update_status(&repo, &repo, &recruiter, app.id, ApplicationStatus::UnderReview)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));

        update_status(&repo, &repo, &recruiter, app.id, ApplicationStatus::Rejected)
            .await
            .unwrap();
        let err = update_status(&repo, &repo, &recruiter, app.id, ApplicationStatus::OfferReceived)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[tokio::test]
    async fn test_only_owning_recruiter_may_update() {
        let recruiter = user(UserRole::Recruiter);
        let repo = repo_with_posting(&recruiter);
        let app = applied(&repo, &user(UserRole::JobSeeker)).await;

        let stranger = user(UserRole::Recruiter);
        let err = update_status(&repo, &repo, &stranger, app.id, ApplicationStatus::Rejected)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));

        let err = update_status(&repo, &repo, &recruiter, Uuid::new_v4(), ApplicationStatus::Rejected)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_interview_scheduled_requires_scheduling_action() {
        let recruiter = user(UserRole::Recruiter);
        let repo = repo_with_posting(&recruiter);
        let app = applied(&repo, &user(UserRole::JobSeeker)).await;
        let err = update_status(
            &repo,
            &repo,
            &recruiter,
            app.id,
            ApplicationStatus::InterviewScheduled,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidField { field: "status", .. }));
    }

    #[tokio::test]
    async fn test_schedule_interview() {
        let recruiter = user(UserRole::Recruiter);
        let repo = repo_with_posting(&recruiter);
        let app = applied(&repo, &user(UserRole::JobSeeker)).await;
        let now = Utc::now();

        let past = ScheduleInterview {
            interview_date: now - Duration::hours(1),
            interview_type: InterviewType::Video,
            notes: None,
        };
        let err = schedule_interview(&repo, &repo, &recruiter, app.id, past, now)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidField { field: "interviewDate", .. }));

        let request = ScheduleInterview {
            interview_date: now + Duration::days(3),
            interview_type: InterviewType::Technical,
            notes: Some(" Bring laptop ".into()),
        };
        let updated = schedule_interview(&repo, &repo, &recruiter, app.id, request.clone(), now)
            .await
            .unwrap();
        assert_eq!(updated.status, ApplicationStatus::InterviewScheduled);
        assert_eq!(updated.interview_type, Some(InterviewType::Technical));
        assert_eq!(updated.notes.as_deref(), Some("Bring laptop"));

        // Rescheduling keeps the status.
        let moved = ScheduleInterview {
            interview_date: now + Duration::days(5),
            ..request
        };
        let updated = schedule_interview(&repo, &repo, &recruiter, app.id, moved, now)
            .await
            .unwrap();
        assert_eq!(updated.interview_date, Some(now + Duration::days(5)));
    }

    #[tokio::test]
    async fn test_cannot_schedule_after_rejection() {
        let recruiter = user(UserRole::Recruiter);
        let repo = repo_with_posting(&recruiter);
        let app = applied(&repo, &user(UserRole::JobSeeker)).await;
        update_status(&repo, &repo, &recruiter, app.id, ApplicationStatus::Rejected)
            .await
            .unwrap();

        let now = Utc::now();
        let request = ScheduleInterview {
            interview_date: now + Duration::days(1),
            interview_type: InterviewType::Phone,
            notes: None,
        };
        let err = schedule_interview(&repo, &repo, &recruiter, app.id, request, now)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }
}
