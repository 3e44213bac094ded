use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{ApplicationRepository, DocumentRepository, JobRepository, ProfileRepository};
use crate::errors::AppError;
use crate::jobs::validation::company_review_count;
use crate::models::application::{
    Application, ApplicationRow, ApplicationStatus, InterviewSchedule, NewApplication,
};
use crate::models::document::{Document, DocumentRow, NewDocument};
use crate::models::job::{JobListing, JobRow, NewJob};
use crate::models::profile::{Profile, ProfileRow};

/// Per-viewer flags are computed in SQL; a NULL viewer makes both EXISTS false.
const JOB_SELECT: &str = r#"
    SELECT j.*,
        EXISTS (SELECT 1 FROM applications a WHERE a.job_id = j.id AND a.user_id = $1) AS has_applied,
        EXISTS (SELECT 1 FROM saved_jobs s WHERE s.job_id = j.id AND s.user_id = $1) AS is_saved
    FROM jobs j
"#;

/// sqlx-backed implementation of every repository trait.
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_models<R, M>(rows: Vec<R>) -> Result<Vec<M>, AppError>
where
    M: TryFrom<R, Error = anyhow::Error>,
{
    Ok(rows
        .into_iter()
        .map(M::try_from)
        .collect::<anyhow::Result<Vec<M>>>()?)
}

#[async_trait]
impl JobRepository for PgRepository {
    async fn list_jobs(&self, viewer: Option<Uuid>) -> Result<Vec<JobListing>, AppError> {
        let rows: Vec<JobRow> =
            sqlx::query_as(&format!("{JOB_SELECT} ORDER BY j.posted_date DESC"))
                .bind(viewer)
                .fetch_all(&self.pool)
                .await?;
        into_models(rows)
    }

    async fn get_job(
        &self,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Option<JobListing>, AppError> {
        let row: Option<JobRow> = sqlx::query_as(&format!("{JOB_SELECT} WHERE j.id = $2"))
            .bind(viewer)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(JobListing::try_from).transpose()?)
    }

    async fn create_job(&self, recruiter_id: Uuid, job: NewJob) -> Result<JobListing, AppError> {
        let review_count = company_review_count(&job)?;
        let row: JobRow = sqlx::query_as(
            r#"
            INSERT INTO jobs
                (id, recruiter_id, title, company_name, company_logo, company_rating,
                 company_review_count, location, is_remote, salary_min, salary_max,
                 job_type, experience_level, description, skills, benefits, priority)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *, FALSE AS has_applied, FALSE AS is_saved
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(recruiter_id)
        .bind(&job.title)
        .bind(&job.company.name)
        .bind(&job.company.logo)
        .bind(job.company.rating)
        .bind(review_count)
        .bind(&job.location)
        .bind(job.is_remote)
        .bind(job.salary.min)
        .bind(job.salary.max)
        .bind(job.job_type.as_str())
        .bind(job.experience_level.as_str())
        .bind(&job.description)
        .bind(&job.skills)
        .bind(&job.benefits)
        .bind(job.priority.as_str())
        .fetch_one(&self.pool)
        .await?;

        info!("Recruiter {recruiter_id} posted job {}", row.id);
        Ok(JobListing::try_from(row)?)
    }

    async fn set_saved(&self, user_id: Uuid, job_id: Uuid, saved: bool) -> Result<(), AppError> {
        if saved {
            sqlx::query(
                "INSERT INTO saved_jobs (user_id, job_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(user_id)
            .bind(job_id)
            .execute(&self.pool)
            .await?;
        } else {
            sqlx::query("DELETE FROM saved_jobs WHERE user_id = $1 AND job_id = $2")
                .bind(user_id)
                .bind(job_id)
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ApplicationRepository for PgRepository {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Application>, AppError> {
        let rows: Vec<ApplicationRow> = sqlx::query_as(
            "SELECT * FROM applications WHERE user_id = $1 ORDER BY applied_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        into_models(rows)
    }

    async fn list_for_recruiter(&self, recruiter_id: Uuid) -> Result<Vec<Application>, AppError> {
        let rows: Vec<ApplicationRow> = sqlx::query_as(
            r#"
            SELECT a.*
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            WHERE j.recruiter_id = $1
            ORDER BY a.applied_date DESC
            "#,
        )
        .bind(recruiter_id)
        .fetch_all(&self.pool)
        .await?;
        into_models(rows)
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>, AppError> {
        let row: Option<ApplicationRow> =
            sqlx::query_as("SELECT * FROM applications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Application::try_from).transpose()?)
    }

    async fn find_for_job(
        &self,
        user_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Application>, AppError> {
        let row: Option<ApplicationRow> =
            sqlx::query_as("SELECT * FROM applications WHERE user_id = $1 AND job_id = $2")
                .bind(user_id)
                .bind(job_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Application::try_from).transpose()?)
    }

    async fn insert_application(&self, new: NewApplication) -> Result<Application, AppError> {
        let row: ApplicationRow = sqlx::query_as(
            r#"
            INSERT INTO applications
                (id, user_id, job_id, company, position, status, expected_salary, cover_letter)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(new.job_id)
        .bind(&new.company)
        .bind(&new.position)
        .bind(ApplicationStatus::Applied.as_str())
        .bind(new.expected_salary)
        .bind(&new.cover_letter)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "You have already applied to this job"))?;
        Ok(Application::try_from(row)?)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, AppError> {
        let row: Option<ApplicationRow> =
            sqlx::query_as("UPDATE applications SET status = $2 WHERE id = $1 RETURNING *")
                .bind(id)
                .bind(status.as_str())
                .fetch_optional(&self.pool)
                .await?;
        let row = row.ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;
        Ok(Application::try_from(row)?)
    }

    async fn schedule_interview(
        &self,
        id: Uuid,
        schedule: &InterviewSchedule,
    ) -> Result<Application, AppError> {
        let row: Option<ApplicationRow> = sqlx::query_as(
            r#"
            UPDATE applications
            SET status = $2, interview_date = $3, interview_type = $4, interview_notes = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(ApplicationStatus::InterviewScheduled.as_str())
        .bind(schedule.date)
        .bind(schedule.interview_type.as_str())
        .bind(&schedule.notes)
        .fetch_optional(&self.pool)
        .await?;
        let row = row.ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;
        Ok(Application::try_from(row)?)
    }
}

#[async_trait]
impl DocumentRepository for PgRepository {
    async fn list_documents(&self, user_id: Uuid) -> Result<Vec<Document>, AppError> {
        let rows: Vec<DocumentRow> = sqlx::query_as(
            "SELECT * FROM documents WHERE user_id = $1 ORDER BY upload_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        into_models(rows)
    }

    async fn get_document(&self, id: Uuid, user_id: Uuid) -> Result<Option<Document>, AppError> {
        let row: Option<DocumentRow> =
            sqlx::query_as("SELECT * FROM documents WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Document::try_from).transpose()?)
    }

    async fn insert_document(&self, new: NewDocument) -> Result<Document, AppError> {
        let row: DocumentRow = sqlx::query_as(
            r#"
            INSERT INTO documents
                (id, user_id, name, type, size, storage_path, application_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(&new.name)
        .bind(new.doc_type.as_str())
        .bind(new.size)
        .bind(&new.storage_path)
        .bind(new.application_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(Document::try_from(row)?)
    }

    async fn delete_document(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ProfileRepository for PgRepository {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        let row: Option<ProfileRow> = sqlx::query_as("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Profile::try_from).transpose()?)
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile, AppError> {
        let row: ProfileRow = sqlx::query_as(
            r#"
            INSERT INTO profiles (id, email, name, user_role, avatar_url)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET email = EXCLUDED.email,
                name = EXCLUDED.name,
                user_role = EXCLUDED.user_role,
                avatar_url = EXCLUDED.avatar_url
            RETURNING *
            "#,
        )
        .bind(profile.id)
        .bind(&profile.email)
        .bind(&profile.name)
        .bind(profile.user_role.as_str())
        .bind(&profile.avatar_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(Profile::try_from(row)?)
    }
}
