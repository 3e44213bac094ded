//! Repository interfaces over the remote data store.
//!
//! Handlers and services only see these traits; `AppState` carries them as
//! `Arc<dyn …>` so the Postgres backend and the seeded in-memory backend are
//! interchangeable.

pub mod memory;
pub mod postgres;
pub mod seed;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{
    Application, ApplicationStatus, InterviewSchedule, NewApplication,
};
use crate::models::document::{Document, NewDocument};
use crate::models::job::{JobListing, NewJob};
use crate::models::profile::Profile;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

#[async_trait]
pub trait JobRepository: Send + Sync {
    /// All postings, newest first, with `has_applied` / `is_saved` set for `viewer`.
    async fn list_jobs(&self, viewer: Option<Uuid>) -> Result<Vec<JobListing>, AppError>;

    async fn get_job(&self, id: Uuid, viewer: Option<Uuid>)
        -> Result<Option<JobListing>, AppError>;

    async fn create_job(&self, recruiter_id: Uuid, job: NewJob) -> Result<JobListing, AppError>;

    async fn set_saved(&self, user_id: Uuid, job_id: Uuid, saved: bool) -> Result<(), AppError>;
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// A seeker's own applications, most recent first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Application>, AppError>;

    /// Applications to any posting owned by the recruiter, most recent first.
    async fn list_for_recruiter(&self, recruiter_id: Uuid) -> Result<Vec<Application>, AppError>;

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>, AppError>;

    async fn find_for_job(
        &self,
        user_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Application>, AppError>;

    async fn insert_application(&self, new: NewApplication) -> Result<Application, AppError>;

    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, AppError>;

    /// Records the interview and moves the application to `interview-scheduled`.
    async fn schedule_interview(
        &self,
        id: Uuid,
        schedule: &InterviewSchedule,
    ) -> Result<Application, AppError>;
}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn list_documents(&self, user_id: Uuid) -> Result<Vec<Document>, AppError>;

    async fn get_document(&self, id: Uuid, user_id: Uuid) -> Result<Option<Document>, AppError>;

    async fn insert_document(&self, new: NewDocument) -> Result<Document, AppError>;

    /// Returns false when no row owned by `user_id` matched.
    async fn delete_document(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError>;

    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile, AppError>;
}

/// The full set of repositories injected into `AppState`.
#[derive(Clone)]
pub struct Repositories {
    pub jobs: Arc<dyn JobRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub documents: Arc<dyn DocumentRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        let repo = Arc::new(PgRepository::new(pool));
        Self {
            jobs: repo.clone(),
            applications: repo.clone(),
            documents: repo.clone(),
            profiles: repo,
        }
    }

    pub fn memory(repo: MemoryRepository) -> Self {
        let repo = Arc::new(repo);
        Self {
            jobs: repo.clone(),
            applications: repo.clone(),
            documents: repo.clone(),
            profiles: repo,
        }
    }
}
