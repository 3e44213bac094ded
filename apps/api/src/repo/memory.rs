use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ApplicationRepository, DocumentRepository, JobRepository, ProfileRepository};
use crate::errors::AppError;
use crate::models::application::{
    Application, ApplicationStatus, InterviewSchedule, NewApplication,
};
use crate::models::document::{Document, NewDocument};
use crate::models::job::{JobListing, NewJob};
use crate::models::profile::Profile;

#[derive(Default)]
struct MemoryData {
    jobs: Vec<JobListing>,
    saved: HashSet<(Uuid, Uuid)>,
    applications: Vec<Application>,
    documents: Vec<Document>,
    profiles: HashMap<Uuid, Profile>,
}

impl MemoryData {
    /// Copies a stored listing with the viewer's flags filled in.
    fn view(&self, job: &JobListing, viewer: Option<Uuid>) -> JobListing {
        let mut listing = job.clone();
        listing.has_applied = viewer.is_some_and(|user| {
            self.applications
                .iter()
                .any(|a| a.user_id == user && a.job_id == job.id)
        });
        listing.is_saved = viewer.is_some_and(|user| self.saved.contains(&(user, job.id)));
        listing
    }

    fn application_mut(&mut self, id: Uuid) -> Result<&mut Application, AppError> {
        self.applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
    }
}

/// Process-local store used by `DATA_BACKEND=memory` and by tests.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    data: Arc<RwLock<MemoryData>>,
}

impl MemoryRepository {
    pub fn with_jobs(jobs: Vec<JobListing>) -> Self {
        let data = MemoryData {
            jobs,
            ..Default::default()
        };
        Self {
            data: Arc::new(RwLock::new(data)),
        }
    }
}

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> chrono::DateTime<Utc>) {
    items.sort_by_key(|item| std::cmp::Reverse(key(item)));
}

#[async_trait]
impl JobRepository for MemoryRepository {
    async fn list_jobs(&self, viewer: Option<Uuid>) -> Result<Vec<JobListing>, AppError> {
        let data = self.data.read().await;
        let mut jobs: Vec<_> = data.jobs.iter().map(|j| data.view(j, viewer)).collect();
        newest_first(&mut jobs, |j| j.posted_date);
        Ok(jobs)
    }

    async fn get_job(
        &self,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Option<JobListing>, AppError> {
        let data = self.data.read().await;
        Ok(data
            .jobs
            .iter()
            .find(|j| j.id == id)
            .map(|j| data.view(j, viewer)))
    }

    async fn create_job(&self, recruiter_id: Uuid, job: NewJob) -> Result<JobListing, AppError> {
        let listing = JobListing {
            id: Uuid::new_v4(),
            title: job.title,
            company: job.company,
            location: job.location,
            is_remote: job.is_remote,
            salary: job.salary,
            job_type: job.job_type,
            experience_level: job.experience_level,
            description: job.description,
            skills: job.skills,
            benefits: job.benefits,
            posted_date: Utc::now(),
            priority: job.priority,
            ai_match_percentage: None,
            has_applied: false,
            is_saved: false,
            recruiter_id: Some(recruiter_id),
        };
        self.data.write().await.jobs.push(listing.clone());
        Ok(listing)
    }

    async fn set_saved(&self, user_id: Uuid, job_id: Uuid, saved: bool) -> Result<(), AppError> {
        let mut data = self.data.write().await;
        if saved {
            data.saved.insert((user_id, job_id));
        } else {
            data.saved.remove(&(user_id, job_id));
        }
        Ok(())
    }
}

#[async_trait]
impl ApplicationRepository for MemoryRepository {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Application>, AppError> {
        let data = self.data.read().await;
        let mut apps: Vec<_> = data
            .applications
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut apps, |a| a.applied_date);
        Ok(apps)
    }

    async fn list_for_recruiter(&self, recruiter_id: Uuid) -> Result<Vec<Application>, AppError> {
        let data = self.data.read().await;
        let owned: HashSet<Uuid> = data
            .jobs
            .iter()
            .filter(|j| j.recruiter_id == Some(recruiter_id))
            .map(|j| j.id)
            .collect();
        let mut apps: Vec<_> = data
            .applications
            .iter()
            .filter(|a| owned.contains(&a.job_id))
            .cloned()
            .collect();
        newest_first(&mut apps, |a| a.applied_date);
        Ok(apps)
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>, AppError> {
        let data = self.data.read().await;
        Ok(data.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn find_for_job(
        &self,
        user_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Application>, AppError> {
        let data = self.data.read().await;
        Ok(data
            .applications
            .iter()
            .find(|a| a.user_id == user_id && a.job_id == job_id)
            .cloned())
    }

    async fn insert_application(&self, new: NewApplication) -> Result<Application, AppError> {
        let mut data = self.data.write().await;
        if data
            .applications
            .iter()
            .any(|a| a.user_id == new.user_id && a.job_id == new.job_id)
        {
            return Err(AppError::Conflict(
                "You have already applied to this job".to_string(),
            ));
        }
        let application = Application {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            job_id: new.job_id,
            company: new.company,
            position: new.position,
            applied_date: Utc::now(),
            status: ApplicationStatus::Applied,
            interview_date: None,
            interview_type: None,
            notes: None,
            expected_salary: new.expected_salary,
            cover_letter: new.cover_letter,
        };
        data.applications.push(application.clone());
        Ok(application)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, AppError> {
        let mut data = self.data.write().await;
        let application = data.application_mut(id)?;
        application.status = status;
        Ok(application.clone())
    }

    async fn schedule_interview(
        &self,
        id: Uuid,
        schedule: &InterviewSchedule,
    ) -> Result<Application, AppError> {
        let mut data = self.data.write().await;
        let application = data.application_mut(id)?;
        application.status = ApplicationStatus::InterviewScheduled;
        application.interview_date = Some(schedule.date);
        application.interview_type = Some(schedule.interview_type);
        application.notes = schedule.notes.clone();
        Ok(application.clone())
    }
}

#[async_trait]
impl DocumentRepository for MemoryRepository {
    async fn list_documents(&self, user_id: Uuid) -> Result<Vec<Document>, AppError> {
        let data = self.data.read().await;
        let mut docs: Vec<_> = data
            .documents
            .iter()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut docs, |d| d.upload_date);
        Ok(docs)
    }

    async fn get_document(&self, id: Uuid, user_id: Uuid) -> Result<Option<Document>, AppError> {
        let data = self.data.read().await;
        Ok(data
            .documents
            .iter()
            .find(|d| d.id == id && d.user_id == user_id)
            .cloned())
    }

    async fn insert_document(&self, new: NewDocument) -> Result<Document, AppError> {
        let document = Document {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            name: new.name,
            doc_type: new.doc_type,
            size: new.size,
            upload_date: Utc::now(),
            storage_path: new.storage_path,
            application_id: new.application_id,
        };
        self.data.write().await.documents.push(document.clone());
        Ok(document)
    }

    async fn delete_document(&self, id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let mut data = self.data.write().await;
        let before = data.documents.len();
        data.documents
            .retain(|d| !(d.id == id && d.user_id == user_id));
        Ok(data.documents.len() < before)
    }
}

#[async_trait]
impl ProfileRepository for MemoryRepository {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        Ok(self.data.read().await.profiles.get(&id).cloned())
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile, AppError> {
        self.data
            .write()
            .await
            .profiles
            .insert(profile.id, profile.clone());
        Ok(profile.clone())
    }
}
