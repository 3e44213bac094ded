use crate::errors::AppError;
use crate::models::job::NewJob;

/// Field checks for a recruiter's new posting. Returns the first failure.
pub fn validate_new_job(job: &NewJob) -> Result<(), AppError> {
    if job.title.trim().is_empty() {
        return Err(AppError::invalid_field("title", "Job title is required"));
    }
    if job.company.name.trim().is_empty() {
        return Err(AppError::invalid_field("company", "Company name is required"));
    }
    if job.location.trim().is_empty() && !job.is_remote {
        return Err(AppError::invalid_field(
            "location",
            "Location is required for on-site roles",
        ));
    }
    if job.description.trim().is_empty() {
        return Err(AppError::invalid_field("description", "Description is required"));
    }
    if [job.salary.min, job.salary.max].into_iter().flatten().any(|s| s < 0) {
        return Err(AppError::invalid_field("salary", "Salary cannot be negative"));
    }
    if let (Some(min), Some(max)) = (job.salary.min, job.salary.max) {
        if min > max {
            return Err(AppError::invalid_field(
                "salary",
                "Minimum salary cannot exceed maximum",
            ));
        }
    }
    if job.company.rating.is_some_and(|r| !(0.0..=5.0).contains(&r)) {
        return Err(AppError::invalid_field("company", "Rating must be between 0 and 5"));
    }
    company_review_count(job)?;
    Ok(())
}

/// Review count as stored in the `jobs.company_review_count` INTEGER column.
pub fn company_review_count(job: &NewJob) -> Result<i32, AppError> {
    i32::try_from(job.company.review_count)
        .map_err(|_| AppError::invalid_field("company", "Review count is too large"))
}
