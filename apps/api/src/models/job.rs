use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Freelance,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
            JobType::Freelance => "freelance",
        }
    }
}

impl FromStr for JobType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "full-time" => JobType::FullTime,
            "part-time" => JobType::PartTime,
            "contract" => JobType::Contract,
            "internship" => JobType::Internship,
            "freelance" => JobType::Freelance,
            other => bail!("unknown job type '{other}'"),
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Lead,
    Executive,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Lead => "lead",
            ExperienceLevel::Executive => "executive",
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "entry" => ExperienceLevel::Entry,
            "mid" => ExperienceLevel::Mid,
            "senior" => ExperienceLevel::Senior,
            "lead" => ExperienceLevel::Lead,
            "executive" => ExperienceLevel::Executive,
            other => bail!("unknown experience level '{other}'"),
        })
    }
}

/// Display priority of a posting on the seeker dashboard.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobPriority {
    #[default]
    Normal,
    High,
    Urgent,
}

impl JobPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobPriority::Normal => "normal",
            JobPriority::High => "high",
            JobPriority::Urgent => "urgent",
        }
    }
}

impl FromStr for JobPriority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "normal" => JobPriority::Normal,
            "high" => JobPriority::High,
            "urgent" => JobPriority::Urgent,
            other => bail!("unknown job priority '{other}'"),
        })
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub logo: Option<String>,
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: u32,
}

/// Salary band. Either bound may be unknown.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SalaryRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl SalaryRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Lower bound with a missing value treated as 0.
    pub fn floor(&self) -> i64 {
        self.min.unwrap_or(0)
    }

    /// Upper bound with a missing value treated as unbounded.
    pub fn ceiling(&self) -> i64 {
        self.max.unwrap_or(i64::MAX)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub id: Uuid,
    pub title: String,
    pub company: Company,
    pub location: String,
    pub is_remote: bool,
    pub salary: SalaryRange,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub description: String,
    pub skills: Vec<String>,
    pub benefits: Vec<String>,
    pub posted_date: DateTime<Utc>,
    pub priority: JobPriority,
    pub ai_match_percentage: Option<u8>,
    /// Per-viewer flags; always false for anonymous viewers.
    pub has_applied: bool,
    pub is_saved: bool,
    pub recruiter_id: Option<Uuid>,
}

/// Payload a recruiter submits to post a job.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    pub company: Company,
    pub location: String,
    #[serde(default)]
    pub is_remote: bool,
    #[serde(default)]
    pub salary: SalaryRange,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub priority: JobPriority,
}

#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub recruiter_id: Option<Uuid>,
    pub title: String,
    pub company_name: String,
    pub company_logo: Option<String>,
    pub company_rating: Option<f64>,
    pub company_review_count: i32,
    pub location: String,
    pub is_remote: bool,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub job_type: String,
    pub experience_level: String,
    pub description: String,
    pub skills: Vec<String>,
    pub benefits: Vec<String>,
    pub posted_date: DateTime<Utc>,
    pub priority: String,
    pub ai_match_percentage: Option<i16>,
    pub has_applied: bool,
    pub is_saved: bool,
}

impl TryFrom<JobRow> for JobListing {
    type Error = anyhow::Error;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        Ok(JobListing {
            id: row.id,
            title: row.title,
            company: Company {
                name: row.company_name,
                logo: row.company_logo,
                rating: row.company_rating,
                review_count: row.company_review_count.max(0) as u32,
            },
            location: row.location,
            is_remote: row.is_remote,
            salary: SalaryRange {
                min: row.salary_min,
                max: row.salary_max,
            },
            job_type: row.job_type.parse()?,
            experience_level: row.experience_level.parse()?,
            description: row.description,
            skills: row.skills,
            benefits: row.benefits,
            posted_date: row.posted_date,
            priority: row.priority.parse()?,
            ai_match_percentage: row.ai_match_percentage.map(|p| p.clamp(0, 100) as u8),
            has_applied: row.has_applied,
            is_saved: row.is_saved,
            recruiter_id: row.recruiter_id,
        })
    }
}
