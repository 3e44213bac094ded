use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::job::{
    Company, ExperienceLevel, JobListing, JobPriority, JobType, SalaryRange,
};

struct SeedJob {
    title: &'static str,
    company: &'static str,
    rating: f64,
    reviews: u32,
    location: &'static str,
    remote: bool,
    salary: (i64, i64),
    job_type: JobType,
    level: ExperienceLevel,
    skills: &'static [&'static str],
    days_ago: i64,
    priority: JobPriority,
    match_pct: u8,
}

const SEED_JOBS: &[SeedJob] = &[
    SeedJob {
        title: "Senior Frontend Developer",
        company: "TechCorp Inc.",
        rating: 4.5,
        reviews: 234,
        location: "San Francisco, CA",
        remote: false,
        salary: (120_000, 160_000),
        job_type: JobType::FullTime,
        level: ExperienceLevel::Senior,
        skills: &["React", "TypeScript", "GraphQL"],
        days_ago: 2,
        priority: JobPriority::High,
        match_pct: 92,
    },
    SeedJob {
        title: "Full Stack Engineer",
        company: "StartupXYZ",
        rating: 4.2,
        reviews: 89,
        location: "Remote",
        remote: true,
        salary: (100_000, 140_000),
        job_type: JobType::FullTime,
        level: ExperienceLevel::Mid,
        skills: &["Node.js", "React", "PostgreSQL"],
        days_ago: 1,
        priority: JobPriority::Normal,
        match_pct: 85,
    },
    SeedJob {
        title: "Junior Web Developer",
        company: "WebAgency",
        rating: 3.9,
        reviews: 41,
        location: "Austin, TX",
        remote: false,
        salary: (80_000, 110_000),
        job_type: JobType::FullTime,
        level: ExperienceLevel::Entry,
        skills: &["HTML", "CSS", "JavaScript"],
        days_ago: 5,
        priority: JobPriority::Normal,
        match_pct: 78,
    },
    SeedJob {
        title: "Staff Platform Engineer",
        company: "CloudScale",
        rating: 4.7,
        reviews: 512,
        location: "Seattle, WA",
        remote: true,
        salary: (130_000, 170_000),
        job_type: JobType::FullTime,
        level: ExperienceLevel::Lead,
        skills: &["Kubernetes", "Go", "Terraform"],
        days_ago: 3,
        priority: JobPriority::Urgent,
        match_pct: 88,
    },
    SeedJob {
        title: "Backend Engineer",
        company: "DataWorks",
        rating: 4.1,
        reviews: 120,
        location: "New York, NY",
        remote: false,
        salary: (110_000, 150_000),
        job_type: JobType::Contract,
        level: ExperienceLevel::Mid,
        skills: &["Rust", "PostgreSQL", "Kafka"],
        days_ago: 7,
        priority: JobPriority::Normal,
        match_pct: 81,
    },
    SeedJob {
        title: "UX Design Intern",
        company: "Creative Studio",
        rating: 4.0,
        reviews: 17,
        location: "Los Angeles, CA",
        remote: false,
        salary: (40_000, 55_000),
        job_type: JobType::Internship,
        level: ExperienceLevel::Entry,
        skills: &["Figma", "User Research"],
        days_ago: 12,
        priority: JobPriority::Normal,
        match_pct: 64,
    },
];

/// Sample postings for the in-memory backend.
pub fn seed_jobs(now: DateTime<Utc>) -> Vec<JobListing> {
    SEED_JOBS
        .iter()
        .map(|seed| JobListing {
            id: Uuid::new_v4(),
            title: seed.title.to_string(),
            company: Company {
                name: seed.company.to_string(),
                logo: None,
                rating: Some(seed.rating),
                review_count: seed.reviews,
            },
            location: seed.location.to_string(),
            is_remote: seed.remote,
            salary: SalaryRange::new(seed.salary.0, seed.salary.1),
            job_type: seed.job_type,
            experience_level: seed.level,
            description: format!(
                "{} is hiring a {}. You will work with {}.",
                seed.company,
                seed.title,
                seed.skills.join(", ")
            ),
            skills: seed.skills.iter().map(|s| s.to_string()).collect(),
            benefits: vec![
                "Health insurance".to_string(),
                "401(k) matching".to_string(),
            ],
            posted_date: now - Duration::days(seed.days_ago),
            priority: seed.priority,
            ai_match_percentage: Some(seed.match_pct),
            has_applied: false,
            is_saved: false,
            recruiter_id: None,
        })
        .collect()
}
