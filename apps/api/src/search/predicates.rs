use chrono::{DateTime, Utc};

use super::criteria::FilterCriteria;
use super::query::normalize_query;
use super::Searchable;

/// One independent inclusion test. A criteria record builds zero or more of these
/// and an item must pass all of them.
///
/// String payloads are already normalized (trimmed, lowercased).
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    LocationContains(String),
    /// `location = "remote"` is special-cased to this, ignoring location text.
    RemoteOnly,
    CompanyContains(String),
    JobTypeIs(String),
    ExperienceLevelIs(String),
    StatusIs(String),
    /// Item band `[min, max]` must overlap the filter band.
    SalaryOverlaps { min: i64, max: i64 },
    ListedSince(DateTime<Utc>),
}

impl Predicate {
    pub fn test<T: Searchable + ?Sized>(&self, item: &T) -> bool {
        match self {
            Predicate::LocationContains(needle) => item
                .location()
                .is_some_and(|loc| loc.to_lowercase().contains(needle.as_str())),
            Predicate::RemoteOnly => item.is_remote() == Some(true),
            Predicate::CompanyContains(needle) => {
                item.company_name().to_lowercase().contains(needle.as_str())
            }
            Predicate::JobTypeIs(wanted) => equals_folded(item.job_type(), wanted),
            Predicate::ExperienceLevelIs(wanted) => equals_folded(item.experience_level(), wanted),
            Predicate::StatusIs(wanted) => equals_folded(item.status(), wanted),
            Predicate::SalaryOverlaps { min, max } => {
                let band = item.salary();
                band.ceiling() >= *min && band.floor() <= *max
            }
            Predicate::ListedSince(cutoff) => item.listed_at() >= *cutoff,
        }
    }
}

fn equals_folded(value: Option<&str>, wanted: &str) -> bool {
    value.is_some_and(|v| v.to_lowercase() == wanted)
}

/// Translates a criteria record into the predicate set.
/// `now` anchors the date window so the result is deterministic.
pub fn build_predicates(criteria: &FilterCriteria, now: DateTime<Utc>) -> Vec<Predicate> {
    let mut predicates = Vec::new();

    if let Some(location) = normalize_query(criteria.location.as_deref()) {
        if location == "remote" {
            predicates.push(Predicate::RemoteOnly);
        } else {
            predicates.push(Predicate::LocationContains(location));
        }
    }

    if criteria.is_remote == Some(true) && !predicates.contains(&Predicate::RemoteOnly) {
        predicates.push(Predicate::RemoteOnly);
    }

    if let Some(company) = normalize_query(criteria.company.as_deref()) {
        predicates.push(Predicate::CompanyContains(company));
    }

    if let Some(job_type) = normalize_query(criteria.job_type.as_deref()) {
        predicates.push(Predicate::JobTypeIs(job_type));
    }

    if let Some(level) = normalize_query(criteria.experience_level.as_deref()) {
        predicates.push(Predicate::ExperienceLevelIs(level));
    }

    if let Some(status) = normalize_query(criteria.status.as_deref()) {
        predicates.push(Predicate::StatusIs(status));
    }

    if criteria.salary_min.is_some() || criteria.salary_max.is_some() {
        predicates.push(Predicate::SalaryOverlaps {
            min: criteria.salary_min.unwrap_or(0),
            max: criteria.salary_max.unwrap_or(i64::MAX),
        });
    }

    if let Some(range) = criteria.date_range {
        predicates.push(Predicate::ListedSince(range.since(now)));
    }

    predicates
}
