//! Search pipeline shared by the job search and application tracking views.
//!
//! normalize query → build predicates → filter (order-preserving) → sort → paginate.
//! Everything here is pure and synchronous; callers fetch candidates from a
//! repository first.

pub mod criteria;
pub mod pagination;
pub mod pipeline;
pub mod predicates;
pub mod query;
pub mod sort;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::models::application::Application;
use crate::models::job::{JobListing, SalaryRange};

pub use criteria::{DateRange, FilterCriteria};
pub use pagination::{paginate, Page};
pub use pipeline::filter_items;
pub use predicates::build_predicates;
pub use query::normalize_query;
pub use sort::{sort_items, SortDirection, SortKey, SortSpec};

/// Read-only view of a listing the pipeline can filter and sort.
/// Attributes an item type does not have return `None`.
pub trait Searchable {
    fn id(&self) -> Uuid;
    fn title(&self) -> &str;
    fn company_name(&self) -> &str;
    fn listed_at(&self) -> DateTime<Utc>;

    fn description(&self) -> Option<&str> {
        None
    }
    fn skills(&self) -> &[String] {
        &[]
    }
    fn location(&self) -> Option<&str> {
        None
    }
    fn is_remote(&self) -> Option<bool> {
        None
    }
    fn job_type(&self) -> Option<&str> {
        None
    }
    fn experience_level(&self) -> Option<&str> {
        None
    }
    fn status(&self) -> Option<&str> {
        None
    }
    fn salary(&self) -> SalaryRange {
        SalaryRange::default()
    }
    fn match_percentage(&self) -> Option<u8> {
        None
    }
}

impl Searchable for JobListing {
    fn id(&self) -> Uuid {
        self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn company_name(&self) -> &str {
        &self.company.name
    }
    fn listed_at(&self) -> DateTime<Utc> {
        self.posted_date
    }
    fn description(&self) -> Option<&str> {
        Some(&self.description)
    }
    fn skills(&self) -> &[String] {
        &self.skills
    }
    fn location(&self) -> Option<&str> {
        Some(&self.location)
    }
    fn is_remote(&self) -> Option<bool> {
        Some(self.is_remote)
    }
    fn job_type(&self) -> Option<&str> {
        Some(self.job_type.as_str())
    }
    fn experience_level(&self) -> Option<&str> {
        Some(self.experience_level.as_str())
    }
    fn salary(&self) -> SalaryRange {
        self.salary
    }
    fn match_percentage(&self) -> Option<u8> {
        self.ai_match_percentage
    }
}

impl Searchable for Application {
    fn id(&self) -> Uuid {
        self.id
    }
    fn title(&self) -> &str {
        &self.position
    }
    fn company_name(&self) -> &str {
        &self.company
    }
    fn listed_at(&self) -> DateTime<Utc> {
        self.applied_date
    }
    fn description(&self) -> Option<&str> {
        self.notes.as_deref()
    }
    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
    fn salary(&self) -> SalaryRange {
        SalaryRange {
            min: self.expected_salary,
            max: self.expected_salary,
        }
    }
}

/// Query-string form of a search request.
/// Kept flat because urlencoded query parsing cannot type-convert flattened fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchParams {
    pub search: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub is_remote: Option<bool>,
    pub status: Option<String>,
    pub date_range: Option<DateRange>,
    pub company: Option<String>,
    pub sort: Option<SortKey>,
    pub direction: Option<SortDirection>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl SearchParams {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            location: self.location.clone(),
            job_type: self.job_type.clone(),
            experience_level: self.experience_level.clone(),
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            is_remote: self.is_remote,
            status: self.status.clone(),
            date_range: self.date_range,
            company: self.company.clone(),
            search: self.search.clone(),
        }
    }

    pub fn sort_spec(&self) -> SortSpec {
        let spec = SortSpec::from(self.sort.unwrap_or_default());
        match self.direction {
            Some(direction) => spec.with_direction(direction),
            None => spec,
        }
    }
}

/// Runs the full filter + sort pipeline. The input slice is never mutated.
pub fn search<T: Searchable + Clone>(
    items: &[T],
    criteria: &FilterCriteria,
    sort: SortSpec,
    now: DateTime<Utc>,
) -> Vec<T> {
    if criteria.is_empty() {
        let mut results = items.to_vec();
        sort_items(&mut results, sort);
        return results;
    }

    let query = normalize_query(criteria.search.as_deref());
    let predicates = build_predicates(criteria, now);
    let mut results = filter_items(items, query.as_deref(), &predicates);
    sort_items(&mut results, sort);
    results
}
