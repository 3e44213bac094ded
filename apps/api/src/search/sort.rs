use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::Searchable;

/// Sort options offered by the listing views.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// As-provided order. Not a computed relevance score.
    #[default]
    Relevance,
    Date,
    SalaryHigh,
    SalaryLow,
    Company,
    Match,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Relevance,
    Date,
    SalaryMax,
    SalaryMin,
    Company,
    Match,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// The single active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        SortKey::Relevance.into()
    }
}

impl SortSpec {
    pub fn with_direction(self, direction: SortDirection) -> Self {
        Self { direction, ..self }
    }
}

impl From<SortKey> for SortSpec {
    fn from(key: SortKey) -> Self {
        let (field, direction) = match key {
            SortKey::Relevance => (SortField::Relevance, SortDirection::Asc),
            SortKey::Date => (SortField::Date, SortDirection::Desc),
            SortKey::SalaryHigh => (SortField::SalaryMax, SortDirection::Desc),
            SortKey::SalaryLow => (SortField::SalaryMin, SortDirection::Asc),
            SortKey::Company => (SortField::Company, SortDirection::Asc),
            SortKey::Match => (SortField::Match, SortDirection::Desc),
        };
        SortSpec { field, direction }
    }
}

pub type Comparator<T> = fn(&T, &T) -> Ordering;

/// Ascending comparator for a field. `None` for relevance, which keeps input order.
/// Missing salary and match values compare as 0.
pub fn comparator<T: Searchable>(field: SortField) -> Option<Comparator<T>> {
    match field {
        SortField::Relevance => None,
        SortField::Date => Some(by_date::<T> as Comparator<T>),
        SortField::SalaryMax => Some(by_salary_max::<T> as Comparator<T>),
        SortField::SalaryMin => Some(by_salary_min::<T> as Comparator<T>),
        SortField::Company => Some(by_company::<T> as Comparator<T>),
        SortField::Match => Some(by_match::<T> as Comparator<T>),
    }
}

fn by_date<T: Searchable>(a: &T, b: &T) -> Ordering {
    a.listed_at().cmp(&b.listed_at())
}

fn by_salary_max<T: Searchable>(a: &T, b: &T) -> Ordering {
    a.salary().max.unwrap_or(0).cmp(&b.salary().max.unwrap_or(0))
}

fn by_salary_min<T: Searchable>(a: &T, b: &T) -> Ordering {
    a.salary().min.unwrap_or(0).cmp(&b.salary().min.unwrap_or(0))
}

fn by_company<T: Searchable>(a: &T, b: &T) -> Ordering {
    a.company_name()
        .to_lowercase()
        .cmp(&b.company_name().to_lowercase())
}

fn by_match<T: Searchable>(a: &T, b: &T) -> Ordering {
    a.match_percentage()
        .unwrap_or(0)
        .cmp(&b.match_percentage().unwrap_or(0))
}

/// Sorts in place. Equal keys are ordered by ascending id, whatever the direction.
pub fn sort_items<T: Searchable>(items: &mut [T], spec: SortSpec) {
    let Some(cmp) = comparator::<T>(spec.field) else {
        return;
    };
    items.sort_by(|a, b| {
        let primary = match spec.direction {
            SortDirection::Asc => cmp(a, b),
            SortDirection::Desc => cmp(b, a),
        };
        primary.then_with(|| a.id().cmp(&b.id()))
    });
}
