use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Posting/application age window, ending at "now".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DateRange {
    #[serde(rename = "24h")]
    LastDay,
    #[serde(rename = "7d")]
    LastWeek,
    #[serde(rename = "30d")]
    LastMonth,
    #[serde(rename = "90d")]
    LastQuarter,
}

impl DateRange {
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let window = match self {
            DateRange::LastDay => Duration::hours(24),
            DateRange::LastWeek => Duration::days(7),
            DateRange::LastMonth => Duration::days(30),
            DateRange::LastQuarter => Duration::days(90),
        };
        now - window
    }
}

/// Open record of optional filters. A `None` field imposes no constraint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub is_remote: Option<bool>,
    pub status: Option<String>,
    pub date_range: Option<DateRange>,
    pub company: Option<String>,
    pub search: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        *self == FilterCriteria::default()
    }
}
