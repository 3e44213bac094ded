//! Dashboard quick actions.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::profile::UserRole;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum QuickAction {
    SearchJobs,
    UploadResume,
    ViewApplications,
    UpdateProfile,
    PostJob,
    ReviewApplications,
    ScheduleInterviews,
    ViewAnalytics,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActionTarget {
    #[serde(flatten)]
    pub action: QuickAction,
    pub navigate_to: &'static str,
}

const SEEKER_ACTIONS: [QuickAction; 4] = [
    QuickAction::SearchJobs,
    QuickAction::UploadResume,
    QuickAction::ViewApplications,
    QuickAction::UpdateProfile,
];

const RECRUITER_ACTIONS: [QuickAction; 5] = [
    QuickAction::PostJob,
    QuickAction::ReviewApplications,
    QuickAction::ScheduleInterviews,
    QuickAction::ViewAnalytics,
    QuickAction::UpdateProfile,
];

impl QuickAction {
    /// Actions shown on the dashboard for `role`, in display order.
    pub fn for_role(role: UserRole) -> &'static [QuickAction] {
        match role {
            UserRole::JobSeeker => &SEEKER_ACTIONS,
            UserRole::Recruiter => &RECRUITER_ACTIONS,
        }
    }

    fn target(&self) -> (Option<UserRole>, &'static str) {
        match self {
            QuickAction::SearchJobs => (Some(UserRole::JobSeeker), "/jobs"),
            QuickAction::UploadResume => (Some(UserRole::JobSeeker), "/documents?type=resume"),
            QuickAction::ViewApplications => (Some(UserRole::JobSeeker), "/applications"),
            QuickAction::UpdateProfile => (None, "/profile"),
            QuickAction::PostJob => (Some(UserRole::Recruiter), "/recruiter/jobs/new"),
            QuickAction::ReviewApplications => (Some(UserRole::Recruiter), "/recruiter/applications"),
            QuickAction::ScheduleInterviews => (Some(UserRole::Recruiter), "/recruiter/interviews"),
            QuickAction::ViewAnalytics => (Some(UserRole::Recruiter), "/recruiter/analytics"),
        }
    }

    pub fn resolve(self, role: UserRole) -> Result<ActionTarget, AppError> {
        let (required, navigate_to) = self.target();
        if required.is_some_and(|r| r != role) {
            return Err(AppError::Forbidden);
        }
        Ok(ActionTarget {
            action: self,
            navigate_to,
        })
    }
}
