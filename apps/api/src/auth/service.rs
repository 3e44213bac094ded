//! Sign-up / sign-in bookkeeping on our side of the hosted auth service:
//! form validation, mirroring the user into `profiles`, and opening a session.

use serde::Serialize;
use tracing::info;

use crate::auth_client::AuthUser;
use crate::errors::AppError;
use crate::models::profile::{Profile, UserRole};
use crate::repo::ProfileRepository;
use crate::session::{new_session_token, redirect_target, CurrentUser, SessionStore};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Returned by every flow that signs a user in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionGrant {
    pub token: String,
    pub user: CurrentUser,
    pub redirect_to: &'static str,
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        });
    if valid && !email.chars().any(char::is_whitespace) {
        Ok(())
    } else {
        Err(AppError::invalid_field("email", "Enter a valid email address"))
    }
}

pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: Option<&str>,
) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::invalid_field("name", "Name is required"));
    }
    validate_email(email)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid_field(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    if confirm_password.is_some_and(|c| c != password) {
        return Err(AppError::invalid_field("confirmPassword", "Passwords do not match"));
    }
    Ok(())
}

/// Mirrors the auth user into `profiles` and stores a fresh session.
///
/// Role precedence: auth metadata, then the existing profile, then `requested_role`.
/// Same for the display name, falling back to the email's local part.
pub async fn open_session(
    profiles: &dyn ProfileRepository,
    sessions: &dyn SessionStore,
    auth_user: AuthUser,
    requested_role: Option<UserRole>,
) -> Result<SessionGrant, AppError> {
    let existing = profiles.get_profile(auth_user.id).await?;

    let role = auth_user
        .role
        .or(existing.as_ref().map(|p| p.user_role))
        .or(requested_role)
        .unwrap_or_default();
    let name = auth_user
        .name
        .filter(|n| !n.trim().is_empty())
        .or_else(|| existing.as_ref().map(|p| p.name.clone()))
        .unwrap_or_else(|| {
            auth_user
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string()
        });
    let avatar_url = auth_user
        .avatar_url
        .or_else(|| existing.as_ref().and_then(|p| p.avatar_url.clone()));

    let profile = profiles
        .upsert_profile(&Profile {
            id: auth_user.id,
            email: auth_user.email,
            name,
            user_role: role,
            avatar_url,
        })
        .await?;

    let user = CurrentUser::from(&profile);
    let token = new_session_token();
    sessions.save(&token, &user).await?;
    info!("Session opened for {} ({})", user.id, user.role);

    Ok(SessionGrant {
        token,
        redirect_to: redirect_target(Some(&user)),
        user,
    })
}
