//! Onboarding wizard: three ordered steps with server-side validation.

use std::collections::HashSet;

use artilink_common::{AppError, AppResult};
use artilink_db::{
    entities::{user, user_profile, user_profile::PortfolioTemplate},
    repositories::{UserProfileRepository, UserRepository},
};
use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::validate_not_blank;

/// Number of steps in the wizard.
pub const ONBOARDING_STEPS: i16 = 3;

/// Profile step payload.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStep {
    #[validate(length(min = 1, max = 50), custom(function = "validate_not_blank"))]
    pub display_name: String,

    #[validate(length(max = 500))]
    pub bio: Option<String>,
}

/// Disciplines step payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DisciplinesStep {
    #[validate(length(min = 1, max = 5), custom(function = "validate_disciplines"))]
    pub disciplines: Vec<String>,
}

/// Portfolio step payload.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PortfolioStep {
    pub template: PortfolioTemplate,
}

/// One submitted wizard step, tagged by `step`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "step", rename_all = "lowercase")]
pub enum OnboardingStep {
    Profile(ProfileStep),
    Disciplines(DisciplinesStep),
    Portfolio(PortfolioStep),
}

impl OnboardingStep {
    /// 1-based position of this step in the wizard.
    #[must_use]
    pub const fn position(&self) -> i16 {
        match self {
            Self::Profile(_) => 1,
            Self::Disciplines(_) => 2,
            Self::Portfolio(_) => 3,
        }
    }

    fn validate(&self) -> AppResult<()> {
        match self {
            Self::Profile(step) => step.validate()?,
            Self::Disciplines(step) => step.validate()?,
            // Unknown templates are rejected while deserializing
            Self::Portfolio(_) => {}
        }
        Ok(())
    }
}

/// Progress after a step was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingProgress {
    pub completed_steps: i16,
    pub onboarded: bool,
}

fn validate_disciplines(disciplines: &[String]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for discipline in disciplines {
        let trimmed = discipline.trim();
        let len = trimmed.chars().count();
        if len == 0 || len > 32 {
            return Err(ValidationError::new("discipline_length"));
        }
        if !seen.insert(trimmed.to_lowercase()) {
            return Err(ValidationError::new("discipline_duplicate"));
        }
    }
    Ok(())
}

/// Onboarding service.
#[derive(Clone)]
pub struct OnboardingService {
    user_repo: UserRepository,
    profile_repo: UserProfileRepository,
}

impl OnboardingService {
    /// Create a new onboarding service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, profile_repo: UserProfileRepository) -> Self {
        Self {
            user_repo,
            profile_repo,
        }
    }

    /// Validate and store one step.
    ///
    /// A step is accepted once every earlier step is complete. Re-submitting a
    /// finished step overwrites its data and leaves progress where it was.
    #[tracing::instrument(skip(self, step), fields(step = step.position()))]
    pub async fn submit(&self, user_id: &str, step: OnboardingStep) -> AppResult<OnboardingProgress> {
        step.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;
        let position = step.position();
        if position > user.onboarding_step + 1 {
            return Err(AppError::invalid_field(
                "step",
                "out_of_order",
                "complete the previous onboarding steps first",
            ));
        }

        let profile = self.profile_repo.get_by_user_id(user_id).await?;
        let mut profile_active: user_profile::ActiveModel = profile.into();
        let mut display_name = None;

        match step {
            OnboardingStep::Profile(step) => {
                display_name = Some(step.display_name.trim().to_string());
                profile_active.bio = Set(step.bio.filter(|b| !b.trim().is_empty()));
            }
            OnboardingStep::Disciplines(step) => {
                let disciplines: Vec<String> = step
                    .disciplines
                    .iter()
                    .map(|d| d.trim().to_string())
                    .collect();
                profile_active.disciplines = Set(serde_json::json!(disciplines));
            }
            OnboardingStep::Portfolio(step) => {
                profile_active.portfolio_template = Set(Some(step.template));
            }
        }
        profile_active.updated_at = Set(Some(Utc::now().into()));

        let completed_steps = user.onboarding_step.max(position);
        let onboarded = completed_steps >= ONBOARDING_STEPS;

        let mut user_active: user::ActiveModel = user.into();
        if let Some(name) = display_name {
            user_active.name = Set(Some(name));
        }
        user_active.onboarding_step = Set(completed_steps);
        user_active.is_onboarded = Set(onboarded);
        user_active.updated_at = Set(Some(Utc::now().into()));
        self.profile_repo
            .update_with_user(profile_active, user_active)
            .await?;

        tracing::debug!(completed_steps, onboarded, "Onboarding step stored");
        Ok(OnboardingProgress {
            completed_steps,
            onboarded,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;
    use std::sync::Arc;

    fn create_test_user(step: i16) -> user::Model {
        user::Model {
            id: "user1".to_string(),
            username: "painter".to_string(),
            username_lower: "painter".to_string(),
            token: Some("test_token".to_string()),
            name: None,
            followers_count: 0,
            following_count: 0,
            posts_count: 0,
            onboarding_step: step,
            is_onboarded: step >= ONBOARDING_STEPS,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_profile() -> user_profile::Model {
        user_profile::Model {
            user_id: "user1".to_string(),
            password: None,
            bio: None,
            disciplines: json!([]),
            portfolio_template: None,
            updated_at: None,
        }
    }

    fn service(db: MockDatabase) -> OnboardingService {
        let db = Arc::new(db.into_connection());
        OnboardingService::new(
            UserRepository::new(db.clone()),
            UserProfileRepository::new(db),
        )
    }

    fn parse(value: serde_json::Value) -> OnboardingStep {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_step_tagging() {
        let step = parse(json!({ "step": "portfolio", "template": "grid" }));
        assert_eq!(step.position(), 3);
        assert!(
            serde_json::from_value::<OnboardingStep>(json!({
                "step": "portfolio",
                "template": "collage"
            }))
            .is_err()
        );
    }

    #[test]
    fn test_disciplines_rules() {
        let ok = parse(json!({ "step": "disciplines", "disciplines": ["Oil", "Ink"] }));
        assert!(ok.validate().is_ok());

        let dupes = parse(json!({ "step": "disciplines", "disciplines": ["Oil", "oil "] }));
        assert!(dupes.validate().is_err());

        let empty = parse(json!({ "step": "disciplines", "disciplines": [] }));
        assert!(empty.validate().is_err());

        let too_many = parse(json!({
            "step": "disciplines",
            "disciplines": ["a", "b", "c", "d", "e", "f"]
        }));
        assert!(too_many.validate().is_err());
    }

    #[test]
    fn test_profile_rules() {
        let blank = parse(json!({ "step": "profile", "displayName": "" }));
        let err = blank.validate().unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let spaces = parse(json!({ "step": "profile", "displayName": "   " }));
        match spaces.validate().unwrap_err() {
            AppError::Validation { details, .. } => {
                assert!(details.is_some());
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blank_display_name_is_not_stored() {
        // No query results: a storage call would fail with a database error
        let svc = service(MockDatabase::new(DatabaseBackend::Postgres));

        let step = parse(json!({ "step": "profile", "displayName": "  " }));
        let result = svc.submit("user1", step).await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_out_of_order_step_rejected() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user(0)]]),
        );

        let step = parse(json!({ "step": "portfolio", "template": "grid" }));
        let result = svc.submit("user1", step).await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_last_step_completes_onboarding() {
        let mut finished_profile = create_test_profile();
        finished_profile.portfolio_template = Some(PortfolioTemplate::Minimal);

        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user(2)]])
                .append_query_results([[create_test_profile()]])
                .append_query_results([[finished_profile]])
                .append_query_results([[create_test_user(3)]]),
        );

        let step = parse(json!({ "step": "portfolio", "template": "minimal" }));
        let progress = svc.submit("user1", step).await.unwrap();

        assert_eq!(progress.completed_steps, 3);
        assert!(progress.onboarded);
    }

    #[tokio::test]
    async fn test_resubmitting_keeps_progress() {
        let svc = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user(2)]])
                .append_query_results([[create_test_profile()]])
                .append_query_results([[create_test_profile()]])
                .append_query_results([[create_test_user(2)]]),
        );

        let step = parse(json!({ "step": "profile", "displayName": "Ada" }));
        let progress = svc.submit("user1", step).await.unwrap();

        assert_eq!(progress.completed_steps, 2);
        assert!(!progress.onboarded);
    }
}
