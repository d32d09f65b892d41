//! API middleware and shared state.

use std::sync::Arc;

use artilink_core::{
    ArtworkService, FollowingService, OnboardingService, PostService, QuestionService,
    UserService,
};
use artilink_db::repositories::{
    ArtworkRepository, FollowingRepository, PostRepository, QuestionRepository,
    UserProfileRepository, UserRepository,
};
use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use sea_orm::DatabaseConnection;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub onboarding_service: OnboardingService,
    pub post_service: PostService,
    pub question_service: QuestionService,
    pub artwork_service: ArtworkService,
    pub following_service: FollowingService,
}

impl AppState {
    /// Wire repositories and services over one connection pool.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let profile_repo = UserProfileRepository::new(Arc::clone(&db));
        let post_repo = PostRepository::new(Arc::clone(&db));
        let question_repo = QuestionRepository::new(Arc::clone(&db));
        let artwork_repo = ArtworkRepository::new(Arc::clone(&db));
        let following_repo = FollowingRepository::new(db);

        let question_service = QuestionService::new(question_repo);

        Self {
            user_service: UserService::new(user_repo.clone(), profile_repo.clone()),
            onboarding_service: OnboardingService::new(user_repo.clone(), profile_repo),
            post_service: PostService::new(post_repo, question_service.clone()),
            question_service,
            artwork_service: ArtworkService::new(artwork_repo),
            following_service: FollowingService::new(following_repo, user_repo),
        }
    }
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` to a user and stores it in the
/// request extensions. Requests without a valid token pass through
/// unauthenticated; handlers that need a session reject them.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get(AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.user_service.authenticate_by_token(token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) if e.is_server_error() => {
                tracing::warn!(error = %e, "Session lookup failed");
            }
            Err(_) => {
                tracing::debug!("Unknown session token");
            }
        }
    }

    next.run(req).await
}
