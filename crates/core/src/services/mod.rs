//! Business services.

pub mod artwork;
pub mod following;
pub mod onboarding;
pub mod post;
pub mod question;
pub mod user;

pub use artwork::{ArtworkService, CreateArtworkInput, ListArtworksInput};
pub use following::FollowingService;
pub use onboarding::{OnboardingProgress, OnboardingService, OnboardingStep};
pub use post::{CreatePostInput, CreateQuestionInput, PostDetail, PostService};
pub use question::{ANSWER_NOT_IN_QUESTION, QuestionService, answer_view, question_view};
pub use user::{CreateUserInput, UserService};
