//! Repositories wrapping `SeaORM` queries.

mod artwork;
mod following;
mod post;
mod question;
mod user;
mod user_profile;

pub use artwork::{ArtworkFilter, ArtworkRepository};
pub use following::FollowingRepository;
pub use post::{NewQuestion, PostRepository, QuestionWithAnswers};
pub use question::{ALREADY_ANSWERED, QuestionRepository};
pub use user::UserRepository;
pub use user_profile::UserProfileRepository;
