//! `SeaORM` entity definitions.

#![allow(missing_docs)]

pub mod answer;
pub mod answer_vote;
pub mod artwork;
pub mod following;
pub mod post;
pub mod question;
pub mod user;
pub mod user_profile;

pub use answer::Entity as Answer;
pub use answer_vote::Entity as AnswerVote;
pub use artwork::Entity as Artwork;
pub use following::Entity as Following;
pub use post::Entity as Post;
pub use question::Entity as Question;
pub use user::Entity as User;
pub use user_profile::Entity as UserProfile;
