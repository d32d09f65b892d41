//! Create answer vote table migration.

use sea_orm_migration::prelude::*;

/// Name of the index that enforces one vote per user per question.
const UNIQUE_QUESTION_USER_INDEX: &str = "idx_answer_vote_question_user";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AnswerVote::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AnswerVote::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AnswerVote::AnswerId).integer().not_null())
                    .col(ColumnDef::new(AnswerVote::QuestionId).integer().not_null())
                    .col(ColumnDef::new(AnswerVote::UserId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(AnswerVote::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_answer_vote_answer")
                            .from(AnswerVote::Table, AnswerVote::AnswerId)
                            .to(Answer::Table, Answer::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_answer_vote_question")
                            .from(AnswerVote::Table, AnswerVote::QuestionId)
                            .to(Question::Table, Question::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_answer_vote_user")
                            .from(AnswerVote::Table, AnswerVote::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (question_id, user_id) - one vote per user per question,
        // across all answers of that question
        manager
            .create_index(
                Index::create()
                    .name(UNIQUE_QUESTION_USER_INDEX)
                    .table(AnswerVote::Table)
                    .col(AnswerVote::QuestionId)
                    .col(AnswerVote::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: answer_id (for listing voters of an answer)
        manager
            .create_index(
                Index::create()
                    .name("idx_answer_vote_answer_id")
                    .table(AnswerVote::Table)
                    .col(AnswerVote::AnswerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AnswerVote::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AnswerVote {
    Table,
    Id,
    AnswerId,
    QuestionId,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum Answer {
    Table,
    Id,
}

#[derive(Iden)]
enum Question {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
