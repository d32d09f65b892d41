//! User profile entity (credentials and onboarding data).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Portfolio page templates a user can pick during onboarding.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PortfolioTemplate {
    #[sea_orm(string_value = "classic")]
    Classic,
    #[sea_orm(string_value = "grid")]
    Grid,
    #[sea_orm(string_value = "minimal")]
    Minimal,
    #[sea_orm(string_value = "showcase")]
    Showcase,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,

    /// Argon2 password hash
    #[sea_orm(nullable)]
    #[serde(skip_serializing)]
    pub password: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,

    /// Art disciplines (JSON array of strings)
    #[sea_orm(column_type = "JsonBinary")]
    pub disciplines: Json,

    #[sea_orm(nullable)]
    pub portfolio_template: Option<PortfolioTemplate>,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
