use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "penalties")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    /// Owner's team at creation time, denormalized for reporting
    pub team_id: i64,
    pub created_date: NaiveDate,
    pub reason: String,
    /// Signed amount: positive is a debt, negative is a credit
    pub amount: Decimal,
    pub currency: String,
    pub archived: bool,
    pub subject: Option<String>,
    pub paid_date: Option<NaiveDate>,
}

impl Model {
    pub fn is_paid(&self) -> bool {
        self.paid_date.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::teams::Entity",
        from = "Column::TeamId",
        to = "super::teams::Column::TeamId"
    )]
    Team,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
