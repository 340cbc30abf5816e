use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "faculty")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    pub name: String,

    #[sea_orm(unique)]
    pub email: String,

    pub section: String,

    pub dept: String,

    /// Kept string-typed ("true"/"false") for wire compatibility;
    /// see DESIGN.md.
    pub coordinator: String,

    pub password_hash: String,

    pub role: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
