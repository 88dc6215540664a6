use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movie_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub movie_id: i32,
    pub movie_name: String,
    pub watch_date: String,
    pub rating: i32,
    pub review: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
