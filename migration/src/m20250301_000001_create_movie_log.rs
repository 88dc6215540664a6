use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MovieLog::Table)
                    .if_not_exists()
                    .col(pk_auto(MovieLog::MovieId))
                    .col(text(MovieLog::MovieName))
                    // ISO-8601 `YYYY-MM-DD`; sorts chronologically as text.
                    .col(string(MovieLog::WatchDate))
                    .col(
                        integer(MovieLog::Rating)
                            .check(Expr::col(MovieLog::Rating).between(0, 10)),
                    )
                    .col(text_null(MovieLog::Review))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MovieLog::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum MovieLog {
    Table,
    MovieId,
    MovieName,
    WatchDate,
    Rating,
    Review,
}
