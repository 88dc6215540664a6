use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, Statement, TransactionTrait,
    sea_query::Expr,
};
use tracing::{debug, warn};

use crate::{
    db,
    entities::movie_log,
    error::{AppError, AppResult},
    models::{MovieLogEntry, NewMovie, date_to_store},
    validation::Assignment,
};

const SAMPLE_ENTRIES: [(&str, &str, i32, &str); 3] = [
    ("The Shawshank Redemption", "2024-01-15", 9, "An incredible story of hope and friendship"),
    ("Inception", "2024-02-20", 8, "Mind-bending plot that keeps you thinking"),
    ("The Dark Knight", "2024-03-10", 9, "Heath Ledger's Joker was phenomenal"),
];

/// All reads and writes of movie-log entries.
///
/// Every operation runs inside its own transaction, which pins one pooled
/// connection for the duration of the call. Dropping the transaction on any
/// early return rolls it back and hands the connection back to the pool.
#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn acquire(&self) -> AppResult<DatabaseTransaction> {
        self.db.begin().await.map_err(|err| {
            warn!(error = %err, "failed to acquire database connection");
            AppError::ConnectionUnavailable
        })
    }

    /// Most recent watch first; same-day entries newest-created first.
    pub async fn list(&self) -> AppResult<Vec<MovieLogEntry>> {
        let txn = self.acquire().await?;
        let rows = movie_log::Entity::find()
            .order_by_desc(movie_log::Column::WatchDate)
            .order_by_desc(movie_log::Column::MovieId)
            .all(&txn)
            .await?;

        debug!(count = rows.len(), "listed movie entries");
        Ok(rows.into_iter().map(MovieLogEntry::from).collect())
    }

    pub async fn get(&self, movie_id: i32) -> AppResult<MovieLogEntry> {
        let txn = self.acquire().await?;
        movie_log::Entity::find_by_id(movie_id)
            .one(&txn)
            .await?
            .map(MovieLogEntry::from)
            .ok_or(AppError::NotFound)
    }

    pub async fn create(&self, movie: NewMovie) -> AppResult<i32> {
        let txn = self.acquire().await?;
        let model = movie_log::ActiveModel {
            movie_id: NotSet,
            movie_name: Set(movie.movie_name),
            watch_date: Set(date_to_store(movie.watch_date)),
            rating: Set(movie.rating),
            review: Set(movie.review),
        };

        let res = movie_log::Entity::insert(model).exec(&txn).await?;
        txn.commit().await?;
        Ok(res.last_insert_id)
    }

    /// Applies `assignments` in order as `SET col = ?, ...` with every value
    /// bound, then `WHERE movie_id = ?`.
    pub async fn update(&self, movie_id: i32, assignments: Vec<Assignment>) -> AppResult<()> {
        let txn = self.acquire().await?;

        let mut update = movie_log::Entity::update_many();
        for assignment in assignments {
            let column = assignment.column();
            update = update.col_expr(column, Expr::value(assignment.into_value()));
        }

        let res = update.filter(movie_log::Column::MovieId.eq(movie_id)).exec(&txn).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        txn.commit().await?;
        Ok(())
    }

    pub async fn delete(&self, movie_id: i32) -> AppResult<()> {
        let txn = self.acquire().await?;
        let res = movie_log::Entity::delete_by_id(movie_id).exec(&txn).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        txn.commit().await?;
        Ok(())
    }

    pub async fn server_version(&self) -> AppResult<String> {
        let txn = self.acquire().await?;
        let row = txn
            .query_one(Statement::from_string(
                txn.get_database_backend(),
                "SELECT sqlite_version() AS version".to_string(),
            ))
            .await?;

        Ok(row.map(|r| r.try_get::<String>("", "version")).transpose()?.unwrap_or_default())
    }

    pub async fn table_names(&self) -> AppResult<Vec<String>> {
        let txn = self.acquire().await?;
        let rows = txn
            .query_all(Statement::from_string(
                txn.get_database_backend(),
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name"
                    .to_string(),
            ))
            .await?;

        rows.iter().map(|r| r.try_get::<String>("", "name").map_err(AppError::from)).collect()
    }

    /// Brings the schema up to date and seeds the sample entries into an
    /// empty table.
    pub async fn create_table_with_samples(&self) -> AppResult<()> {
        db::migrate(&self.db).await?;

        let txn = self.acquire().await?;
        let existing = movie_log::Entity::find().count(&txn).await?;
        if existing > 0 {
            debug!(existing, "movie_log already populated, skipping samples");
            return Ok(());
        }

        let samples = SAMPLE_ENTRIES.iter().map(|(name, date, rating, review)| {
            movie_log::ActiveModel {
                movie_id: NotSet,
                movie_name: Set(name.to_string()),
                watch_date: Set(date.to_string()),
                rating: Set(*rating),
                review: Set(Some(review.to_string())),
            }
        });
        movie_log::Entity::insert_many(samples).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }
}
