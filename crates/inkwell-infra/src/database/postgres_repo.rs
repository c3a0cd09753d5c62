//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, Order, QueryFilter, QueryOrder,
};

use inkwell_core::domain::{LogQuery, LogRecord, Post, SortField, SortOrder, User};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{LogRepository, PostRepository, UserRepository};

use super::entity::log_record::{self, Entity as LogRecordEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, read_error, write_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// Mask an email address so it can appear in diagnostic logs.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{first}***@{domain}"),
            _ => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_asc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn delete_by_author(&self, author: uuid::Uuid) -> Result<u64, RepoError> {
        let result = PostEntity::delete_many()
            .filter(post::Column::AuthorId.eq(author))
            .exec(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.rows_affected)
    }
}

/// PostgreSQL audit log store.
pub struct PostgresLogRepository {
    db: DbConn,
}

impl PostgresLogRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn sort_column(field: SortField) -> log_record::Column {
    match field {
        SortField::Id => log_record::Column::Id,
        SortField::LogFile => log_record::Column::LogFile,
        SortField::InfoType => log_record::Column::InfoType,
        SortField::Message => log_record::Column::Message,
        SortField::DateAndTime => log_record::Column::DateAndTime,
    }
}

/// `%term%` with LIKE metacharacters escaped, lower-cased.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl LogRepository for PostgresLogRepository {
    async fn create(&self, record: LogRecord) -> Result<LogRecord, RepoError> {
        let active_model: log_record::ActiveModel = record.into();
        let model = active_model.insert(&self.db).await.map_err(write_error)?;
        model.try_into()
    }

    async fn query(&self, query: &LogQuery) -> Result<Vec<LogRecord>, RepoError> {
        let mut select = LogRecordEntity::find();

        if !query.search.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(log_record::Column::Message)))
                    .like(like_pattern(&query.search)),
            );
        }

        let order = match query.order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };

        let models = select
            .order_by(sort_column(query.sort_by), order)
            .all(&self.db)
            .await
            .map_err(read_error)?;

        models.into_iter().map(LogRecord::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("test@example.com"), "t***@example.com");
        assert_eq!(mask_email("a@x.com"), "***@x.com");
        assert_eq!(mask_email("nonsense"), "***");
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("Logged"), "%logged%");
        assert_eq!(like_pattern("100%_done"), "%100\\%\\_done%");
    }
}
