/// Comment model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE comments (
///     id BIGSERIAL PRIMARY KEY,
///     content TEXT NOT NULL,
///     task_id BIGINT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     author_id BIGINT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::page::{Page, PageRequest};

/// Persisted comment
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub task_id: i64,
    pub author_id: i64,

    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn is_authored_by(&self, account_id: i64) -> bool {
        self.author_id == account_id
    }
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub task_id: i64,
    pub author_id: i64,
}

/// Which comments a listing returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentQuery {
    Task(i64),
    Author(i64),
}

impl CommentQuery {
    pub fn matches(&self, comment: &Comment) -> bool {
        match *self {
            CommentQuery::Task(id) => comment.task_id == id,
            CommentQuery::Author(id) => comment.author_id == id,
        }
    }

    fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        match *self {
            CommentQuery::Task(id) => {
                builder.push(" WHERE task_id = ").push_bind(id);
            }
            CommentQuery::Author(id) => {
                builder.push(" WHERE author_id = ").push_bind(id);
            }
        }
    }
}

impl Comment {
    pub async fn create(pool: &PgPool, data: NewComment) -> Result<Self, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (content, task_id, author_id)
            VALUES ($1, $2, $3)
            RETURNING id, content, task_id, author_id, created_at
            "#,
        )
        .bind(data.content)
        .bind(data.task_id)
        .bind(data.author_id)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            "SELECT id, content, task_id, author_id, created_at FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(comment)
    }

    /// Returns whether a row was removed
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns one page of the comments selected by `query`, ordered by ID
    pub async fn page(
        pool: &PgPool,
        query: CommentQuery,
        request: PageRequest,
    ) -> Result<Page<Self>, sqlx::Error> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM comments");
        query.push_where(&mut count);
        let (total,): (i64,) = count.build_query_as::<(i64,)>().fetch_one(pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(
            "SELECT id, content, task_id, author_id, created_at FROM comments",
        );
        query.push_where(&mut select);
        select
            .push(" ORDER BY id LIMIT ")
            .push_bind(request.limit())
            .push(" OFFSET ")
            .push_bind(request.offset());

        let comments = select.build_query_as::<Comment>().fetch_all(pool).await?;

        Ok(Page::new(comments, request, total))
    }
}
