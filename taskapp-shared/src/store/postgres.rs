/// PostgreSQL implementation of the store port
///
/// Thin delegation to the associated functions on the models, which own
/// their SQL.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{AccountStore, CommentStore, Store, StoreResult, TaskStore};
use crate::db::pool;
use crate::models::account::{Account, NewAccount};
use crate::models::comment::{Comment, CommentQuery, NewComment};
use crate::models::page::{Page, PageRequest};
use crate::models::task::{NewTask, Task, TaskQuery};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn insert_account(&self, data: NewAccount) -> StoreResult<Account> {
        Ok(Account::create(&self.pool, data).await?)
    }

    async fn account_by_id(&self, id: i64) -> StoreResult<Option<Account>> {
        Ok(Account::find_by_id(&self.pool, id).await?)
    }

    async fn account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        Ok(Account::find_by_email(&self.pool, email).await?)
    }

    async fn account_exists(&self, email: &str) -> StoreResult<bool> {
        Ok(Account::exists_by_email(&self.pool, email).await?)
    }

    async fn all_accounts(&self) -> StoreResult<Vec<Account>> {
        Ok(Account::list_all(&self.pool).await?)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert_task(&self, data: NewTask) -> StoreResult<Task> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn task_by_id(&self, id: i64) -> StoreResult<Option<Task>> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn save_task(&self, task: &Task) -> StoreResult<Option<Task>> {
        Ok(Task::save(&self.pool, task).await?)
    }

    async fn delete_task(&self, id: i64) -> StoreResult<bool> {
        Ok(Task::delete(&self.pool, id).await?)
    }

    async fn task_page(&self, query: TaskQuery, request: PageRequest) -> StoreResult<Page<Task>> {
        Ok(Task::page(&self.pool, query, request).await?)
    }
}

#[async_trait]
impl CommentStore for PgStore {
    async fn insert_comment(&self, data: NewComment) -> StoreResult<Comment> {
        Ok(Comment::create(&self.pool, data).await?)
    }

    async fn comment_by_id(&self, id: i64) -> StoreResult<Option<Comment>> {
        Ok(Comment::find_by_id(&self.pool, id).await?)
    }

    async fn delete_comment(&self, id: i64) -> StoreResult<bool> {
        Ok(Comment::delete(&self.pool, id).await?)
    }

    async fn comment_page(
        &self,
        query: CommentQuery,
        request: PageRequest,
    ) -> StoreResult<Page<Comment>> {
        Ok(Comment::page(&self.pool, query, request).await?)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(pool::ping(&self.pool).await?)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
