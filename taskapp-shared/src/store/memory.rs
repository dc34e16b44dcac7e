/// In-process implementation of the store port
///
/// Mirrors the PostgreSQL schema closely enough for the services to behave
/// the same: per-table ID sequences, the unique email constraint, the task
/// foreign key on comments and cascading comment removal.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{AccountStore, CommentStore, Store, StoreError, StoreResult, TaskStore};
use crate::models::account::{Account, NewAccount};
use crate::models::comment::{Comment, CommentQuery, NewComment};
use crate::models::page::{Page, PageRequest};
use crate::models::task::{NewTask, Task, TaskQuery};

#[derive(Debug, Default)]
struct Tables {
    accounts: BTreeMap<i64, Account>,
    tasks: BTreeMap<i64, Task>,
    comments: BTreeMap<i64, Comment>,
    account_seq: i64,
    task_seq: i64,
    comment_seq: i64,
}

fn next_id(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

/// Slices already ordered rows into a page
fn paginate<'a, T, I>(rows: I, request: PageRequest) -> Page<T>
where
    T: Clone + 'a,
    I: Iterator<Item = &'a T>,
{
    let matching: Vec<&T> = rows.collect();
    let total = matching.len() as i64;
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(request.limit()).unwrap_or(usize::MAX);

    let content = matching.into_iter().skip(offset).take(limit).cloned().collect();

    Page::new(content, request, total)
}

/// Store kept entirely in memory behind an async read/write lock
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn insert_account(&self, data: NewAccount) -> StoreResult<Account> {
        let mut tables = self.tables.write().await;

        if tables.accounts.values().any(|a| a.email == data.email) {
            return Err(StoreError::UniqueViolation {
                constraint: "accounts_email_key".to_string(),
            });
        }

        let account = Account {
            id: next_id(&mut tables.account_seq),
            name: data.name,
            email: data.email,
            password_hash: data.password_hash,
            role: data.role,
            created_at: Utc::now(),
        };
        tables.accounts.insert(account.id, account.clone());

        Ok(account)
    }

    async fn account_by_id(&self, id: i64) -> StoreResult<Option<Account>> {
        Ok(self.tables.read().await.accounts.get(&id).cloned())
    }

    async fn account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.values().find(|a| a.email == email).cloned())
    }

    async fn account_exists(&self, email: &str) -> StoreResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.values().any(|a| a.email == email))
    }

    async fn all_accounts(&self) -> StoreResult<Vec<Account>> {
        Ok(self.tables.read().await.accounts.values().cloned().collect())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, data: NewTask) -> StoreResult<Task> {
        let mut tables = self.tables.write().await;

        if !tables.accounts.contains_key(&data.author_id) {
            return Err(StoreError::ForeignKeyViolation {
                constraint: "tasks_author_id_fkey".to_string(),
            });
        }

        let now = Utc::now();
        let task = Task {
            id: next_id(&mut tables.task_seq),
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            author_id: data.author_id,
            assignee_id: None,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.insert(task.id, task.clone());

        Ok(task)
    }

    async fn task_by_id(&self, id: i64) -> StoreResult<Option<Task>> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn save_task(&self, task: &Task) -> StoreResult<Option<Task>> {
        let mut tables = self.tables.write().await;

        if let Some(assignee) = task.assignee_id {
            if !tables.accounts.contains_key(&assignee) {
                return Err(StoreError::ForeignKeyViolation {
                    constraint: "tasks_assignee_id_fkey".to_string(),
                });
            }
        }

        let Some(stored) = tables.tasks.get_mut(&task.id) else {
            return Ok(None);
        };

        stored.title = task.title.clone();
        stored.description = task.description.clone();
        stored.status = task.status;
        stored.priority = task.priority;
        stored.assignee_id = task.assignee_id;
        stored.updated_at = Utc::now();

        Ok(Some(stored.clone()))
    }

    async fn delete_task(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        if tables.tasks.remove(&id).is_none() {
            return Ok(false);
        }
        tables.comments.retain(|_, c| c.task_id != id);

        Ok(true)
    }

    async fn task_page(&self, query: TaskQuery, request: PageRequest) -> StoreResult<Page<Task>> {
        let tables = self.tables.read().await;
        Ok(paginate(tables.tasks.values().filter(|t| query.matches(t)), request))
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn insert_comment(&self, data: NewComment) -> StoreResult<Comment> {
        let mut tables = self.tables.write().await;

        if !tables.tasks.contains_key(&data.task_id) {
            return Err(StoreError::ForeignKeyViolation {
                constraint: "comments_task_id_fkey".to_string(),
            });
        }

        let comment = Comment {
            id: next_id(&mut tables.comment_seq),
            content: data.content,
            task_id: data.task_id,
            author_id: data.author_id,
            created_at: Utc::now(),
        };
        tables.comments.insert(comment.id, comment.clone());

        Ok(comment)
    }

    async fn comment_by_id(&self, id: i64) -> StoreResult<Option<Comment>> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn delete_comment(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.comments.remove(&id).is_some())
    }

    async fn comment_page(
        &self,
        query: CommentQuery,
        request: PageRequest,
    ) -> StoreResult<Page<Comment>> {
        let tables = self.tables.read().await;
        Ok(paginate(tables.comments.values().filter(|c| query.matches(c)), request))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::TaskStatus;

    async fn store_with_account() -> (MemoryStore, Account) {
        let store = MemoryStore::new();
        let account = store
            .insert_account(NewAccount::user("Alice", "alice@example.com", "hash"))
            .await
            .unwrap();
        (store, account)
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (store, _) = store_with_account().await;

        let result = store
            .insert_account(NewAccount::user("Other", "alice@example.com", "hash"))
            .await;

        assert!(matches!(result, Err(StoreError::UniqueViolation { .. })));
        assert_eq!(store.all_accounts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ids_are_sequential_per_table() {
        let (store, alice) = store_with_account().await;
        let bob = store
            .insert_account(NewAccount::user("Bob", "bob@example.com", "hash"))
            .await
            .unwrap();
        let task = store.insert_task(NewTask::new("T", "D", alice.id)).await.unwrap();

        assert_eq!(alice.id, 1);
        assert_eq!(bob.id, 2);
        assert_eq!(task.id, 1);
    }

    #[tokio::test]
    async fn test_task_page_filters_and_slices() {
        let (store, alice) = store_with_account().await;
        for i in 0..5 {
            let mut task = store
                .insert_task(NewTask::new(format!("T{}", i), "", alice.id))
                .await
                .unwrap();
            if i % 2 == 0 {
                task.set_status(TaskStatus::Resolved);
                store.save_task(&task).await.unwrap();
            }
        }

        let page = store
            .task_page(TaskQuery::Status(TaskStatus::Resolved), PageRequest::new(1, 2).unwrap())
            .await
            .unwrap();

        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].title, "T4");
    }

    #[tokio::test]
    async fn test_delete_task_cascades_to_comments() {
        let (store, alice) = store_with_account().await;
        let task = store.insert_task(NewTask::new("T", "D", alice.id)).await.unwrap();
        store
            .insert_comment(NewComment {
                content: "hi".to_string(),
                task_id: task.id,
                author_id: alice.id,
            })
            .await
            .unwrap();

        assert!(store.delete_task(task.id).await.unwrap());
        assert!(!store.delete_task(task.id).await.unwrap());

        let page = store
            .comment_page(CommentQuery::Author(alice.id), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_elements, 0);
    }

    #[tokio::test]
    async fn test_comment_requires_task() {
        let (store, alice) = store_with_account().await;

        let result = store
            .insert_comment(NewComment {
                content: "orphan".to_string(),
                task_id: 42,
                author_id: alice.id,
            })
            .await;

        assert!(matches!(result, Err(StoreError::ForeignKeyViolation { .. })));
    }

    #[tokio::test]
    async fn test_save_missing_task_returns_none() {
        let (store, alice) = store_with_account().await;
        let mut task = store.insert_task(NewTask::new("T", "D", alice.id)).await.unwrap();
        store.delete_task(task.id).await.unwrap();

        task.rename("T2", "D2");
        assert!(store.save_task(&task).await.unwrap().is_none());
    }
}
