/// Comment operations
use std::sync::Arc;

use tracing::info;

use super::caller_account;
use crate::auth::middleware::Caller;
use crate::error::{ServiceError, ServiceResult};
use crate::models::account::Account;
use crate::models::comment::{Comment, CommentQuery, NewComment};
use crate::models::page::{Page, PageRequest};
use crate::store::Store;

#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn Store>,
}

impl CommentService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Adds a comment by the caller to a task
    pub async fn add(&self, task_id: i64, text: &str, caller: &Caller) -> ServiceResult<Comment> {
        if self.store.task_by_id(task_id).await?.is_none() {
            return Err(ServiceError::not_found("Task not found"));
        }
        let author = self.require_account(caller).await?;

        let comment = self
            .store
            .insert_comment(NewComment {
                content: text.to_string(),
                task_id,
                author_id: author.id,
            })
            .await?;

        info!(comment_id = comment.id, task_id, "Comment added");
        Ok(comment)
    }

    pub async fn by_task(&self, task_id: i64, request: PageRequest) -> ServiceResult<Page<Comment>> {
        Ok(self.store.comment_page(CommentQuery::Task(task_id), request).await?)
    }

    pub async fn by_author(&self, account_id: i64, request: PageRequest) -> ServiceResult<Page<Comment>> {
        Ok(self.store.comment_page(CommentQuery::Author(account_id), request).await?)
    }

    /// Deletes a comment; only its author may do so
    pub async fn delete(&self, comment_id: i64, caller: &Caller) -> ServiceResult<()> {
        let account = self.require_account(caller).await?;
        let comment = self
            .store
            .comment_by_id(comment_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Comment not found"))?;

        if !comment.is_authored_by(account.id) {
            return Err(ServiceError::forbidden("You not have permissions for delete comment"));
        }

        self.store.delete_comment(comment_id).await?;

        info!(comment_id, "Comment deleted");
        Ok(())
    }

    async fn require_account(&self, caller: &Caller) -> ServiceResult<Account> {
        caller_account(self.store.as_ref(), caller)
            .await?
            .ok_or_else(|| ServiceError::not_found("Resource not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{account, services};
    use crate::store::CommentStore;

    #[tokio::test]
    async fn test_add_and_list() {
        let (services, store) = services();
        let (alice_account, alice) = account(&store, "Alice").await;
        let (bob_account, bob) = account(&store, "Bob").await;
        let task = services.tasks.create("T", "D", &alice).await.unwrap();

        let first = services.comments.add(task.id, "first", &alice).await.unwrap();
        services.comments.add(task.id, "second", &bob).await.unwrap();

        assert_eq!(first.content, "first");
        assert_eq!(first.task_id, task.id);
        assert_eq!(first.author_id, alice_account.id);

        let on_task = services.comments.by_task(task.id, PageRequest::default()).await.unwrap();
        assert_eq!(on_task.total_elements, 2);
        assert_eq!(on_task.content[0].content, "first");

        let by_bob = services
            .comments
            .by_author(bob_account.id, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(by_bob.total_elements, 1);
        assert_eq!(by_bob.content[0].content, "second");
    }

    #[tokio::test]
    async fn test_add_to_missing_task() {
        let (services, store) = services();
        let (_, alice) = account(&store, "Alice").await;

        match services.comments.add(42, "hello", &alice).await {
            Err(ServiceError::NotFound(msg)) => assert_eq!(msg, "Task not found"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_add_without_account() {
        let (services, store) = services();
        let (_, alice) = account(&store, "Alice").await;
        let task = services.tasks.create("T", "D", &alice).await.unwrap();

        match services.comments.add(task.id, "hello", &Caller::new("ghost@example.com")).await {
            Err(ServiceError::NotFound(msg)) => assert_eq!(msg, "Resource not found"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_requires_author() {
        let (services, store) = services();
        let (_, alice) = account(&store, "Alice").await;
        let (_, bob) = account(&store, "Bob").await;
        let task = services.tasks.create("T", "D", &alice).await.unwrap();
        let comment = services.comments.add(task.id, "mine", &alice).await.unwrap();

        match services.comments.delete(comment.id, &bob).await {
            Err(ServiceError::Forbidden(msg)) => {
                assert_eq!(msg, "You not have permissions for delete comment")
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(store.comment_by_id(comment.id).await.unwrap().is_some());

        services.comments.delete(comment.id, &alice).await.unwrap();
        assert!(store.comment_by_id(comment.id).await.unwrap().is_none());

        match services.comments.delete(comment.id, &alice).await {
            Err(ServiceError::NotFound(msg)) => assert_eq!(msg, "Comment not found"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_deleting_task_removes_its_comments() {
        let (services, store) = services();
        let (alice_account, alice) = account(&store, "Alice").await;
        let task = services.tasks.create("T", "D", &alice).await.unwrap();
        services.comments.add(task.id, "gone soon", &alice).await.unwrap();

        services.tasks.delete(task.id, &alice).await.unwrap();

        let page = services
            .comments
            .by_author(alice_account.id, PageRequest::default())
            .await
            .unwrap();
        assert!(page.content.is_empty());
    }
}
