/// Task operations and their permission rules
///
/// | Operation        | Allowed for                           |
/// |------------------|---------------------------------------|
/// | update, delete   | author                                |
/// | assign           | author, or the assignee-to-be itself  |
/// | unassign         | author                                |
/// | change status    | author; anyone when moving to RESOLVED |
/// | change priority  | author                                |
///
/// A caller whose account no longer exists is never the author.

use std::sync::Arc;

use tracing::info;

use super::caller_account;
use crate::auth::middleware::Caller;
use crate::error::{ServiceError, ServiceResult};
use crate::models::page::{Page, PageRequest};
use crate::models::task::{NewTask, Task, TaskPriority, TaskQuery, TaskStatus};
use crate::store::Store;

const TASK_NOT_FOUND: &str = "The task does not exist";
const ACCOUNT_NOT_FOUND: &str = "Account not found";

/// Listing filter as received from the client, not yet validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFilter {
    All,
    Status(String),
    Priority(String),
}

impl TaskFilter {
    /// Status wins when both parameters are present
    pub fn from_params(status: Option<String>, priority: Option<String>) -> Self {
        match (status, priority) {
            (Some(status), _) => TaskFilter::Status(status),
            (None, Some(priority)) => TaskFilter::Priority(priority),
            (None, None) => TaskFilter::All,
        }
    }

    /// Parses the raw value into a store query
    pub fn into_query(self) -> ServiceResult<TaskQuery> {
        Ok(match self {
            TaskFilter::All => TaskQuery::All,
            TaskFilter::Status(raw) => TaskQuery::Status(raw.parse::<TaskStatus>()?),
            TaskFilter::Priority(raw) => TaskQuery::Priority(raw.parse::<TaskPriority>()?),
        })
    }
}

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn Store>,
}

impl TaskService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Creates an `OPEN`, `LOW` priority, unassigned task authored by the caller
    pub async fn create(&self, title: &str, description: &str, caller: &Caller) -> ServiceResult<Task> {
        let author = caller_account(self.store.as_ref(), caller)
            .await?
            .ok_or_else(|| ServiceError::not_found(ACCOUNT_NOT_FOUND))?;

        let task = self
            .store
            .insert_task(NewTask::new(title, description, author.id))
            .await?;

        info!(task_id = task.id, author = %caller.email, "Task created");
        Ok(task)
    }

    pub async fn read(&self, id: i64) -> ServiceResult<Task> {
        self.find(id).await
    }

    /// One page of tasks, optionally narrowed by status or priority
    ///
    /// The filter is validated before the store is queried.
    pub async fn read_all(&self, filter: TaskFilter, request: PageRequest) -> ServiceResult<Page<Task>> {
        let query = filter.into_query()?;
        Ok(self.store.task_page(query, request).await?)
    }

    pub async fn read_by_status(&self, status: &str, request: PageRequest) -> ServiceResult<Page<Task>> {
        self.read_all(TaskFilter::Status(status.to_string()), request).await
    }

    pub async fn read_by_priority(&self, priority: &str, request: PageRequest) -> ServiceResult<Page<Task>> {
        self.read_all(TaskFilter::Priority(priority.to_string()), request).await
    }

    /// Replaces title and description
    pub async fn update(
        &self,
        id: i64,
        title: &str,
        description: &str,
        caller: &Caller,
    ) -> ServiceResult<Task> {
        let mut task = self.find(id).await?;
        self.require_author(
            &task,
            caller,
            "You are not the author of this issue, you do not have rights to update the issue",
        )
        .await?;

        task.rename(title, description);
        let task = self.save(&task).await?;

        info!(task_id = id, "Task updated");
        Ok(task)
    }

    pub async fn delete(&self, id: i64, caller: &Caller) -> ServiceResult<()> {
        let task = self.find(id).await?;
        self.require_author(
            &task,
            caller,
            "You are not the author of this task, you do not have rights to delete the task",
        )
        .await?;

        if !self.store.delete_task(id).await? {
            return Err(ServiceError::not_found(TASK_NOT_FOUND));
        }

        info!(task_id = id, "Task deleted");
        Ok(())
    }

    /// Assigns the task to `account_id` and moves it to `IN_PROGRESS`
    ///
    /// The author may assign anyone; any other account may only take the
    /// task itself.
    pub async fn assign(&self, task_id: i64, account_id: i64, caller: &Caller) -> ServiceResult<Task> {
        let assignee = self
            .store
            .account_by_id(account_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ACCOUNT_NOT_FOUND))?;
        let mut task = self.find(task_id).await?;

        if !caller.is(&assignee.email) {
            self.require_author(&task, caller, "Only the author can assign his task to others")
                .await?;
        }

        task.assign(assignee.id);
        let task = self.save(&task).await?;

        info!(task_id, account_id, "Task assigned");
        Ok(task)
    }

    /// Clears the assignee without touching the status
    pub async fn unassign(&self, task_id: i64, caller: &Caller) -> ServiceResult<()> {
        let mut task = self.find(task_id).await?;
        self.require_author(&task, caller, "Only the author can remove his task to others")
            .await?;

        task.unassign();
        self.save(&task).await?;

        info!(task_id, "Task unassigned");
        Ok(())
    }

    pub async fn change_status(
        &self,
        task_id: i64,
        status: TaskStatus,
        caller: &Caller,
    ) -> ServiceResult<()> {
        let mut task = self.find(task_id).await?;
        let account = caller_account(self.store.as_ref(), caller)
            .await?
            .ok_or_else(|| ServiceError::not_found(ACCOUNT_NOT_FOUND))?;

        if !task.is_authored_by(account.id) && !status.is_open_to_everyone() {
            return Err(ServiceError::forbidden("Do you not have permissions"));
        }

        task.set_status(status);
        self.save(&task).await?;

        info!(task_id, status = %status, "Task status changed");
        Ok(())
    }

    pub async fn change_priority(
        &self,
        task_id: i64,
        priority: TaskPriority,
        caller: &Caller,
    ) -> ServiceResult<()> {
        let mut task = self.find(task_id).await?;
        self.require_author(&task, caller, "Only the author can change the priority of his task")
            .await?;

        task.set_priority(priority);
        self.save(&task).await?;

        info!(task_id, priority = %priority, "Task priority changed");
        Ok(())
    }

    pub async fn by_author(&self, account_id: i64, request: PageRequest) -> ServiceResult<Page<Task>> {
        Ok(self.store.task_page(TaskQuery::Author(account_id), request).await?)
    }

    pub async fn by_assignee(&self, account_id: i64, request: PageRequest) -> ServiceResult<Page<Task>> {
        Ok(self.store.task_page(TaskQuery::Assignee(account_id), request).await?)
    }

    async fn find(&self, id: i64) -> ServiceResult<Task> {
        self.store
            .task_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(TASK_NOT_FOUND))
    }

    async fn save(&self, task: &Task) -> ServiceResult<Task> {
        self.store
            .save_task(task)
            .await?
            .ok_or_else(|| ServiceError::not_found(TASK_NOT_FOUND))
    }

    async fn require_author(&self, task: &Task, caller: &Caller, denied: &str) -> ServiceResult<()> {
        let is_author = caller_account(self.store.as_ref(), caller)
            .await?
            .is_some_and(|account| task.is_authored_by(account.id));

        if is_author {
            Ok(())
        } else {
            Err(ServiceError::forbidden(denied))
        }
    }
}
