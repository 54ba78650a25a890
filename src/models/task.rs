use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Represents the priority of a task.
/// Corresponds to the `task_priority` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet.
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// Payload for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewTask {
    /// Must be between 1 and 200 characters and not blank.
    #[validate(length(min = 1, max = 200), custom = "not_blank")]
    pub title: String,

    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Defaults to `medium`.
    pub priority: Option<TaskPriority>,

    /// Defaults to `pending`.
    pub status: Option<TaskStatus>,

    pub due_date: Option<DateTime<Utc>>,
}

/// Payload for updating a task. Absent fields are left untouched.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200), custom = "not_blank")]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub priority: Option<TaskPriority>,

    pub status: Option<TaskStatus>,

    /// `None`: keep the current due date. `Some(None)`: the client sent `null`, clear it.
    #[serde(default, deserialize_with = "present_or_null")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    /// Identifier of the user who owns the task.
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query parameters for filtering the task list.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Case-insensitive match against title or description.
    pub search: Option<String>,
}

impl Task {
    /// Creates a new `Task` owned by `user_id`, filling defaults for omitted fields.
    pub fn new(input: NewTask, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: input.title.trim().to_string(),
            description: input.description.unwrap_or_default(),
            priority: input.priority.unwrap_or_default(),
            status: input.status.unwrap_or_default(),
            due_date: input.due_date,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Applies the fields present in `update` and bumps `updated_at`.
    pub fn apply(&mut self, update: TaskUpdate) {
        if let Some(title) = update.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
        }
        self.updated_at = Utc::now();
    }
}

impl TaskQuery {
    /// Non-blank search term, if any.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|s| s != task.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }
        match self.search_term() {
            Some(term) => {
                let term = term.to_lowercase();
                task.title.to_lowercase().contains(&term)
                    || task.description.to_lowercase().contains(&term)
            }
            None => true,
        }
    }
}

/// Rejects values that are empty once surrounding whitespace is trimmed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: Some("Test Description".to_string()),
            priority: Some(TaskPriority::High),
            status: None,
            due_date: Some(Utc::now()),
        }
    }

    #[test]
    fn test_task_creation() {
        let owner = Uuid::new_v4();
        let task = Task::new(new_task("Test Task"), owner);
        assert_eq!(task.title, "Test Task");
        assert_eq!(task.user_id, owner);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, TaskPriority::High);
        assert!(task.is_owned_by(owner));
        assert!(!task.is_owned_by(Uuid::new_v4()));
    }

    #[test]
    fn test_task_defaults() {
        let input: NewTask = serde_json::from_value(json!({ "title": "Bare" })).unwrap();
        let task = Task::new(input, Uuid::new_v4());
        assert_eq!(task.description, "");
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_new_task_validation() {
        assert!(new_task("Valid Task").validate().is_ok());
        assert!(new_task("").validate().is_err());
        assert!(new_task("   ").validate().is_err());
        assert!(new_task(&"a".repeat(201)).validate().is_err());

        let mut long_description = new_task("Valid");
        long_description.description = Some("b".repeat(1001));
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_update_validation() {
        let empty_title = TaskUpdate {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(empty_title.validate().is_err());
        let blank_title = TaskUpdate {
            title: Some(" \t ".to_string()),
            ..Default::default()
        };
        assert!(blank_title.validate().is_err());
        assert!(TaskUpdate::default().validate().is_ok());
    }

    #[test]
    fn test_update_due_date_semantics() {
        let absent: TaskUpdate = serde_json::from_value(json!({ "title": "x" })).unwrap();
        assert_eq!(absent.due_date, None);

        let cleared: TaskUpdate = serde_json::from_value(json!({ "due_date": null })).unwrap();
        assert_eq!(cleared.due_date, Some(None));

        let set: TaskUpdate =
            serde_json::from_value(json!({ "due_date": "2030-01-01T00:00:00Z" })).unwrap();
        assert!(matches!(set.due_date, Some(Some(_))));
    }

    #[test]
    fn test_apply_partial_update() {
        let mut task = Task::new(new_task("Original"), Uuid::new_v4());
        let before = task.updated_at;

        task.apply(TaskUpdate {
            status: Some(TaskStatus::Completed),
            due_date: Some(None),
            ..Default::default()
        });

        assert_eq!(task.title, "Original");
        assert_eq!(task.description, "Test Description");
        assert_eq!(task.status, TaskStatus::Completed);
        assert!(task.due_date.is_none());
        assert!(task.updated_at >= before);
    }

    #[test]
    fn test_query_matches() {
        let task = Task::new(new_task("Write Report"), Uuid::new_v4());

        assert!(TaskQuery::default().matches(&task));
        assert!(TaskQuery {
            search: Some("report".into()),
            ..Default::default()
        }
        .matches(&task));
        assert!(TaskQuery {
            search: Some("DESCRIPTION".into()),
            ..Default::default()
        }
        .matches(&task));
        assert!(!TaskQuery {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        }
        .matches(&task));
        assert!(!TaskQuery {
            priority: Some(TaskPriority::Low),
            search: Some("report".into()),
            ..Default::default()
        }
        .matches(&task));
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            json!("in_progress")
        );
        assert_eq!(serde_json::to_value(TaskPriority::High).unwrap(), json!("high"));
    }
}
